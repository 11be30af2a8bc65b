//! glyphwave: animated ASCII text with a gesture-driven card
//!
//! Native builds take a few CLI flags; the web build runs with defaults.

mod app;

use macroquad::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use glyphwave::{Options, VERSION};

#[cfg(not(target_arch = "wasm32"))]
#[derive(clap::Parser, Debug)]
#[command(name = "glyphwave", version, about = "Text rendered as animated ASCII art")]
struct Cli {
    /// Options file (RON). Missing fields keep their defaults.
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Text drawn on the plane
    #[arg(long)]
    text: Option<String>,

    /// Write the text texture to a PNG and exit
    #[arg(long, value_name = "FILE")]
    dump_text_texture: Option<std::path::PathBuf>,
}

fn window_conf() -> Conf {
    Conf {
        window_title: format!("glyphwave v{}", VERSION),
        window_width: 1280,
        window_height: 720,
        window_resizable: true,
        high_dpi: true,
        ..Default::default()
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("glyphwave=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_target(false).try_init();
}

#[cfg(not(target_arch = "wasm32"))]
fn load_options(cli: &Cli) -> Options {
    let mut options = match &cli.config {
        Some(path) => match Options::load(path) {
            Ok(options) => {
                info!("Loaded options from {}", path.display());
                options
            }
            Err(e) => {
                tracing::warn!("Failed to load {}: {}; using defaults", path.display(), e);
                Options::default()
            }
        },
        None => Options::default(),
    };
    if let Some(text) = &cli.text {
        options.scene.text = text.clone();
    }
    options
}

/// Render the text texture headlessly and save it
#[cfg(not(target_arch = "wasm32"))]
fn dump_text_texture(options: &Options, path: &std::path::Path) -> glyphwave::Result<()> {
    let color = glyphwave::rasterizer::Color::from_hex(&options.scene.text_color)?;
    let texture = glyphwave::text_texture::render(&options.scene.text, &options.scene.font(), color);
    texture.save_png(path)?;
    info!(
        width = texture.width,
        height = texture.height,
        "Wrote text texture to {}",
        path.display()
    );
    Ok(())
}

#[macroquad::main(window_conf)]
async fn main() {
    init_logging();

    #[cfg(not(target_arch = "wasm32"))]
    let options = {
        use clap::Parser;
        let cli = Cli::parse();
        let options = load_options(&cli);
        if let Some(path) = &cli.dump_text_texture {
            if let Err(e) = dump_text_texture(&options, path) {
                tracing::error!("Could not write {}: {}", path.display(), e);
            }
            return;
        }
        options
    };
    #[cfg(target_arch = "wasm32")]
    let options = Options::default();

    info!("=== glyphwave v{} ===", VERSION);
    let mut app = app::App::new(options);

    loop {
        if !app.frame() {
            break;
        }
        next_frame().await;
    }
}
