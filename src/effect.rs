//! ASCII effect handle
//!
//! Ties the pipeline together for one container: scene → downsample to
//! the glyph grid → glyphs, plus the drift hue for the glyph layer.
//! Resizes are queued and applied at the start of the next frame, so a
//! frame always maps a buffer that matches its own grid.

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::Options;
use crate::drift::{DriftController, DriftMode};
use crate::error::Result;
use crate::glyph::{CellSize, GlyphFrame, GlyphGridConfig, GlyphMapper, GlyphMetrics, Viewport};
use crate::input::{PointerHub, PointerSample, PointerSubscription};
use crate::rasterizer::Vec2;
use crate::scene::SceneRenderer;

/// Host element the effect draws into, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Container {
    pub width: f32,
    pub height: f32,
}

impl Container {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

pub struct AsciiEffect {
    mapper: GlyphMapper,
    cell: CellSize,
    viewport: Viewport,
    pixel_ratio: f32,
    scene: SceneRenderer,
    drift: DriftController,
    pointer: PointerSubscription,
    pending_resize: Option<Container>,
    grid: Vec<u8>,
    frame: GlyphFrame,
}

fn device_size(viewport: &Viewport, ratio: f32) -> (usize, usize) {
    (
        (viewport.width_px * ratio).round() as usize,
        (viewport.height_px * ratio).round() as usize,
    )
}

impl AsciiEffect {
    pub fn initialize(
        container: Container,
        options: &Options,
        hub: &PointerHub,
        metrics: &dyn GlyphMetrics,
    ) -> Result<Self> {
        let config = Rc::new(GlyphGridConfig::from_options(&options.glyph)?);
        let cell = CellSize::measure(metrics, config.font_size_px(), config.font_family())?;
        let viewport = Viewport::derive(container.width, container.height, cell);

        let ratio = options.scene.pixel_ratio;
        let pixel_ratio = if ratio.is_finite() && ratio > 0.0 { ratio } else { 1.0 };
        let (w, h) = device_size(&viewport, pixel_ratio);
        let scene = SceneRenderer::initialize(w, h, &options.scene)?;

        let center = viewport.center;
        let pointer = hub.subscribe(PointerSample {
            x: center.x * pixel_ratio,
            y: center.y * pixel_ratio,
        });

        info!(
            columns = viewport.columns,
            rows = viewport.rows,
            cell_width = cell.width,
            "ascii effect initialized"
        );

        Ok(Self {
            mapper: GlyphMapper::new(config),
            cell,
            viewport,
            pixel_ratio,
            scene,
            drift: DriftController::new(),
            pointer,
            pending_resize: None,
            grid: Vec::new(),
            frame: GlyphFrame::default(),
        })
    }

    pub fn with_drift_mode(mut self, mode: DriftMode) -> Self {
        self.drift = DriftController::new().with_mode(mode);
        self
    }

    /// Queue a container resize; it takes effect on the next frame
    pub fn resize(&mut self, width: f32, height: f32) {
        self.pending_resize = Some(Container::new(width, height));
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frame(&self) -> &GlyphFrame {
        &self.frame
    }

    pub fn scene(&self) -> &SceneRenderer {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut SceneRenderer {
        &mut self.scene
    }

    /// Run one animation tick
    pub fn render_frame(&mut self, dt: f32) -> Result<&GlyphFrame> {
        if let Some(container) = self.pending_resize.take() {
            self.apply_resize(container)?;
        }

        let pointer = self.pointer.latest();
        let center = Vec2::new(
            self.viewport.center.x * self.pixel_ratio,
            self.viewport.center.y * self.pixel_ratio,
        );
        self.frame.hue_deg = self.drift.update(pointer, center);
        self.frame.columns = self.viewport.columns;
        self.frame.rows = self.viewport.rows;

        if self.viewport.is_empty() {
            self.frame.text.clear();
            return Ok(&self.frame);
        }

        self.scene.set_pointer(pointer);
        let fb = self.scene.render_frame(dt);
        fb.downsample(self.viewport.columns, self.viewport.rows, &mut self.grid);
        self.mapper
            .asciify_into(&self.grid, self.viewport.columns, self.viewport.rows, &mut self.frame.text)?;

        Ok(&self.frame)
    }

    /// Tear down; the pointer listener is released with the handle
    pub fn dispose(self) {
        info!("ascii effect disposed");
    }

    fn apply_resize(&mut self, container: Container) -> Result<()> {
        let viewport = Viewport::derive(container.width, container.height, self.cell);
        let (w, h) = device_size(&viewport, self.pixel_ratio);
        self.scene.resize(w, h)?;
        self.viewport = viewport;
        self.pointer.reset(PointerSample {
            x: viewport.center.x * self.pixel_ratio,
            y: viewport.center.y * self.pixel_ratio,
        });
        debug!(columns = viewport.columns, rows = viewport.rows, "glyph grid resized");
        Ok(())
    }
}

impl Drop for AsciiEffect {
    fn drop(&mut self) {
        debug!("ascii effect dropped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::glyph::MonospaceMetrics;

    fn options() -> Options {
        let mut opts = Options::default();
        opts.scene.text = "HI".to_string();
        opts.scene.text_font_size = 16.0;
        opts.scene.enable_waves = false;
        opts
    }

    fn effect(hub: &PointerHub, w: f32, h: f32) -> AsciiEffect {
        AsciiEffect::initialize(Container::new(w, h), &options(), hub, &MonospaceMetrics::default()).unwrap()
    }

    #[test]
    fn frame_matches_grid() {
        let hub = PointerHub::new(1.0);
        let mut fx = effect(&hub, 80.0, 40.0);
        // 80 / 4.8 and 40 / 8
        assert_eq!((fx.viewport().columns, fx.viewport().rows), (16, 5));

        let frame = fx.render_frame(1.0 / 60.0).unwrap();
        let lines: Vec<&str> = frame.text.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().all(|l| l.chars().count() == 16));
        assert!(frame.text.ends_with('\n'));
    }

    #[test]
    fn resize_waits_for_next_frame() {
        let hub = PointerHub::new(1.0);
        let mut fx = effect(&hub, 80.0, 40.0);
        fx.resize(160.0, 80.0);
        assert_eq!(fx.viewport().columns, 16);

        let frame = fx.render_frame(1.0 / 60.0).unwrap();
        assert_eq!((frame.columns, frame.rows), (33, 10));
        assert_eq!(frame.text.lines().count(), 10);
        assert_eq!(fx.scene().framebuffer().width, 160);
    }

    #[test]
    fn zero_size_container_yields_empty_frames() {
        let hub = PointerHub::new(1.0);
        let mut fx = effect(&hub, 0.0, 0.0);
        let frame = fx.render_frame(0.016).unwrap();
        assert!(frame.text.is_empty());
        assert_eq!((frame.columns, frame.rows), (0, 0));

        fx.resize(40.0, 16.0);
        assert!(!fx.render_frame(0.016).unwrap().text.is_empty());
    }

    #[test]
    fn dispose_releases_pointer_listener() {
        let hub = PointerHub::new(1.0);
        let fx = effect(&hub, 80.0, 40.0);
        assert_eq!(hub.listener_count(), 1);
        fx.dispose();
        assert_eq!(hub.listener_count(), 0);
        hub.publish(1.0, 1.0);
    }

    #[test]
    fn pointer_below_center_drifts_hue_positive() {
        let hub = PointerHub::new(1.0);
        let mut fx = effect(&hub, 80.0, 40.0);
        assert_eq!(fx.render_frame(0.016).unwrap().hue_deg, 0.0);

        hub.publish(40.0, 200.0);
        let hue = fx.render_frame(0.016).unwrap().hue_deg;
        assert!(hue > 0.0 && hue < 90.0);
    }

    #[test]
    fn bad_setup_is_reported() {
        let hub = PointerHub::new(1.0);
        let mut opts = options();
        opts.glyph.charset = "aa".to_string();
        let err = AsciiEffect::initialize(Container::new(10.0, 10.0), &opts, &hub, &MonospaceMetrics::default());
        assert!(matches!(err, Err(Error::DegenerateCharset(_))));

        let broken = MonospaceMetrics { advance_ratio: 0.0 };
        let err = AsciiEffect::initialize(Container::new(10.0, 10.0), &options(), &hub, &broken);
        assert!(matches!(err, Err(Error::UnsupportedContext(_))));
        assert_eq!(hub.listener_count(), 0);
    }
}
