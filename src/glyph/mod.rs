//! Glyph grid: configuration, geometry and the luminance mapper

mod config;
mod mapper;
mod viewport;

pub use config::*;
pub use mapper::*;
pub use viewport::*;

/// Output of one animation tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphFrame {
    /// Newline-terminated rows
    pub text: String,
    pub columns: usize,
    pub rows: usize,
    /// Hue rotation to apply to the glyph layer
    pub hue_deg: f32,
}
