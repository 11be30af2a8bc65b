//! Software rasterizer
//!
//! Features:
//! - Perspective-correct texture mapping, nearest sampling
//! - Programmable vertex/fragment stage (`ShadingStage`)
//! - Z-buffered depth test
//! - Transparent clear, so untouched pixels keep alpha 0

mod math;
mod render;
mod shader;
mod types;

pub use math::*;
pub use render::*;
pub use shader::*;
pub use types::*;

/// Largest offscreen surface dimension the rasterizer accepts
pub const MAX_SURFACE_DIM: usize = 16384;
