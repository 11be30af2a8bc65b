//! glyphwave: text rendered as animated ASCII art
//!
//! A 3D text plane is rasterized in software, downsampled to a glyph grid
//! and mapped to characters by luminance. The glyph layer's hue drifts with
//! the pointer angle. A separate gesture engine animates a tiltable,
//! draggable, pinch-zoomable card.

/// Version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod config;
pub mod drift;
pub mod effect;
pub mod error;
pub mod gesture;
pub mod glyph;
pub mod input;
pub mod rasterizer;
pub mod scene;
pub mod schedule;
pub mod text_texture;

pub use config::Options;
pub use effect::{AsciiEffect, Container};
pub use error::{Error, Result};
