//! Programmable stages of the rasterizer
//!
//! A `ShadingStage` plays the role of a vertex + fragment shader pair:
//! `vertex` displaces model-space positions before the model rotation,
//! `fragment` computes the final color from the bound texture.

use super::math::{Vec2, Vec3};
use super::types::{Color, Texture};

/// Per-frame values pushed to the shading stage
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Uniforms {
    /// Oscillating time phase
    pub time: f32,
    /// Pointer position normalized to 0..1 over the viewport
    pub pointer: Vec2,
    /// Vertex wave deformation on/off
    pub enable_waves: bool,
}

pub trait ShadingStage {
    /// Displace a model-space vertex position
    fn vertex(&self, position: Vec3, _uniforms: &Uniforms) -> Vec3 {
        position
    }

    /// Shade one fragment. `uv` has v pointing up (0 = bottom row).
    fn fragment(&self, texture: Option<&Texture>, uv: Vec2, _uniforms: &Uniforms) -> Color {
        match texture {
            Some(tex) => sample_uv(tex, uv),
            None => Color::WHITE,
        }
    }
}

/// Pass-through stage: no displacement, plain texture lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlit;

impl ShadingStage for Unlit {}

/// Clamp-to-edge nearest lookup with v pointing up
pub fn sample_uv(texture: &Texture, uv: Vec2) -> Color {
    texture.sample_clamped(uv.x, 1.0 - uv.y)
}
