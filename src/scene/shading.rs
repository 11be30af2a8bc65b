//! Shading stages for the text plane

use crate::rasterizer::{sample_uv, Color, ShadingStage, Texture, Uniforms, Vec2, Vec3};

/// Largest per-channel UV offset of the chromatic jitter
pub const MAX_CHANNEL_OFFSET: f32 = 0.01;

/// Time multiplier of the vertex waves
const WAVE_SPEED: f32 = 5.0;

/// Sinusoidal vertex displacement, gated by `Uniforms::enable_waves`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaveDeformation {
    /// Peak displacement per axis, world units
    pub amplitude: Vec3,
}

impl Default for WaveDeformation {
    fn default() -> Self {
        Self {
            amplitude: Vec3::new(0.5, 0.15, 1.0),
        }
    }
}

impl ShadingStage for WaveDeformation {
    fn vertex(&self, p: Vec3, uniforms: &Uniforms) -> Vec3 {
        if !uniforms.enable_waves {
            return p;
        }
        let t = uniforms.time * WAVE_SPEED;
        // Every axis reads the undisplaced position
        Vec3::new(
            p.x + (t + p.y).sin() * self.amplitude.x,
            p.y + (t + p.z).cos() * self.amplitude.y,
            p.z + (t + p.x).sin() * self.amplitude.z,
        )
    }
}

/// RGB split: each channel is read at its own small UV offset
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelJitter;

impl ChannelJitter {
    /// UV offsets for the red, green and blue lookups
    pub fn offsets(&self, uv: Vec2, uniforms: &Uniforms) -> [Vec2; 3] {
        let t = uniforms.time;
        let m = uniforms.pointer.x + uniforms.pointer.y;
        let r = (t + uv.x).cos() * MAX_CHANNEL_OFFSET;
        let g = (uv.x - 0.5 * t + m).sin() * MAX_CHANNEL_OFFSET;
        let b = -(3.0 * t + uv.y).cos() * MAX_CHANNEL_OFFSET;
        [Vec2::new(r, r), Vec2::new(g, g), Vec2::new(b, b)]
    }
}

impl ShadingStage for ChannelJitter {
    fn fragment(&self, texture: Option<&Texture>, uv: Vec2, uniforms: &Uniforms) -> Color {
        let Some(tex) = texture else {
            return Color::WHITE;
        };
        let base = sample_uv(tex, uv);
        if base.a == 0 {
            return base;
        }
        let [dr, dg, db] = self.offsets(uv, uniforms);
        Color::with_alpha(
            sample_uv(tex, uv + dr).r,
            sample_uv(tex, uv + dg).g,
            sample_uv(tex, uv + db).b,
            base.a,
        )
    }
}

/// Waves on the vertices, jitter on the fragments
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextShading {
    pub waves: WaveDeformation,
    pub jitter: ChannelJitter,
}

impl ShadingStage for TextShading {
    fn vertex(&self, position: Vec3, uniforms: &Uniforms) -> Vec3 {
        self.waves.vertex(position, uniforms)
    }

    fn fragment(&self, texture: Option<&Texture>, uv: Vec2, uniforms: &Uniforms) -> Color {
        self.jitter.fragment(texture, uv, uniforms)
    }
}
