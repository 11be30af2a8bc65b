//! Wheel-driven vertical scroll that wraps over a repeating strip

use super::spring::{Spring, SpringConfig};

/// How many strip heights the content repeats over
const WRAP_PERIODS: f32 = 5.0;

/// Height of one strip: `container_width * (card_width / 100) - 20`.
/// Without a container the viewport width stands in at 30%.
pub fn content_height(container_width: Option<f32>, card_width: f32, viewport_width: f32) -> f32 {
    let h = match container_width {
        Some(w) if w.is_finite() => w * (card_width / 100.0) - 20.0,
        _ => viewport_width * 0.3 - 20.0,
    };
    if h.is_finite() { h.max(0.0) } else { 0.0 }
}

/// Map an accumulated wheel offset to a bounded translateY.
/// The result always lies in `[-6h, 0]` when `h > 0`.
pub fn wrap_translate(offset: f32, h: f32) -> f32 {
    if h <= 0.0 || !h.is_finite() || !offset.is_finite() {
        return 0.0;
    }
    let base = if offset < 0.0 { -h * 6.0 } else { -h };
    // Truncated remainder keeps the sign of `offset`
    base - offset % (WRAP_PERIODS * h)
}

#[derive(Debug, Clone)]
pub struct WheelTrack {
    spring: Spring,
}

impl WheelTrack {
    pub fn new(config: SpringConfig) -> Self {
        Self {
            spring: Spring::new(0.0, config),
        }
    }

    pub fn scroll(&mut self, dy: f32) {
        if dy.is_finite() {
            self.spring.set_target(self.spring.target() + dy);
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.spring.tick(dt);
    }

    pub fn offset(&self) -> f32 {
        self.spring.value()
    }

    /// Offset the spring is heading toward
    pub fn target_offset(&self) -> f32 {
        self.spring.target()
    }

    pub fn is_resting(&self) -> bool {
        self.spring.is_resting()
    }

    pub fn translate_y(&self, h: f32) -> f32 {
        wrap_translate(self.offset(), h)
    }
}
