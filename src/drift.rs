//! Chromatic drift: pointer angle around the viewport center, smoothed
//! into a hue rotation for the glyph layer.

use crate::input::PointerSample;
use crate::rasterizer::Vec2;

/// Fraction of the remaining distance covered per tick
pub const DAMPING: f32 = 0.075;

/// How the current angle chases the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DriftMode {
    /// Plain linear interpolation. Crossing the ±180° seam sweeps the
    /// long way round the hue circle.
    #[default]
    Linear,
    /// Interpolate along the shorter arc; `current_deg` may leave ±180°
    ShortestArc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HueState {
    pub current_deg: f32,
}

#[derive(Debug, Clone)]
pub struct DriftController {
    state: HueState,
    damping: f32,
    mode: DriftMode,
}

impl Default for DriftController {
    fn default() -> Self {
        Self::new()
    }
}

impl DriftController {
    pub fn new() -> Self {
        Self {
            state: HueState::default(),
            damping: DAMPING,
            mode: DriftMode::Linear,
        }
    }

    pub fn with_mode(mut self, mode: DriftMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn state(&self) -> HueState {
        self.state
    }

    /// Advance one tick toward the pointer's angle; returns the new hue
    pub fn update(&mut self, pointer: PointerSample, center: Vec2) -> f32 {
        let target = target_angle(pointer, center);
        let mut delta = target - self.state.current_deg;
        if self.mode == DriftMode::ShortestArc {
            delta = (delta + 180.0).rem_euclid(360.0) - 180.0;
        }
        self.state.current_deg += delta * self.damping;
        self.state.current_deg
    }

    /// CSS filter value for the current angle
    pub fn filter_css(&self) -> String {
        format!("hue-rotate({:.1}deg)", self.state.current_deg)
    }
}

/// Pointer angle around `center` in degrees; atan2(0, 0) is 0
pub fn target_angle(pointer: PointerSample, center: Vec2) -> f32 {
    let dy = pointer.y - center.y;
    let dx = pointer.x - center.x;
    if !(dx.is_finite() && dy.is_finite()) {
        return 0.0;
    }
    dy.atan2(dx).to_degrees()
}

/// Apply a `hue-rotate()` filter to an sRGB color (CSS filter matrix)
pub fn hue_rotate(rgb: [u8; 3], deg: f32) -> [u8; 3] {
    let (sin, cos) = deg.to_radians().sin_cos();
    let m = [
        [
            0.213 + cos * 0.787 - sin * 0.213,
            0.715 - cos * 0.715 - sin * 0.715,
            0.072 - cos * 0.072 + sin * 0.928,
        ],
        [
            0.213 - cos * 0.213 + sin * 0.143,
            0.715 + cos * 0.285 + sin * 0.140,
            0.072 - cos * 0.072 - sin * 0.283,
        ],
        [
            0.213 - cos * 0.213 - sin * 0.787,
            0.715 - cos * 0.715 + sin * 0.715,
            0.072 + cos * 0.928 + sin * 0.072,
        ],
    ];

    let [r, g, b] = rgb.map(|c| c as f32);
    m.map(|row| (row[0] * r + row[1] * g + row[2] * b).round().clamp(0.0, 255.0) as u8)
}

/// Glyph layer radial gradient: center, middle and edge stops
pub const GRADIENT_STOPS: [[u8; 3]; 3] = [[0xff, 0x61, 0x88], [0xfc, 0x98, 0x67], [0xff, 0xd8, 0x66]];

/// Gradient color at `t` (0 = center, 1 = farthest corner)
pub fn gradient_at(t: f32) -> [u8; 3] {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let (from, to, f) = if t < 0.5 {
        (GRADIENT_STOPS[0], GRADIENT_STOPS[1], t * 2.0)
    } else {
        (GRADIENT_STOPS[1], GRADIENT_STOPS[2], (t - 0.5) * 2.0)
    };
    [0, 1, 2].map(|i| (from[i] as f32 + (to[i] as f32 - from[i] as f32) * f).round() as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(x: f32, y: f32) -> PointerSample {
        PointerSample { x, y }
    }

    #[test]
    fn pointer_at_center_converges_to_zero() {
        let mut drift = DriftController::new();
        let center = Vec2::new(50.0, 50.0);
        drift.state.current_deg = 40.0;
        for _ in 0..400 {
            let deg = drift.update(sample(50.0, 50.0), center);
            assert!(deg.is_finite());
        }
        assert!(drift.state().current_deg.abs() < 0.01);
    }

    #[test]
    fn distance_to_target_strictly_decreases() {
        let mut drift = DriftController::new();
        let center = Vec2::new(0.0, 0.0);
        // Straight down in screen space: +90°
        let pointer = sample(0.0, 10.0);
        let mut last = (90.0 - drift.state().current_deg).abs();
        for _ in 0..60 {
            let deg = drift.update(pointer, center);
            let dist = (90.0 - deg).abs();
            assert!(dist < last);
            assert!(deg <= 90.0);
            last = dist;
        }
    }

    #[test]
    fn step_is_bounded_by_damping() {
        let mut drift = DriftController::new();
        let before = drift.state().current_deg;
        let after = drift.update(sample(-10.0, 0.0), Vec2::new(0.0, 0.0));
        assert!((after - before).abs() <= 180.0 * DAMPING + 1e-4);
    }

    #[test]
    fn shortest_arc_crosses_the_seam() {
        let mut drift = DriftController::new().with_mode(DriftMode::ShortestArc);
        drift.state.current_deg = 170.0;
        // Target about -170°: the short way is +20°
        let deg = drift.update(sample(-10.0, -1.7632), Vec2::new(0.0, 0.0));
        assert!(deg > 170.0);

        let mut linear = DriftController::new();
        linear.state.current_deg = 170.0;
        assert!(linear.update(sample(-10.0, -1.7632), Vec2::new(0.0, 0.0)) < 170.0);
    }

    #[test]
    fn filter_has_one_decimal() {
        let mut drift = DriftController::new();
        drift.state.current_deg = 12.345;
        assert_eq!(drift.filter_css(), "hue-rotate(12.3deg)");
    }

    #[test]
    fn hue_rotate_identity_and_gray() {
        assert_eq!(hue_rotate([255, 97, 136], 0.0), [255, 97, 136]);
        assert_eq!(hue_rotate([128, 128, 128], 73.0), [128, 128, 128]);
        let rotated = hue_rotate([255, 0, 0], 120.0);
        assert!(rotated[1] > rotated[0]);
    }

    #[test]
    fn gradient_hits_its_stops() {
        assert_eq!(gradient_at(0.0), GRADIENT_STOPS[0]);
        assert_eq!(gradient_at(0.5), GRADIENT_STOPS[1]);
        assert_eq!(gradient_at(1.0), GRADIENT_STOPS[2]);
        assert_eq!(gradient_at(7.0), GRADIENT_STOPS[2]);
        assert_eq!(gradient_at(f32::NAN), GRADIENT_STOPS[0]);
    }
}
