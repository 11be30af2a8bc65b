//! Damped spring animation
//!
//! Values never jump to their target: each tick integrates
//! `a = (-tension * (x - target) - friction * v) / mass`
//! in fixed 1 ms sub-steps (semi-implicit Euler).

use serde::{Deserialize, Serialize};

/// Integration sub-step in seconds
const STEP: f32 = 0.001;
/// Longest frame the spring will integrate (longer gaps are treated as this)
const MAX_DT: f32 = 0.064;
/// Distance and speed below which a spring counts as resting
const REST_EPSILON: f32 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringConfig {
    pub mass: f32,
    pub tension: f32,
    pub friction: f32,
}

impl SpringConfig {
    pub const fn new(mass: f32, tension: f32, friction: f32) -> Self {
        Self { mass, tension, friction }
    }
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self::new(1.0, 170.0, 26.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    value: f32,
    velocity: f32,
    target: f32,
    config: SpringConfig,
}

impl Spring {
    pub fn new(value: f32, config: SpringConfig) -> Self {
        Self {
            value,
            velocity: 0.0,
            target: value,
            config,
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Retarget; the rendered value keeps its position and velocity
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    pub fn is_resting(&self) -> bool {
        (self.value - self.target).abs() < REST_EPSILON && self.velocity.abs() < REST_EPSILON
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        if !dt.is_finite() || dt <= 0.0 || self.is_resting() {
            return;
        }

        let mass = self.config.mass.max(0.001);
        let mut remaining = dt.min(MAX_DT);
        while remaining > 0.0 {
            let h = remaining.min(STEP);
            let spring_force = -self.config.tension * (self.value - self.target);
            let damping_force = -self.config.friction * self.velocity;
            self.velocity += (spring_force + damping_force) / mass * h;
            self.value += self.velocity * h;
            remaining -= h;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retarget_is_not_instant() {
        let mut s = Spring::new(0.0, SpringConfig::default());
        s.set_target(100.0);
        assert_eq!(s.value(), 0.0);
        s.tick(1.0 / 60.0);
        assert!(s.value() > 0.0);
        assert!(s.value() < 100.0);
    }

    #[test]
    fn retarget_keeps_momentum() {
        let mut s = Spring::new(0.0, SpringConfig::default());
        s.set_target(100.0);
        s.tick(0.05);
        let v = s.velocity();
        assert!(v > 0.0);
        s.set_target(-100.0);
        assert_eq!(s.velocity(), v);
        s.tick(0.2);
        assert!(s.velocity() < v);
    }

    #[test]
    fn settles_on_target() {
        let mut s = Spring::new(0.0, SpringConfig::new(5.0, 350.0, 40.0));
        s.set_target(50.0);
        for _ in 0..600 {
            s.tick(1.0 / 60.0);
        }
        assert!((s.value() - 50.0).abs() < 0.01);
    }

    #[test]
    fn long_frames_are_clamped() {
        let mut a = Spring::new(0.0, SpringConfig::default());
        let mut b = a;
        a.set_target(10.0);
        b.set_target(10.0);
        a.tick(10.0);
        b.tick(MAX_DT);
        assert!((a.value() - b.value()).abs() < 1e-4);
    }

    #[test]
    fn resting_spring_ignores_ticks() {
        let mut s = Spring::new(3.0, SpringConfig::default());
        assert!(s.is_resting());
        s.tick(0.016);
        assert_eq!(s.value(), 3.0);
        s.set_target(f32::NAN);
        assert_eq!(s.target(), 3.0);
    }
}
