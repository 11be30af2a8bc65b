//! Gesture transform engine
//!
//! Turns hover, touch and wheel input into a spring-animated transform for
//! a surface ("card"). Each touch session is one of idle, dragging or
//! pinching; a new touch start always replaces the current session.
//!
//! Hover and touch are separate channels: while any touch is down, hover
//! events are ignored, so a finger resting on a hybrid device never fights
//! the mouse.

mod events;
mod spring;
mod transform;
mod wheel;

pub use events::*;
pub use spring::*;
pub use transform::*;
pub use wheel::*;

use tracing::{debug, trace};

use crate::config::GestureOptions;
use crate::rasterizer::{Vec2, Vec3};

/// Lowest zoom contribution; keeps `scale + zoom` at or above 0.1
const MIN_ZOOM: f32 = -0.9;

/// Where the surface sits, in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceBounds {
    /// Center of the surface's container
    pub center: Vec2,
    /// Container width, when one is laid out
    pub container_width: Option<f32>,
    pub viewport_width: f32,
}

impl Default for SurfaceBounds {
    fn default() -> Self {
        Self {
            center: Vec2::default(),
            container_width: None,
            viewport_width: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GestureSession {
    Idle,
    Dragging {
        /// Touch position when the drag began
        origin: Vec2,
        /// Surface translation when the drag began
        baseline: Vec2,
    },
    Pinching {
        start_distance: f32,
        /// Radians
        start_angle: f32,
        initial_zoom: f32,
        initial_rotate_z: f32,
    },
}

pub struct GestureEngine {
    options: GestureOptions,
    bounds: SurfaceBounds,
    transform: AnimatedTransform,
    wheel: WheelTrack,
    session: GestureSession,
    active_touches: usize,
    hovering: bool,
}

impl GestureEngine {
    pub fn new(options: GestureOptions) -> Self {
        Self {
            transform: AnimatedTransform::new(options.animation_config),
            wheel: WheelTrack::new(options.wheel_config),
            options,
            bounds: SurfaceBounds::default(),
            session: GestureSession::Idle,
            active_touches: 0,
            hovering: false,
        }
    }

    pub fn set_bounds(&mut self, bounds: SurfaceBounds) {
        self.bounds = bounds;
    }

    pub fn options(&self) -> &GestureOptions {
        &self.options
    }

    pub fn session(&self) -> GestureSession {
        self.session
    }

    pub fn is_hovering(&self) -> bool {
        self.hovering
    }

    pub fn handle(&mut self, event: &SurfaceEvent) {
        match event {
            SurfaceEvent::Touch(input) => self.on_touch(input),
            SurfaceEvent::HoverEnter(p) => {
                if self.touch_active() {
                    return;
                }
                self.hovering = true;
                self.transform.start(TransformTarget {
                    scale: Some(self.options.hover_scale),
                    ..Default::default()
                });
                self.on_hover(*p);
            }
            SurfaceEvent::HoverMove(p) => {
                if self.touch_active() {
                    return;
                }
                if !self.hovering {
                    self.handle(&SurfaceEvent::HoverEnter(*p));
                    return;
                }
                self.on_hover(*p);
            }
            SurfaceEvent::HoverLeave => {
                if !self.hovering {
                    return;
                }
                self.hovering = false;
                self.transform.start(TransformTarget {
                    rotate_x: Some(0.0),
                    rotate_y: Some(0.0),
                    scale: Some(1.0),
                    ..Default::default()
                });
            }
            SurfaceEvent::Wheel { dy } => self.wheel.scroll(*dy),
        }
    }

    /// Advance every spring by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.transform.tick(dt);
        self.wheel.tick(dt);
    }

    /// Rendered transform as of the last tick
    pub fn state(&self) -> TransformState {
        TransformState {
            translation: self.transform.translation(),
            rotation: self.transform.rotation(),
            scale: self.transform.scale(),
            zoom: self.transform.zoom(),
            wheel_offset: self.wheel.offset(),
        }
    }

    /// Where the springs are heading
    pub fn target(&self) -> TransformState {
        TransformState {
            wheel_offset: self.wheel.target_offset(),
            ..self.transform.target()
        }
    }

    pub fn is_resting(&self) -> bool {
        self.transform.is_resting() && self.wheel.is_resting()
    }

    pub fn style(&self) -> SurfaceStyle {
        let rotation = self.transform.rotation();
        let (rx, ry) = if self.options.enable_tilt { (rotation.x, rotation.y) } else { (0.0, 0.0) };
        let rz = if self.options.enable_zoom { rotation.z } else { 0.0 };
        let h = content_height(self.bounds.container_width, self.options.card_width, self.bounds.viewport_width);

        SurfaceStyle {
            perspective: self.options.perspective,
            translate: self.transform.translation(),
            scale: self.transform.scale() + self.transform.zoom(),
            rotate: Vec3::new(rx, ry, rz),
            content_translate_y: self.wheel.translate_y(h),
        }
    }

    fn touch_active(&self) -> bool {
        self.active_touches > 0 || self.session != GestureSession::Idle
    }

    fn on_hover(&mut self, p: Vec2) {
        if !self.options.enable_tilt {
            return;
        }
        let rf = self.options.rotation_factor;
        if rf == 0.0 || !rf.is_finite() || !(p.x.is_finite() && p.y.is_finite()) {
            return;
        }
        let t = self.transform.translation();
        let cx = self.bounds.center.x + self.options.offset_x;
        let cy = self.bounds.center.y;
        self.transform.start(TransformTarget {
            rotate_x: Some(-(p.y - t.y - cy) / rf),
            rotate_y: Some((p.x - t.x - cx) / rf),
            ..Default::default()
        });
    }

    fn on_touch(&mut self, input: &TouchInput) {
        self.active_touches = input.touches.len();
        if !self.options.enable_drag {
            return;
        }

        match input.phase {
            TouchPhase::Start => self.begin_session(&input.touches),
            TouchPhase::Move => self.continue_session(&input.touches),
            TouchPhase::End | TouchPhase::Cancel => {
                let still_valid = match self.session {
                    GestureSession::Idle => true,
                    GestureSession::Dragging { .. } => input.touches.len() == 1,
                    GestureSession::Pinching { .. } => input.touches.len() >= 2,
                };
                if !still_valid {
                    debug!(phase = ?input.phase, remaining = input.touches.len(), "gesture session ended");
                    self.session = GestureSession::Idle;
                }
            }
        }
    }

    fn begin_session(&mut self, touches: &[TouchPoint]) {
        self.hovering = false;
        self.session = match touches {
            [t] => GestureSession::Dragging {
                origin: t.position(),
                baseline: self.transform.translation(),
            },
            [a, b, ..] if self.options.enable_zoom => {
                let (distance, angle) = pinch_geometry(a, b);
                GestureSession::Pinching {
                    start_distance: distance,
                    start_angle: angle,
                    initial_zoom: self.transform.zoom(),
                    initial_rotate_z: self.transform.rotation().z,
                }
            }
            _ => GestureSession::Idle,
        };
        debug!(session = ?self.session, "gesture session started");
    }

    fn continue_session(&mut self, touches: &[TouchPoint]) {
        match (self.session, touches) {
            (GestureSession::Dragging { origin, baseline }, [t]) => {
                let moved = t.position() - origin;
                let target = baseline + moved;
                trace!(x = target.x, y = target.y, "drag");
                self.transform.start(TransformTarget {
                    x: Some(target.x),
                    y: Some(target.y),
                    rotate_x: Some(0.0),
                    rotate_y: Some(0.0),
                    scale: Some(1.0),
                    ..Default::default()
                });
            }
            (
                GestureSession::Pinching {
                    start_distance,
                    start_angle,
                    initial_zoom,
                    initial_rotate_z,
                },
                [a, b, ..],
            ) => {
                let (distance, angle) = pinch_geometry(a, b);
                let sensitivity = if self.options.zoom_sensitivity > 0.0 {
                    self.options.zoom_sensitivity
                } else {
                    1.0
                };
                let zoom = (initial_zoom + (distance - start_distance) / sensitivity).max(MIN_ZOOM);
                let rotate_z = initial_rotate_z + (angle - start_angle).to_degrees();
                trace!(zoom, rotate_z, "pinch");
                self.transform.start(TransformTarget {
                    zoom: Some(zoom),
                    rotate_z: Some(rotate_z),
                    ..Default::default()
                });
            }
            _ => {}
        }
    }
}

/// Distance and angle (radians) between two contacts
fn pinch_geometry(a: &TouchPoint, b: &TouchPoint) -> (f32, f32) {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx.hypot(dy), dy.atan2(dx))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> GestureEngine {
        let mut e = GestureEngine::new(GestureOptions::default());
        e.set_bounds(SurfaceBounds {
            center: Vec2::new(200.0, 150.0),
            container_width: Some(400.0),
            viewport_width: 1024.0,
        });
        e
    }

    fn touch(phase: TouchPhase, points: &[(u64, f32, f32)]) -> SurfaceEvent {
        SurfaceEvent::Touch(TouchInput::new(
            phase,
            points.iter().map(|&(id, x, y)| TouchPoint::new(id, x, y)).collect(),
        ))
    }

    fn settle(e: &mut GestureEngine) {
        for _ in 0..600 {
            e.tick(1.0 / 60.0);
        }
    }

    #[test]
    fn drag_moves_and_release_keeps_position() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 10.0, 10.0)]));
        assert!(matches!(e.session(), GestureSession::Dragging { .. }));
        e.handle(&touch(TouchPhase::Move, &[(1, 60.0, 30.0)]));
        e.tick(1.0 / 60.0);
        // Springs never snap
        assert!(e.state().translation.x < 50.0);
        e.handle(&touch(TouchPhase::End, &[]));
        assert_eq!(e.session(), GestureSession::Idle);
        settle(&mut e);

        let t = e.state().translation;
        assert!((t.x - 50.0).abs() < 0.05);
        assert!((t.y - 20.0).abs() < 0.05);
    }

    #[test]
    fn second_drag_continues_from_resting_place() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0)]));
        e.handle(&touch(TouchPhase::Move, &[(1, 30.0, 0.0)]));
        e.handle(&touch(TouchPhase::End, &[]));
        settle(&mut e);

        e.handle(&touch(TouchPhase::Start, &[(2, 100.0, 100.0)]));
        e.handle(&touch(TouchPhase::Move, &[(2, 110.0, 100.0)]));
        assert!((e.target().translation.x - 40.0).abs() < 0.05);
    }

    #[test]
    fn hover_tilts_toward_pointer_and_scales() {
        let mut e = engine();
        // Pointer right of and below the pivot (center.x + offset_x)
        e.handle(&SurfaceEvent::HoverEnter(Vec2::new(260.0, 190.0)));
        let target = e.target();
        assert_eq!(target.scale, 1.1);
        assert!((target.rotation.y - 2.0).abs() < 1e-4);
        assert!((target.rotation.x + 2.0).abs() < 1e-4);

        e.handle(&SurfaceEvent::HoverLeave);
        let target = e.target();
        assert_eq!(target.scale, 1.0);
        assert_eq!(target.rotation.x, 0.0);
        assert_eq!(target.rotation.y, 0.0);
    }

    #[test]
    fn hover_is_ignored_while_touching() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0)]));
        e.handle(&SurfaceEvent::HoverMove(Vec2::new(400.0, 400.0)));
        assert!(!e.is_hovering());
        assert_eq!(e.target().rotation.y, 0.0);
        assert_eq!(e.target().scale, 1.0);
    }

    #[test]
    fn pinch_spreading_zooms_in() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 100.0, 100.0), (2, 200.0, 100.0)]));
        assert!(matches!(e.session(), GestureSession::Pinching { .. }));
        e.handle(&touch(TouchPhase::Move, &[(1, 50.0, 100.0), (2, 250.0, 100.0)]));
        let target = e.target();
        assert!((target.zoom - 0.5).abs() < 1e-4);
        assert!(target.rotation.z.abs() < 1e-3);
        settle(&mut e);
        assert!(e.style().scale > 1.4);
    }

    #[test]
    fn pinch_twist_rotates() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
        e.handle(&touch(TouchPhase::Move, &[(1, 0.0, 0.0), (2, 0.0, 100.0)]));
        assert!((e.target().rotation.z - 90.0).abs() < 1e-3);
    }

    #[test]
    fn lifting_a_finger_ends_the_pinch() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
        e.handle(&touch(TouchPhase::End, &[(1, 0.0, 0.0)]));
        assert_eq!(e.session(), GestureSession::Idle);
        // The remaining finger does not start a drag until a new touch start
        e.handle(&touch(TouchPhase::Move, &[(1, 40.0, 0.0)]));
        assert_eq!(e.target().translation, Vec2::default());
    }

    #[test]
    fn new_touch_start_replaces_the_session() {
        let mut e = engine();
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0), (2, 100.0, 0.0)]));
        e.handle(&touch(TouchPhase::Start, &[(3, 5.0, 5.0)]));
        assert!(matches!(e.session(), GestureSession::Dragging { .. }));
    }

    #[test]
    fn disabled_drag_ignores_touch() {
        let mut e = GestureEngine::new(GestureOptions {
            enable_drag: false,
            ..GestureOptions::default()
        });
        e.handle(&touch(TouchPhase::Start, &[(1, 0.0, 0.0)]));
        e.handle(&touch(TouchPhase::Move, &[(1, 50.0, 50.0)]));
        assert_eq!(e.session(), GestureSession::Idle);
        assert_eq!(e.target().translation, Vec2::default());
    }

    #[test]
    fn disabled_tilt_zeroes_style_rotation() {
        let mut e = GestureEngine::new(GestureOptions {
            enable_tilt: false,
            ..GestureOptions::default()
        });
        e.handle(&SurfaceEvent::HoverEnter(Vec2::new(500.0, 500.0)));
        settle(&mut e);
        let style = e.style();
        assert_eq!(style.rotate.x, 0.0);
        assert_eq!(style.rotate.y, 0.0);
        assert!(style.scale > 1.05);
    }

    #[test]
    fn wheel_translation_stays_bounded() {
        let mut e = engine();
        // 400 * (200 / 100) - 20
        let h = 780.0;
        for dy in [-5000.0, 12000.0, -300.0, 90000.0] {
            e.handle(&SurfaceEvent::Wheel { dy });
            for _ in 0..20 {
                e.tick(1.0 / 60.0);
                let y = e.style().content_translate_y;
                assert!(y <= 0.0 && y >= -6.0 * h - 1.0);
            }
        }
    }

    #[test]
    fn wheel_scroll_counts_until_settled() {
        let mut e = engine();
        assert!(e.is_resting());
        e.handle(&SurfaceEvent::Wheel { dy: -250.0 });
        assert_eq!(e.target().wheel_offset, -250.0);
        assert_eq!(e.state().wheel_offset, 0.0);
        assert!(!e.is_resting());
        settle(&mut e);
        assert!(e.is_resting());
        assert!((e.state().wheel_offset + 250.0).abs() < 0.01);
    }
}
