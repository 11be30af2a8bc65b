//! Normalized input events for the gesture surface

use crate::rasterizer::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TouchPhase {
    Start,
    Move,
    End,
    Cancel,
}

/// One active contact in client coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchPoint {
    pub id: u64,
    pub x: f32,
    pub y: f32,
}

impl TouchPoint {
    pub fn new(id: u64, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// A touch event; `touches` lists every contact still down after it
#[derive(Debug, Clone, PartialEq)]
pub struct TouchInput {
    pub phase: TouchPhase,
    pub touches: Vec<TouchPoint>,
}

impl TouchInput {
    pub fn new(phase: TouchPhase, touches: Vec<TouchPoint>) -> Self {
        Self { phase, touches }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SurfaceEvent {
    Touch(TouchInput),
    HoverEnter(Vec2),
    HoverMove(Vec2),
    HoverLeave,
    /// Vertical wheel delta in px
    Wheel { dy: f32 },
}
