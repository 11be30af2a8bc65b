//! Frame-driven one-shot timer

use std::time::Duration;

/// Fires once after `after` has elapsed, counted in frame deltas.
/// Cancelling before it fires guarantees it never will.
#[derive(Debug, Clone)]
pub struct Timeout {
    after: Duration,
    elapsed: Duration,
    state: TimeoutState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TimeoutState {
    Pending,
    Fired,
    Cancelled,
}

impl Timeout {
    pub fn new(after: Duration) -> Self {
        Self {
            after,
            elapsed: Duration::ZERO,
            state: TimeoutState::Pending,
        }
    }

    pub fn from_millis(ms: u64) -> Self {
        Self::new(Duration::from_millis(ms))
    }

    /// Add a frame delta (seconds). Returns true on the one tick it fires.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.state != TimeoutState::Pending {
            return false;
        }
        if dt.is_finite() && dt > 0.0 {
            self.elapsed += Duration::from_secs_f32(dt);
        }
        if self.elapsed >= self.after {
            self.state = TimeoutState::Fired;
            return true;
        }
        false
    }

    pub fn cancel(&mut self) {
        if self.state == TimeoutState::Pending {
            self.state = TimeoutState::Cancelled;
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == TimeoutState::Pending
    }

    pub fn has_fired(&self) -> bool {
        self.state == TimeoutState::Fired
    }

    /// 0.0 at start, 1.0 once due
    pub fn progress(&self) -> f32 {
        if self.after.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.after.as_secs_f32()).min(1.0)
    }
}
