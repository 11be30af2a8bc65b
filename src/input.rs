//! Pointer event source
//!
//! The host feeds raw pointer positions into a `PointerHub`; consumers hold
//! a `PointerSubscription` whose slot always contains the latest sample.
//! There is no queue: every publish overwrites. Dropping a subscription
//! deregisters it, so a disposed effect can never be written to again.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use tracing::trace;

/// Pointer position in device-pixel-ratio scaled coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    pub x: f32,
    pub y: f32,
}

struct HubInner {
    next_id: u64,
    pixel_ratio: f32,
    listeners: Vec<(u64, Rc<Cell<PointerSample>>)>,
}

/// Single-threaded pointer broadcast
#[derive(Clone)]
pub struct PointerHub {
    inner: Rc<RefCell<HubInner>>,
}

impl PointerHub {
    pub fn new(pixel_ratio: f32) -> Self {
        let pixel_ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
        Self {
            inner: Rc::new(RefCell::new(HubInner {
                next_id: 0,
                pixel_ratio,
                listeners: Vec::new(),
            })),
        }
    }

    /// Record a pointer move in client coordinates. Non-finite input is dropped.
    pub fn publish(&self, client_x: f32, client_y: f32) {
        if !(client_x.is_finite() && client_y.is_finite()) {
            return;
        }
        let inner = self.inner.borrow();
        let sample = PointerSample {
            x: client_x * inner.pixel_ratio,
            y: client_y * inner.pixel_ratio,
        };
        for (_, slot) in &inner.listeners {
            slot.set(sample);
        }
    }

    /// Register a listener whose slot starts at `initial`
    pub fn subscribe(&self, initial: PointerSample) -> PointerSubscription {
        let mut inner = self.inner.borrow_mut();
        let id = inner.next_id;
        inner.next_id += 1;
        let slot = Rc::new(Cell::new(initial));
        inner.listeners.push((id, Rc::clone(&slot)));
        trace!(id, "pointer listener registered");

        PointerSubscription {
            id,
            hub: Rc::downgrade(&self.inner),
            slot,
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

/// Live registration with a `PointerHub`
pub struct PointerSubscription {
    id: u64,
    hub: Weak<RefCell<HubInner>>,
    slot: Rc<Cell<PointerSample>>,
}

impl PointerSubscription {
    pub fn latest(&self) -> PointerSample {
        self.slot.get()
    }

    /// Overwrite the slot (e.g. recenter after a resize)
    pub fn reset(&self, sample: PointerSample) {
        self.slot.set(sample);
    }
}

impl Drop for PointerSubscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            hub.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            trace!(id = self.id, "pointer listener removed");
        }
    }
}
