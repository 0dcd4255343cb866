//! In-memory ports for driving an engine without a browser.
//!
//! Everything here is operated by hand: the frame host only fires when told
//! to, with whatever timestamp the caller picks, so throttling can be
//! exercised against a simulated clock. Useful for tests, offline renders
//! and native embedding.
//!
//! ```ignore
//! let viewport = ManualViewport::new(1920.0, 1080.0);
//! let motion = MotionSwitch::new(false);
//! let mut engine = Engine::builder()
//!     .with_surface(RasterSurface::new(1, 1))
//!     .with_frame_host(ManualFrameHost::new())
//!     .with_viewport(Rc::new(viewport.clone()))
//!     .with_motion(Rc::new(motion.clone()))
//!     .build()?;
//! engine.start();
//!
//! let mut clock = 0.0;
//! while clock < 1000.0 {
//!     clock += 1000.0 / 144.0;
//!     engine.advance_frame(clock);
//! }
//! ```

use crate::engine::Engine;
use crate::motion::MotionSource;
use crate::scheduler::{FrameHandle, FrameHost};
use crate::subscription::{Listener, ListenerSet, Subscription};
use crate::surface::{DrawingSurface, Rgba};
use crate::viewport::{Viewport, ViewportSource};
use glam::Vec2;
use std::cell::Cell;
use std::rc::Rc;

// ============================================================================
// Frame host
// ============================================================================

/// Frame host that fires only when the caller says so.
#[derive(Debug, Default)]
pub struct ManualFrameHost {
    last_handle: i32,
    pending: Option<FrameHandle>,
    requests: usize,
    cancelled: Vec<FrameHandle>,
    refuse: bool,
}

impl ManualFrameHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// The outstanding request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        self.pending
    }

    /// Consume the outstanding request as if the display refreshed.
    pub fn fire(&mut self) -> Option<FrameHandle> {
        self.pending.take()
    }

    /// Total successful requests.
    pub fn requests(&self) -> usize {
        self.requests
    }

    /// Every handle passed to `cancel_frame`, in order.
    pub fn cancelled(&self) -> &[FrameHandle] {
        &self.cancelled
    }

    /// Make subsequent requests fail.
    pub fn set_refuse(&mut self, refuse: bool) {
        self.refuse = refuse;
    }
}

impl FrameHost for ManualFrameHost {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        if self.refuse {
            return None;
        }
        self.last_handle += 1;
        let handle = FrameHandle(self.last_handle);
        self.pending = Some(handle);
        self.requests += 1;
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if self.pending == Some(handle) {
            self.pending = None;
        }
        self.cancelled.push(handle);
    }
}

impl<S: DrawingSurface> Engine<S, ManualFrameHost> {
    /// Fire the pending frame request at `timestamp`.
    ///
    /// Returns `false` when no request was outstanding.
    pub fn advance_frame(&mut self, timestamp: f64) -> bool {
        if self.host_mut().fire().is_none() {
            return false;
        }
        self.on_frame(timestamp);
        true
    }
}

// ============================================================================
// Viewport
// ============================================================================

/// Viewport whose size is set by hand. Clones share state.
#[derive(Clone, Debug)]
pub struct ManualViewport {
    size: Rc<Cell<Viewport>>,
    listeners: ListenerSet,
}

impl ManualViewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Rc::new(Cell::new(Viewport::new(width, height))),
            listeners: ListenerSet::new(),
        }
    }

    /// Change the size and fire a resize event, even if nothing changed.
    pub fn set_size(&self, width: f32, height: f32) {
        self.size.set(Viewport::new(width, height));
        self.listeners.notify();
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ViewportSource for ManualViewport {
    fn size(&self) -> Viewport {
        self.size.get()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

// ============================================================================
// Motion preference
// ============================================================================

/// Reduced-motion flag flipped by hand. Clones share state.
#[derive(Clone, Debug)]
pub struct MotionSwitch {
    reduced: Rc<Cell<bool>>,
    listeners: ListenerSet,
}

impl MotionSwitch {
    pub fn new(reduced: bool) -> Self {
        Self {
            reduced: Rc::new(Cell::new(reduced)),
            listeners: ListenerSet::new(),
        }
    }

    /// Set the preference; listeners fire only on an actual change.
    pub fn set(&self, reduced: bool) {
        if self.reduced.replace(reduced) != reduced {
            self.listeners.notify();
        }
    }

    /// Number of subscribed listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl MotionSource for MotionSwitch {
    fn reduced_motion(&self) -> bool {
        self.reduced.get()
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        self.listeners.add(listener)
    }
}

// ============================================================================
// Recording surface
// ============================================================================

/// One recorded `fill_circle` call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleCall {
    pub center: Vec2,
    pub radius: f32,
    pub color: Rgba,
}

/// Surface that logs draw calls instead of rasterizing.
#[derive(Clone, Debug, Default)]
pub struct RecordingSurface {
    size: (u32, u32),
    resizes: usize,
    clears: usize,
    circles: Vec<CircleCall>,
    visible_from: usize,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dimensions from the last `set_size`.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Number of `set_size` calls.
    pub fn resizes(&self) -> usize {
        self.resizes
    }

    /// Number of `clear` calls.
    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Every circle ever drawn.
    pub fn circles(&self) -> &[CircleCall] {
        &self.circles
    }

    /// Circles drawn since the surface was last cleared or resized.
    pub fn visible(&self) -> &[CircleCall] {
        &self.circles[self.visible_from..]
    }

    /// Whether nothing is currently painted.
    pub fn is_blank(&self) -> bool {
        self.visible().is_empty()
    }
}

impl DrawingSurface for RecordingSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
        self.resizes += 1;
        self.visible_from = self.circles.len();
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.visible_from = self.circles.len();
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.circles.push(CircleCall {
            center,
            radius,
            color,
        });
    }
}
