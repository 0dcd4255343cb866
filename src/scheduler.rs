//! Frame scheduling against a host's animation callback.
//!
//! The engine never loops on its own. It asks a [`FrameHost`] for one
//! callback at a time; when the host fires it, the engine does its work and
//! asks for the next. [`FrameScheduler`] tracks whether such a request is
//! outstanding and which handle cancels it.
//!
//! ```text
//!            start()                    frame fired → renew()
//!   Idle ───────────────▶ Scheduled ◀──────────────┐
//!    ▲                       │    └────────────────┘
//!    └───────────────────────┘
//!            stop()
//! ```

use tracing::warn;

/// Host-issued identifier of a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub i32);

/// The host's request/cancel pair for display-refresh callbacks.
///
/// After a successful [`request_frame`](FrameHost::request_frame) the host
/// must eventually call [`Engine::on_frame`](crate::Engine::on_frame) once
/// with its timestamp in milliseconds, unless the request is cancelled.
/// It may also never fire (e.g. a backgrounded page); the engine then
/// simply stays idle.
pub trait FrameHost {
    /// Ask for a callback at the next refresh opportunity.
    ///
    /// Returns `None` if the host cannot schedule one.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a pending request. Unknown or already-fired handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

impl<H: FrameHost + ?Sized> FrameHost for Box<H> {
    fn request_frame(&mut self) -> Option<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }
}

/// Whether a frame request is outstanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    /// Nothing pending.
    Idle,
    /// A callback was requested and not yet fired or cancelled.
    Scheduled(FrameHandle),
}

/// Two-state frame request tracker.
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    state: SchedulerState,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
        }
    }

    #[inline]
    pub fn state(&self) -> SchedulerState {
        self.state
    }

    #[inline]
    pub fn is_scheduled(&self) -> bool {
        matches!(self.state, SchedulerState::Scheduled(_))
    }

    /// The handle of the outstanding request, if any.
    pub fn pending(&self) -> Option<FrameHandle> {
        match self.state {
            SchedulerState::Scheduled(handle) => Some(handle),
            SchedulerState::Idle => None,
        }
    }

    /// Request a frame unless one is already pending.
    ///
    /// Returns whether the scheduler is `Scheduled` afterwards.
    pub fn start<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if self.is_scheduled() {
            return true;
        }
        self.request(host)
    }

    /// Request the follow-up frame after the pending one fired.
    ///
    /// The fired handle is spent, so it is replaced without cancelling.
    /// Returns whether the scheduler is `Scheduled` afterwards.
    pub fn renew<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        self.request(host)
    }

    /// Cancel the pending request, if any. Idempotent.
    pub fn stop<H: FrameHost + ?Sized>(&mut self, host: &mut H) {
        if let SchedulerState::Scheduled(handle) = self.state {
            host.cancel_frame(handle);
        }
        self.state = SchedulerState::Idle;
    }

    fn request<H: FrameHost + ?Sized>(&mut self, host: &mut H) -> bool {
        match host.request_frame() {
            Some(handle) => {
                self.state = SchedulerState::Scheduled(handle);
                true
            }
            None => {
                warn!("frame host refused a frame request; animation stays idle");
                self.state = SchedulerState::Idle;
                false
            }
        }
    }
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}
