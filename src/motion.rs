//! The reduced-motion accessibility gate.
//!
//! The engine keeps no copy of the preference. [`MotionGate`] reads the live
//! value from its [`MotionSource`] each time it is evaluated and then either
//! lets the scheduler run or stops it and wipes the surface, so a user who
//! asks for less motion sees a blank backdrop rather than a frozen frame.

use crate::scheduler::{FrameHost, FrameScheduler};
use crate::subscription::{Listener, Subscription};
use crate::surface::DrawingSurface;
use std::fmt;
use std::rc::Rc;
use tracing::info;

/// Media query used by browsers for the preference.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Live "user prefers reduced motion" signal.
pub trait MotionSource {
    /// Whether reduced motion is currently requested.
    fn reduced_motion(&self) -> bool;

    /// Call `listener` whenever the preference changes.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

/// Outcome of evaluating the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MotionDecision {
    /// Motion allowed; the scheduler is running (if the host accepted).
    Animate,
    /// Reduced motion; scheduler stopped and surface cleared.
    Still,
}

/// Starts or stops frame scheduling according to the motion preference.
#[derive(Clone)]
pub struct MotionGate {
    source: Rc<dyn MotionSource>,
}

impl MotionGate {
    pub fn new(source: Rc<dyn MotionSource>) -> Self {
        Self { source }
    }

    /// Whether animation is currently allowed.
    pub fn allows_motion(&self) -> bool {
        !self.source.reduced_motion()
    }

    /// The underlying preference source.
    pub fn source(&self) -> &Rc<dyn MotionSource> {
        &self.source
    }

    /// Apply the current preference.
    pub fn apply<H, S>(
        &self,
        scheduler: &mut FrameScheduler,
        host: &mut H,
        surface: &mut S,
    ) -> MotionDecision
    where
        H: FrameHost + ?Sized,
        S: DrawingSurface + ?Sized,
    {
        if self.allows_motion() {
            if !scheduler.is_scheduled() {
                info!("motion allowed, starting animation");
            }
            scheduler.start(host);
            MotionDecision::Animate
        } else {
            if scheduler.is_scheduled() {
                info!("reduced motion requested, stopping animation");
            }
            scheduler.stop(host);
            surface.clear();
            MotionDecision::Still
        }
    }
}

impl fmt::Debug for MotionGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MotionGate")
            .field("reduced_motion", &self.source.reduced_motion())
            .finish()
    }
}
