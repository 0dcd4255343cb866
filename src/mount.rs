//! Wiring an engine to its event sources.
//!
//! [`mount`] moves an [`Engine`] behind `Rc<RefCell<_>>` and subscribes it
//! to viewport resizes and motion-preference changes. The listeners hold
//! only weak references, so dropping the [`Mounted`] handle releases the
//! engine even if a source outlives it. [`Mounted::teardown`] unsubscribes
//! every listener and stops the animation; dropping the handle does the same.
//!
//! All sources are expected to notify from the same thread that drives
//! frames, and never while the engine is already borrowed.

use crate::engine::Engine;
use crate::motion::MotionDecision;
use crate::scheduler::FrameHost;
use crate::subscription::Subscription;
use crate::surface::DrawingSurface;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{info, warn};

/// Shared handle to a mounted engine.
pub type SharedEngine<S, H> = Rc<RefCell<Engine<S, H>>>;

/// An engine subscribed to its viewport and motion sources.
pub struct Mounted<S: DrawingSurface + 'static, H: FrameHost + 'static> {
    engine: SharedEngine<S, H>,
    subscriptions: Vec<Subscription>,
    detached: bool,
}

/// Subscribe `engine` to its sources. Call [`Mounted::start`] to begin.
pub fn mount<S, H>(engine: Engine<S, H>) -> Mounted<S, H>
where
    S: DrawingSurface + 'static,
    H: FrameHost + 'static,
{
    let viewport = engine.viewport_source();
    let motion = engine.motion_source();
    let engine = Rc::new(RefCell::new(engine));

    let on_resize = listener(&engine, |e| {
        e.resize();
    });
    let on_motion = listener(&engine, |e| {
        e.on_motion_changed();
    });

    let subscriptions = vec![viewport.subscribe(on_resize), motion.subscribe(on_motion)];
    info!("particle backdrop mounted");

    Mounted {
        engine,
        subscriptions,
        detached: false,
    }
}

fn listener<S, H>(
    engine: &SharedEngine<S, H>,
    action: impl Fn(&mut Engine<S, H>) + 'static,
) -> Box<dyn FnMut()>
where
    S: DrawingSurface + 'static,
    H: FrameHost + 'static,
{
    let weak: Weak<RefCell<Engine<S, H>>> = Rc::downgrade(engine);
    Box::new(move || {
        let Some(engine) = weak.upgrade() else {
            return;
        };
        match engine.try_borrow_mut() {
            Ok(mut engine) => action(&mut *engine),
            Err(_) => warn!("engine busy, dropping re-entrant notification"),
        };
    })
}

impl<S: DrawingSurface + 'static, H: FrameHost + 'static> Mounted<S, H> {
    /// Run the startup sequence.
    pub fn start(&self) -> MotionDecision {
        self.engine.borrow_mut().start()
    }

    /// The shared engine, e.g. for the host's frame callback.
    pub fn engine(&self) -> &SharedEngine<S, H> {
        &self.engine
    }

    /// Whether the event listeners are still registered.
    pub fn is_subscribed(&self) -> bool {
        self.subscriptions.iter().any(Subscription::is_active)
    }

    /// Unsubscribe from all sources and stop animating.
    pub fn teardown(mut self) -> SharedEngine<S, H> {
        self.detach();
        Rc::clone(&self.engine)
    }

    fn detach(&mut self) {
        if self.detached {
            return;
        }
        self.detached = true;

        for subscription in self.subscriptions.drain(..) {
            subscription.unsubscribe();
        }
        // The pending frame must be cancelled while the host is still alive.
        match self.engine.try_borrow_mut() {
            Ok(mut engine) => engine.stop(),
            Err(_) => warn!("engine busy during teardown, frame not cancelled"),
        }
        info!("particle backdrop torn down");
    }
}

impl<S: DrawingSurface + 'static, H: FrameHost + 'static> Drop for Mounted<S, H> {
    fn drop(&mut self) {
        self.detach();
    }
}
