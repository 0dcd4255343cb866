//! Engine builder and runtime.
//!
//! [`Engine`] composes the store, the throttle, the scheduler and the
//! motion gate around four host ports. It has three entry points, all
//! called from the host's single UI thread:
//!
//! - [`Engine::resize`] on every viewport-size event,
//! - [`Engine::on_motion_changed`] on every preference change,
//! - [`Engine::on_frame`] when the host fires a requested frame.
//!
//! [`Engine::start`] runs the startup sequence once: size the surface,
//! populate the store, and start animating unless reduced motion is on.

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::motion::{MotionDecision, MotionGate, MotionSource};
use crate::scheduler::{FrameHost, FrameScheduler, SchedulerState};
use crate::spawn::SpawnContext;
use crate::store::ParticleStore;
use crate::surface::DrawingSurface;
use crate::time::FrameThrottle;
use crate::viewport::{Viewport, ViewportSource};
use std::rc::Rc;
use tracing::{debug, info, trace};

/// Builder for an [`Engine`].
///
/// Use method chaining to provide the ports, then call `.build()`.
pub struct EngineBuilder<S, H> {
    config: EngineConfig,
    surface: Option<S>,
    host: Option<H>,
    viewport: Option<Rc<dyn ViewportSource>>,
    motion: Option<Rc<dyn MotionSource>>,
}

impl<S: DrawingSurface, H: FrameHost> EngineBuilder<S, H> {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            surface: None,
            host: None,
            viewport: None,
            motion: None,
        }
    }

    /// Replace the default configuration.
    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the drawing surface.
    pub fn with_surface(mut self, surface: S) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Set the frame-scheduling host.
    pub fn with_frame_host(mut self, host: H) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the viewport dimension source.
    pub fn with_viewport(mut self, viewport: Rc<dyn ViewportSource>) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Set the reduced-motion preference source.
    pub fn with_motion(mut self, motion: Rc<dyn MotionSource>) -> Self {
        self.motion = Some(motion);
        self
    }

    /// Validate the config and assemble the engine. Nothing is drawn or
    /// scheduled until [`Engine::start`].
    pub fn build(self) -> Result<Engine<S, H>, EngineError> {
        self.config.validate()?;
        let surface = self.surface.ok_or_else(|| {
            EngineError::SurfaceUnavailable("no drawing surface provided".to_string())
        })?;
        let host = self.host.ok_or(EngineError::MissingFrameHost)?;
        let viewport_source = self.viewport.ok_or(EngineError::MissingViewport)?;
        let motion = self.motion.ok_or(EngineError::MissingMotionSource)?;

        Ok(Engine {
            spawn: SpawnContext::new(self.config.seed),
            throttle: FrameThrottle::new(self.config.frame_interval_ms()),
            config: self.config,
            surface,
            host,
            viewport_source,
            gate: MotionGate::new(motion),
            viewport: Viewport::default(),
            store: ParticleStore::new(),
            scheduler: FrameScheduler::new(),
            generation: 0,
        })
    }
}

impl<S: DrawingSurface, H: FrameHost> Default for EngineBuilder<S, H> {
    fn default() -> Self {
        Self::new()
    }
}

/// A running particle backdrop bound to one drawing surface.
pub struct Engine<S: DrawingSurface, H: FrameHost> {
    config: EngineConfig,
    surface: S,
    host: H,
    viewport_source: Rc<dyn ViewportSource>,
    gate: MotionGate,
    viewport: Viewport,
    store: ParticleStore,
    scheduler: FrameScheduler,
    throttle: FrameThrottle,
    spawn: SpawnContext,
    /// Number of store reinitializations so far.
    generation: u64,
}

impl<S: DrawingSurface, H: FrameHost> Engine<S, H> {
    /// Start building an engine.
    pub fn builder() -> EngineBuilder<S, H> {
        EngineBuilder::new()
    }

    /// Startup sequence: size, populate, then animate unless motion is reduced.
    pub fn start(&mut self) -> MotionDecision {
        info!(target_fps = self.config.target_fps, "starting particle backdrop");
        self.resize()
    }

    /// Re-read the viewport and rebuild everything from scratch.
    ///
    /// Any pending frame is cancelled before the store is replaced, so no
    /// callback can observe a half-built population. The scheduler is only
    /// restarted if the motion preference allows it.
    pub fn resize(&mut self) -> MotionDecision {
        self.scheduler.stop(&mut self.host);

        self.viewport = self.viewport_source.size().sanitized();
        let (width, height) = self.viewport.pixel_size();
        self.surface.set_size(width, height);

        self.store.init(self.viewport, &self.config, &mut self.spawn);
        self.generation += 1;
        debug!(generation = self.generation, width, height, "viewport applied");

        self.apply_motion_policy()
    }

    /// Re-evaluate the reduced-motion preference.
    pub fn on_motion_changed(&mut self) -> MotionDecision {
        self.apply_motion_policy()
    }

    /// Host frame callback, `timestamp` in milliseconds.
    ///
    /// Skips all work when the throttle rejects the timestamp, otherwise
    /// clears the surface and runs one step. Either way the next frame is
    /// requested. A callback arriving while idle is stale and ignored.
    pub fn on_frame(&mut self, timestamp: f64) {
        if !self.scheduler.is_scheduled() {
            trace!(timestamp, "ignoring frame callback while idle");
            return;
        }

        if self.throttle.accept(timestamp) {
            self.surface.clear();
            self.store.step(&mut self.surface);
        }

        self.scheduler.renew(&mut self.host);
    }

    /// Stop animating and blank the surface.
    pub fn stop(&mut self) {
        if self.scheduler.is_scheduled() {
            info!("stopping particle backdrop");
        }
        self.scheduler.stop(&mut self.host);
        self.surface.clear();
    }

    fn apply_motion_policy(&mut self) -> MotionDecision {
        self.gate
            .apply(&mut self.scheduler, &mut self.host, &mut self.surface)
    }

    // ========== Accessors ==========

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut ParticleStore {
        &mut self.store
    }

    pub fn scheduler_state(&self) -> SchedulerState {
        self.scheduler.state()
    }

    /// Whether a frame request is pending.
    pub fn is_running(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    pub fn throttle(&self) -> &FrameThrottle {
        &self.throttle
    }

    /// Viewport applied by the last resize.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Whether the motion preference currently allows animation.
    pub fn motion_allowed(&self) -> bool {
        self.gate.allows_motion()
    }

    /// Number of store reinitializations so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    pub(crate) fn viewport_source(&self) -> Rc<dyn ViewportSource> {
        Rc::clone(&self.viewport_source)
    }

    pub(crate) fn motion_source(&self) -> Rc<dyn MotionSource> {
        Rc::clone(self.gate.source())
    }
}
