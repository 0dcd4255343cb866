//! # driftlight - ambient particle backdrop
//!
//! A small, always-on particle animation for the background of a page:
//! a few dozen faint motes drifting across a 2D surface and bouncing off
//! its edges. It is built to cost next to nothing and to respect the
//! user's reduced-motion preference.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftlight::prelude::*;
//! use std::rc::Rc;
//!
//! let viewport = ManualViewport::new(1920.0, 1080.0);
//! let motion = MotionSwitch::new(false);
//!
//! let engine = Engine::builder()
//!     .with_config(EngineConfig::default().with_target_fps(60.0))
//!     .with_surface(RasterSurface::new(1, 1))
//!     .with_frame_host(ManualFrameHost::new())
//!     .with_viewport(Rc::new(viewport.clone()))
//!     .with_motion(Rc::new(motion.clone()))
//!     .build()?;
//!
//! let mounted = mount(engine);
//! mounted.start();
//! ```
//!
//! In the browser, the `web` module does all of this against a
//! `<canvas>`; see `mount_backdrop`.
//!
//! ## Core Concepts
//!
//! ### Particles
//!
//! Each [`Particle`] has a position, a velocity of at most
//! [`EngineConfig::max_speed`] per axis, a radius and an opacity. Only the
//! position and the sign of each velocity component ever change.
//!
//! ### Frames
//!
//! The engine asks a [`FrameHost`] for one callback at a time. Every
//! callback that arrives at least `1000 / target_fps` ms after the last
//! accepted one clears the surface and runs one [`ParticleStore::step`];
//! anything sooner is skipped. Motion is one fixed step per accepted
//! frame, not scaled by elapsed time.
//!
//! ### Lifecycle
//!
//! | Event | Effect |
//! |-------|--------|
//! | start / resize | cancel pending frame, resize surface, respawn all particles, restart if motion allowed |
//! | reduced motion on | cancel pending frame, clear surface |
//! | reduced motion off | request a frame |
//! | teardown | unsubscribe, cancel, clear |

mod config;
mod engine;
mod error;
pub mod headless;
pub mod motion;
pub mod mount;
mod particle;
mod raster;
pub mod scheduler;
mod spawn;
mod store;
pub mod subscription;
mod surface;
pub mod time;
mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::EngineConfig;
pub use engine::{Engine, EngineBuilder};
pub use error::{ConfigError, EngineError};
pub use glam::Vec2;
pub use motion::{MotionDecision, MotionGate, MotionSource};
pub use mount::{mount, Mounted};
pub use particle::Particle;
pub use raster::RasterSurface;
pub use scheduler::{FrameHandle, FrameHost, FrameScheduler, SchedulerState};
pub use spawn::SpawnContext;
pub use store::ParticleStore;
pub use subscription::{Listener, ListenerSet, Subscription};
pub use surface::{DrawingSurface, Rgba};
pub use time::FrameThrottle;
pub use viewport::{Viewport, ViewportSource};

/// Prelude module for convenient imports.
///
/// ```ignore
/// use driftlight::prelude::*;
/// ```
pub mod prelude {
    pub use crate::headless::{ManualFrameHost, ManualViewport, MotionSwitch, RecordingSurface};
    pub use crate::{
        mount, DrawingSurface, Engine, EngineConfig, EngineError, FrameHost, MotionSource,
        Mounted, Particle, RasterSurface, Rgba, Vec2, Viewport, ViewportSource,
    };
}
