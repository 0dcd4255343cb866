//! Engine configuration.
//!
//! All tunables of the backdrop live in [`EngineConfig`]. The defaults
//! reproduce the classic look: 30 or 60 faint white motes drifting at
//! well under a pixel per frame, updated at most 60 times a second.
//!
//! Configs can be built in code with the `with_*` methods or loaded from
//! TOML. Missing keys fall back to the defaults:
//!
//! ```ignore
//! let config = EngineConfig::from_toml_str(r#"
//!     full_count = 120
//!     target_fps = 30.0
//!     color = [180, 220, 255]
//! "#)?;
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// Particle count used below the compact breakpoint.
pub const DEFAULT_COMPACT_COUNT: usize = 30;
/// Particle count used at or above the compact breakpoint.
pub const DEFAULT_FULL_COUNT: usize = 60;
/// Viewport width below which the compact count applies.
pub const DEFAULT_COMPACT_BREAKPOINT: f32 = 768.0;
/// Target accepted frame rate.
pub const DEFAULT_TARGET_FPS: f64 = 60.0;

/// Configuration for an [`Engine`](crate::Engine).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Particles spawned when the viewport is narrower than `compact_breakpoint`.
    pub compact_count: usize,
    /// Particles spawned otherwise.
    pub full_count: usize,
    /// Width threshold between the compact and full population.
    pub compact_breakpoint: f32,
    /// Radius range `[min, max]`, drawn uniformly per particle.
    pub radius: [f32; 2],
    /// Opacity range `[min, max]`, drawn uniformly per particle.
    pub opacity: [f32; 2],
    /// Largest absolute velocity per axis, in units per step.
    pub max_speed: f32,
    /// Upper bound on accepted frames per second.
    pub target_fps: f64,
    /// Base RGB of every particle; opacity supplies alpha.
    pub color: [u8; 3],
    /// Fixed RNG seed. `None` seeds from entropy.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            compact_count: DEFAULT_COMPACT_COUNT,
            full_count: DEFAULT_FULL_COUNT,
            compact_breakpoint: DEFAULT_COMPACT_BREAKPOINT,
            radius: [0.5, 2.0],
            opacity: [0.1, 0.3],
            max_speed: 0.15,
            target_fps: DEFAULT_TARGET_FPS,
            color: [255, 255, 255],
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML and validate it.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the compact and full particle counts.
    pub fn with_counts(mut self, compact: usize, full: usize) -> Self {
        self.compact_count = compact;
        self.full_count = full;
        self
    }

    /// Set the width below which the compact count is used.
    pub fn with_compact_breakpoint(mut self, width: f32) -> Self {
        self.compact_breakpoint = width;
        self
    }

    /// Set the radius range.
    pub fn with_radius(mut self, min: f32, max: f32) -> Self {
        self.radius = [min, max];
        self
    }

    /// Set the opacity range.
    pub fn with_opacity(mut self, min: f32, max: f32) -> Self {
        self.opacity = [min, max];
        self
    }

    /// Set the largest per-axis speed.
    pub fn with_max_speed(mut self, speed: f32) -> Self {
        self.max_speed = speed;
        self
    }

    /// Set the target frame rate used for throttling.
    pub fn with_target_fps(mut self, fps: f64) -> Self {
        self.target_fps = fps;
        self
    }

    /// Set the base particle color.
    pub fn with_color(mut self, r: u8, g: u8, b: u8) -> Self {
        self.color = [r, g, b];
        self
    }

    /// Seed the particle RNG for reproducible runs.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Number of particles to spawn for a viewport of the given width.
    pub fn particle_count(&self, width: f32) -> usize {
        if width < self.compact_breakpoint {
            self.compact_count
        } else {
            self.full_count
        }
    }

    /// Minimum time between accepted frames, in milliseconds.
    pub fn frame_interval_ms(&self) -> f64 {
        1000.0 / self.target_fps
    }

    /// Check that every value is usable by the simulation.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.compact_breakpoint.is_finite() || self.compact_breakpoint < 0.0 {
            return Err(invalid("compact_breakpoint must be a finite, non-negative width"));
        }
        check_range("radius", self.radius, 0.0, f32::MAX)?;
        check_range("opacity", self.opacity, 0.0, 1.0)?;
        if !self.max_speed.is_finite() || self.max_speed < 0.0 {
            return Err(invalid("max_speed must be finite and non-negative"));
        }
        if !self.target_fps.is_finite() || self.target_fps <= 0.0 {
            return Err(invalid("target_fps must be finite and positive"));
        }
        Ok(())
    }
}

fn invalid(msg: &str) -> ConfigError {
    ConfigError::Invalid(msg.to_string())
}

fn check_range(name: &str, [min, max]: [f32; 2], lo: f32, hi: f32) -> Result<(), ConfigError> {
    if !min.is_finite() || !max.is_finite() {
        return Err(ConfigError::Invalid(format!("{} bounds must be finite", name)));
    }
    if min > max {
        return Err(ConfigError::Invalid(format!(
            "{} range is inverted ({} > {})",
            name, min, max
        )));
    }
    if min < lo || max > hi {
        return Err(ConfigError::Invalid(format!(
            "{} range must lie within [{}, {}]",
            name, lo, hi
        )));
    }
    Ok(())
}
