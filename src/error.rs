//! Error types for driftlight.
//!
//! Simulation itself cannot fail. Errors only arise while assembling an
//! engine: a missing drawing surface or port, or a bad configuration.

use std::fmt;

/// Errors that can occur while loading or validating an [`EngineConfig`].
///
/// [`EngineConfig`]: crate::EngineConfig
#[derive(Debug)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    Parse(toml::de::Error),
    /// A value parsed but is out of range.
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(e) => write!(f, "Failed to parse engine config: {}", e),
            ConfigError::Invalid(msg) => write!(f, "Invalid engine config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::Parse(e) => Some(e),
            ConfigError::Invalid(_) => None,
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Parse(e)
    }
}

/// Errors that can occur when building an [`Engine`].
///
/// [`Engine`]: crate::Engine
#[derive(Debug)]
pub enum EngineError {
    /// The drawing surface could not be obtained. The engine never starts.
    SurfaceUnavailable(String),
    /// No frame host provided.
    MissingFrameHost,
    /// No viewport source provided.
    MissingViewport,
    /// No motion preference source provided.
    MissingMotionSource,
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::SurfaceUnavailable(why) => {
                write!(f, "Drawing surface unavailable: {}", why)
            }
            EngineError::MissingFrameHost => {
                write!(f, "No frame host provided. Use .with_frame_host() to set one.")
            }
            EngineError::MissingViewport => {
                write!(f, "No viewport source provided. Use .with_viewport() to set one.")
            }
            EngineError::MissingMotionSource => {
                write!(f, "No motion source provided. Use .with_motion() to set one.")
            }
            EngineError::Config(e) => write!(f, "Config error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for EngineError {
    fn from(e: ConfigError) -> Self {
        EngineError::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_config_error_is_engine_error_source() {
        let err: EngineError = ConfigError::Invalid("target_fps must be positive".into()).into();
        assert!(err.to_string().contains("target_fps"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_surface_unavailable_message() {
        let err = EngineError::SurfaceUnavailable("no element with id `particles`".into());
        assert_eq!(
            err.to_string(),
            "Drawing surface unavailable: no element with id `particles`"
        );
        assert!(err.source().is_none());
    }
}
