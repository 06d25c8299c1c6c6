#![forbid(unsafe_code)]

//! Top-level error type.
//!
//! Runtime drag and placement paths never return errors: rejected drops and
//! unknown ids surface as `Noop` or `Reverted` transitions. Errors here come
//! from construction (configuration, model values, renderer registration).

use std::fmt;

use panelgrid_layout::{ConfigError, ModelError};

use crate::registry::RegistryError;

/// Any error a panelgrid constructor can return.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Engine configuration rejected.
    Config(ConfigError),
    /// Invalid model value.
    Model(ModelError),
    /// Renderer registration conflict.
    Registry(RegistryError),
}

/// Standard result type for panelgrid APIs.
pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "config: {err}"),
            Self::Model(err) => write!(f, "model: {err}"),
            Self::Registry(err) => write!(f, "registry: {err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::Registry(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<ModelError> for Error {
    fn from(err: ModelError) -> Self {
        Self::Model(err)
    }
}

impl From<RegistryError> for Error {
    fn from(err: RegistryError) -> Self {
        Self::Registry(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn conversions_and_display() {
        let err: Error = ConfigError::ZeroBufferRows.into();
        assert_eq!(
            err.to_string(),
            "config: virtualization buffer_rows must be at least 1"
        );
        assert!(err.source().is_some());

        let err: Error = ModelError::InvalidSpan {
            width: 0,
            height: 2,
        }
        .into();
        assert!(matches!(err, Error::Model(_)));
    }

    #[test]
    fn question_mark_propagates() {
        fn load(json: &str) -> Result<panelgrid_layout::EngineConfig> {
            Ok(panelgrid_layout::EngineConfig::from_json_str(json)?)
        }
        assert!(load("{}").is_ok());
        assert!(matches!(load("[]"), Err(Error::Config(ConfigError::Parse { .. }))));
    }
}
