//! Configuration-time errors.
//!
//! Only API calls that configure the scene can fail. The per-frame pipeline has
//! a defined degraded behaviour for every condition and never returns these.

use crate::types::{LayerId, LightId};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid layer size {width}x{height}")]
    InvalidSize { width: u16, height: u16 },
    #[error("invalid value for `{name}`: {value}")]
    InvalidParameter { name: &'static str, value: f32 },
    #[error("layer `{0}` already exists")]
    DuplicateLayer(LayerId),
    #[error("unknown layer `{0}`")]
    UnknownLayer(LayerId),
    #[error("unknown light {0}")]
    UnknownLight(LightId),
}

/// Accepts `value` if it is a non-negative number (infinity allowed).
pub(crate) fn non_negative(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if value.is_nan() || value < 0.0 {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(value)
}

/// Accepts any finite value, including negatives.
pub(crate) fn finite(name: &'static str, value: f32) -> Result<f32, ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::InvalidParameter { name, value });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_negative_rejects_negative_and_nan() {
        assert!(non_negative("depth", -0.5).is_err());
        assert!(non_negative("depth", f32::NAN).is_err());
        assert_eq!(non_negative("depth", 0.0), Ok(0.0));
        assert_eq!(non_negative("depth", f32::INFINITY), Ok(f32::INFINITY));
    }

    #[test]
    fn error_messages_name_the_parameter() {
        let err = non_negative("depth_scale", -1.0).unwrap_err();
        assert_eq!(err.to_string(), "invalid value for `depth_scale`: -1");
    }
}
