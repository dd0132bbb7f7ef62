//! Error types for physlab.
//!
//! Model functions never panic. Contract violations come back as
//! `Err(LabError)`; mathematical domain failures (an `asin` argument past 1,
//! a zero divisor) are mapped to explicit sentinels by the domain modules and
//! never reach this type as NaN.

use thiserror::Error;

/// Result type alias for physlab operations.
pub type LabResult<T> = Result<T, LabError>;

/// Unified error type for all physlab operations.
#[derive(Debug, Error)]
pub enum LabError {
    // ===== Contract Errors =====
    /// A parameter is outside the mathematical contract of a model function.
    #[error("invalid parameter '{name}' = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name (e.g. "resistance").
        name: &'static str,
        /// The rejected value.
        value: f64,
        /// What the contract requires.
        reason: &'static str,
    },

    /// A computed quantity came out NaN or infinite.
    #[error("non-finite value computed for {location}")]
    NonFiniteValue {
        /// Quantity that failed the check (e.g. "mechanics.range").
        location: String,
    },

    /// Simulator name not recognised.
    #[error("unknown simulator '{0}' (expected mechanics, electricity, optics or thermodynamics)")]
    UnknownSimulator(String),

    // ===== Configuration Errors =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O Errors =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LabError {
    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Create an invalid-parameter error.
    #[must_use]
    pub const fn invalid(name: &'static str, value: f64, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }

    /// Create a non-finite value error.
    #[must_use]
    pub fn non_finite(location: impl Into<String>) -> Self {
        Self::NonFiniteValue {
            location: location.into(),
        }
    }
}

/// Require a finite, strictly positive value.
///
/// # Errors
///
/// Returns [`LabError::InvalidParameter`] when `value` is NaN, infinite, or `<= 0`.
pub fn require_positive(name: &'static str, value: f64) -> LabResult<f64> {
    if !value.is_finite() {
        return Err(LabError::invalid(name, value, "must be finite"));
    }
    if value <= 0.0 {
        return Err(LabError::invalid(name, value, "must be positive"));
    }
    Ok(value)
}

/// Require a finite value inside `[min, max]`.
///
/// # Errors
///
/// Returns [`LabError::InvalidParameter`] when `value` is non-finite or out of range.
pub fn require_in_range(
    name: &'static str,
    value: f64,
    min: f64,
    max: f64,
    reason: &'static str,
) -> LabResult<f64> {
    if !value.is_finite() {
        return Err(LabError::invalid(name, value, "must be finite"));
    }
    if value < min || value > max {
        return Err(LabError::invalid(name, value, reason));
    }
    Ok(value)
}

/// Reject NaN/∞ produced by a computation.
///
/// # Errors
///
/// Returns [`LabError::NonFiniteValue`] naming `location` when `value` is not finite.
pub fn ensure_finite(location: &str, value: f64) -> LabResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(LabError::non_finite(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = LabError::invalid("resistance", 0.0, "must be positive");
        assert_eq!(
            err.to_string(),
            "invalid parameter 'resistance' = 0: must be positive"
        );

        let err = LabError::non_finite("optics.refraction_angle");
        assert!(err.to_string().contains("optics.refraction_angle"));

        let err = LabError::config("bad step");
        assert!(err.to_string().contains("bad step"));

        let err = LabError::UnknownSimulator("acoustics".to_string());
        assert!(err.to_string().contains("acoustics"));
    }

    #[test]
    fn test_require_positive() {
        assert!(require_positive("mass", 5.0).is_ok());
        assert!(require_positive("mass", 0.0).is_err());
        assert!(require_positive("mass", -1.0).is_err());
        assert!(require_positive("mass", f64::NAN).is_err());
        assert!(require_positive("mass", f64::INFINITY).is_err());
    }

    #[test]
    fn test_require_in_range() {
        assert!(require_in_range("angle", 45.0, 0.0, 90.0, "0..=90").is_ok());
        assert!(require_in_range("angle", 0.0, 0.0, 90.0, "0..=90").is_ok());
        assert!(require_in_range("angle", 90.0, 0.0, 90.0, "0..=90").is_ok());
        assert!(require_in_range("angle", 90.5, 0.0, 90.0, "0..=90").is_err());
        assert!(require_in_range("angle", f64::NAN, 0.0, 90.0, "0..=90").is_err());
    }

    #[test]
    fn test_ensure_finite() {
        assert!(ensure_finite("x", 1.0).is_ok());
        assert!(ensure_finite("x", f64::NAN).is_err());
        assert!(ensure_finite("x", f64::NEG_INFINITY).is_err());
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::other("disk gone");
        let err: LabError = io.into();
        assert!(matches!(err, LabError::Io(_)));
    }
}
