//! Error types shared by every transform.

use thiserror::Error;

/// Errors raised while validating the arguments of a transform.
///
/// Every transform validates eagerly: a call either fails with one of these
/// before any output is allocated, or it returns a complete result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// An argument is not a numeric array.
    #[error("invalid type for `{name}`: expected {expected}")]
    InvalidType {
        /// Argument name.
        name: String,
        /// Description of the accepted type.
        expected: &'static str,
    },

    /// Two series that must be aligned have different lengths.
    #[error("invalid shape for `{name}`: expected length {expected}, got {actual}")]
    InvalidShape {
        /// Name of the misaligned series.
        name: &'static str,
        /// Length of the reference series.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A period, factor or margin is outside its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Offending value, formatted.
        value: String,
        /// Valid domain.
        reason: &'static str,
    },

    /// An enumerated string option is not recognized.
    #[error("invalid option `{name}` = {value:?}: expected one of {expected}")]
    InvalidOption {
        /// Option name.
        name: &'static str,
        /// Value that was supplied.
        value: String,
        /// Accepted values.
        expected: &'static str,
    },
}

impl IndicatorError {
    /// Creates an `InvalidParameter` error.
    #[must_use]
    pub fn parameter(name: &'static str, value: impl ToString, reason: &'static str) -> Self {
        IndicatorError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Creates an `InvalidShape` error.
    #[must_use]
    pub fn shape(name: &'static str, expected: usize, actual: usize) -> Self {
        IndicatorError::InvalidShape {
            name,
            expected,
            actual,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, IndicatorError>;
