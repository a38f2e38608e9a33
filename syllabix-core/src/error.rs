//! Core error types (no I/O)

use thiserror::Error;

/// Errors raised while parsing profiles, compiling rules or converting text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Profile text could not be interpreted
    #[error("configuration error: {0}")]
    Config(String),

    /// A profile parsed but its values are unusable
    #[error("invalid language profile: {0}")]
    InvalidProfile(String),

    /// Text could not be converted to or from the named encoding
    #[error("encoding error ({encoding}): {reason}")]
    Encoding {
        /// Encoding label involved in the conversion
        encoding: String,
        /// What went wrong
        reason: String,
    },
}

impl CoreError {
    /// Create a new configuration error.
    pub fn config<S: Into<String>>(msg: S) -> Self {
        CoreError::Config(msg.into())
    }

    /// Create a new invalid profile error.
    pub fn invalid_profile<S: Into<String>>(msg: S) -> Self {
        CoreError::InvalidProfile(msg.into())
    }

    /// Create a new encoding error.
    pub fn encoding<E: Into<String>, R: Into<String>>(encoding: E, reason: R) -> Self {
        CoreError::Encoding {
            encoding: encoding.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
