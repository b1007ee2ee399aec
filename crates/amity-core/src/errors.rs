//! Unified error system for Amity
//!
//! A single error type shared by the storage collaborator, the resolver and
//! the services. Every failure is scoped to the user action that triggered it.

use serde::{Deserialize, Serialize};

/// Unified error type for all Amity operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum AmityError {
    /// A uniqueness or shape constraint of the store would be violated
    #[error("Constraint violation: {message}")]
    ConstraintViolation {
        /// Error message describing the violated constraint
        message: String,
    },

    /// Resource not found
    #[error("Not found: {message}")]
    NotFound {
        /// Error message describing what was not found
        message: String,
    },

    /// Caller lacks permission under the access policy
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Error message describing the denied operation
        message: String,
    },

    /// Storage collaborator unreachable or failed transiently
    #[error("Transient I/O error: {message}")]
    TransientIo {
        /// Error message describing the I/O failure
        message: String,
    },

    /// Invalid input, transition or configuration
    #[error("Invalid: {message}")]
    Invalid {
        /// Error message describing the invalid input
        message: String,
    },

    /// Serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Error message describing the serialization failure
        message: String,
    },

    /// Internal system error
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal error
        message: String,
    },
}

impl AmityError {
    /// Create a constraint violation error
    pub fn constraint_violation(message: impl Into<String>) -> Self {
        Self::ConstraintViolation {
            message: message.into(),
        }
    }

    /// Create a not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a transient I/O error
    pub fn transient_io(message: impl Into<String>) -> Self {
        Self::TransientIo {
            message: message.into(),
        }
    }

    /// Create an invalid input error
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Whether retrying the same action could succeed without any state change.
    ///
    /// Retries stay a caller decision; nothing in Amity retries on its own.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TransientIo { .. })
    }

    /// Whether this is a `NotFound` error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Standard Result type for Amity operations
pub type Result<T> = std::result::Result<T, AmityError>;

impl From<std::io::Error> for AmityError {
    fn from(err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::not_found(err.to_string()),
            std::io::ErrorKind::PermissionDenied => Self::forbidden(err.to_string()),
            _ => Self::transient_io(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for AmityError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

impl From<toml::de::Error> for AmityError {
    fn from(err: toml::de::Error) -> Self {
        Self::invalid(format!("Invalid TOML: {err}"))
    }
}

impl From<crate::effects::TimeError> for AmityError {
    fn from(err: crate::effects::TimeError) -> Self {
        Self::internal(format!("time error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AmityError::constraint_violation("pair already linked");
        assert!(matches!(err, AmityError::ConstraintViolation { .. }));
        assert_eq!(err.to_string(), "Constraint violation: pair already linked");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        assert!(AmityError::from(io_err).is_not_found());

        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        assert!(matches!(
            AmityError::from(io_err),
            AmityError::Forbidden { .. }
        ));

        let io_err = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = AmityError::from(io_err);
        assert!(matches!(err, AmityError::TransientIo { .. }));
        assert!(err.is_retryable());
    }

    #[test]
    fn test_only_transient_errors_are_retryable() {
        assert!(!AmityError::forbidden("x").is_retryable());
        assert!(!AmityError::not_found("x").is_retryable());
        assert!(!AmityError::constraint_violation("x").is_retryable());
    }

    #[test]
    fn test_error_serde_round_trip() {
        let err = AmityError::forbidden("only the recipient may accept");
        let json = serde_json::to_string(&err).unwrap();
        let back: AmityError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
