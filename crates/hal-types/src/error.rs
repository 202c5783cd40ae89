//! Error taxonomy for the device abstraction core.
//!
//! Every fallible operation in the chassis registry and the telemetry codec
//! returns [`HalResult`]. Per-item failures inside a batch are collected and
//! returned alongside partial successes; nothing in this core retries
//! internally.

use thiserror::Error;

/// Error type shared by the chassis registry and the telemetry codec.
#[derive(Debug, Error)]
pub enum HalError {
    /// A node, port location, or named field does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// A descriptor or construction-time invariant is violated
    /// (control-path count mismatch, malformed field descriptor).
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// An operation was invoked before its precondition held
    /// (e.g. decode before the field was bound to an attribute).
    #[error("precondition violated: {0}")]
    PreconditionViolated(String),

    /// An unrecognized request discriminant or other internal failure.
    #[error("internal error: {0}")]
    Internal(String),

    /// An operation intentionally not provided at this layer.
    #[error("unimplemented: {0}")]
    Unimplemented(String),

    /// I/O failure from an injected collaborator (buffer snapshot, path write).
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl HalError {
    /// Creates a not-found error.
    pub fn not_found(what: impl Into<String>) -> Self {
        HalError::NotFound(what.into())
    }

    /// Creates an invalid-configuration error.
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        HalError::InvalidConfiguration(message.into())
    }

    /// Creates a precondition-violated error.
    pub fn precondition(message: impl Into<String>) -> Self {
        HalError::PreconditionViolated(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        HalError::Internal(message.into())
    }

    /// Creates an unimplemented error.
    pub fn unimplemented(what: impl Into<String>) -> Self {
        HalError::Unimplemented(what.into())
    }

    /// Returns true if this is a not-found error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, HalError::NotFound(_))
    }

    /// Returns true if this is an invalid-configuration error.
    pub fn is_invalid_configuration(&self) -> bool {
        matches!(self, HalError::InvalidConfiguration(_))
    }
}

/// Result type for operations in the device abstraction core.
pub type HalResult<T> = Result<T, HalError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HalError::not_found("node 42");
        assert_eq!(err.to_string(), "not found: node 42");

        let err = HalError::invalid_configuration("3 paths supplied, 4 required");
        assert_eq!(
            err.to_string(),
            "invalid configuration: 3 paths supplied, 4 required"
        );
    }

    #[test]
    fn test_error_predicates() {
        assert!(HalError::not_found("x").is_not_found());
        assert!(!HalError::internal("x").is_not_found());
        assert!(HalError::invalid_configuration("x").is_invalid_configuration());
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: HalError = io.into();
        assert!(matches!(err, HalError::Io(_)));
    }
}
