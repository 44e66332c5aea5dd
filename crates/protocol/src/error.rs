//! Error types for the protocol crate.

use thiserror::Error;

/// Protocol error type covering all possible failure modes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProtocolError {
    /// The session kind discriminator was not one of the recognized values.
    #[error("unknown session kind: {0}")]
    UnknownKind(String),

    /// Failed to serialize a server frame.
    #[error("serialization failed: {0}")]
    Serialization(String),
}

/// Result type alias for protocol operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;

impl From<serde_json::Error> for ProtocolError {
    fn from(err: serde_json::Error) -> Self {
        ProtocolError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_kind_display() {
        let err = ProtocolError::UnknownKind("shell".to_string());
        assert_eq!(err.to_string(), "unknown session kind: shell");
    }

    #[test]
    fn test_serialization_display() {
        let err = ProtocolError::Serialization("invalid utf-8".to_string());
        assert_eq!(err.to_string(), "serialization failed: invalid utf-8");
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ProtocolError>();
    }
}
