//! Container engine error types.

use thiserror::Error;

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors that can occur when invoking the container engine CLI.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine command ran but reported failure.
    #[error("engine {command} failed: {message}")]
    CommandFailed { command: String, message: String },

    /// A named container or image does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Engine output could not be parsed.
    #[error("failed to parse engine output: {0}")]
    ParseError(String),

    /// No engine binary could be located on the PATH.
    #[error("no container engine available (docker or podman)")]
    NoEngineAvailable,

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Generic IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = EngineError::CommandFailed {
            command: "stop".to_string(),
            message: "no such container".to_string(),
        };
        assert_eq!(err.to_string(), "engine stop failed: no such container");
    }

    #[test]
    fn test_not_found_display() {
        let err = EngineError::NotFound("web-1".to_string());
        assert_eq!(err.to_string(), "not found: web-1");
    }
}
