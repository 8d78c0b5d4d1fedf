//! Error types at the host boundary
//!
//! The routing core itself cannot fail; these cover effect execution and
//! the runtime's channels.

use thiserror::Error;

/// Failure of a host effect, with a classification for logs
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ExecutorError {
    pub kind: ExecutorErrorKind,
    pub message: String,
}

impl ExecutorError {
    pub fn new(kind: ExecutorErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn unsupported(kind: &str) -> Self {
        Self::new(
            ExecutorErrorKind::Unsupported,
            format!("No handler for effect kind '{kind}'"),
        )
    }

    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::InvalidPayload, message)
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self::new(ExecutorErrorKind::Failed, message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorKind {
    /// The executor does not know this effect kind
    Unsupported,
    /// The payload did not have the expected shape
    InvalidPayload,
    /// The effect ran and failed
    Failed,
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Runtime has stopped")]
    Stopped,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
