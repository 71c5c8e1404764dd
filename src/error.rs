//! Error handling for wordforge

use thiserror::Error;

/// Main error type for wordforge
#[derive(Error, Debug, Clone)]
pub enum WordforgeError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Worker {worker} failed: {message}")]
    Worker { worker: usize, message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl WordforgeError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create a worker error
    pub fn worker(worker: usize, message: impl Into<String>) -> Self {
        Self::Worker {
            worker,
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

/// Convert from common error types
impl From<std::io::Error> for WordforgeError {
    fn from(err: std::io::Error) -> Self {
        Self::io(err.to_string(), None)
    }
}

impl From<tokio::task::JoinError> for WordforgeError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::internal(format!("Task join failed: {}", err))
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, WordforgeError>;

/// Helper macros for common error patterns
#[macro_export]
macro_rules! validation_error {
    ($msg:expr) => {
        $crate::error::WordforgeError::validation($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::WordforgeError::validation(format!($fmt, $($arg)*))
    };
}

#[macro_export]
macro_rules! internal_error {
    ($msg:expr) => {
        $crate::error::WordforgeError::internal($msg)
    };
    ($fmt:expr, $($arg:tt)*) => {
        $crate::error::WordforgeError::internal(format!($fmt, $($arg)*))
    };
}
