//! Error types for pdfqueue.
//!
//! Failures fall into three categories that callers treat differently:
//!
//! - **Invalid input**: the caller supplied data that violates a precondition
//!   (empty input list, duplicate or out-of-range page numbers, missing input
//!   for a job type). Never retried, shown verbatim.
//! - **Runtime failure**: a well-formed request still failed (unopenable
//!   document, failed write, external tool not installed).
//! - **Command failure**: an external tool ran and exited non-zero. Carries
//!   the diagnostic text the tool printed.
//!
//! A few ambient variants (I/O, job-file parsing, configuration) cover the
//! CLI and configuration layers.

use std::io;

/// Result type alias for pdfqueue operations.
pub type Result<T> = std::result::Result<T, PdfQueueError>;

/// Main error type for pdfqueue operations.
#[derive(Debug, thiserror::Error)]
pub enum PdfQueueError {
    /// Caller-supplied data violates a precondition.
    #[error("{message}")]
    InvalidInput {
        /// Description of the violated precondition.
        message: String,
    },

    /// An operation on well-formed input failed.
    #[error("{message}")]
    RuntimeFailure {
        /// Description of what failed.
        message: String,
    },

    /// An external tool exited with a non-zero status.
    #[error("{output}")]
    CommandFailure {
        /// Captured stderr, or stdout when stderr was empty.
        output: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong with the configuration.
        message: String,
    },

    /// Job file could not be parsed.
    #[error("Invalid job file: {source}")]
    Json {
        /// Underlying parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Generic I/O error.
    #[error("I/O error: {source}")]
    Io {
        /// Underlying I/O error.
        #[from]
        source: io::Error,
    },
}

/// Coarse classification of a [`PdfQueueError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`PdfQueueError::InvalidInput`].
    InvalidInput,
    /// See [`PdfQueueError::RuntimeFailure`].
    RuntimeFailure,
    /// See [`PdfQueueError::CommandFailure`].
    CommandFailure,
    /// Configuration, job file and I/O errors.
    Environment,
}

impl PdfQueueError {
    /// Create an InvalidInput error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a RuntimeFailure error.
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::RuntimeFailure {
            message: message.into(),
        }
    }

    /// Create a CommandFailure error.
    pub fn command_failure(output: impl Into<String>) -> Self {
        Self::CommandFailure {
            output: output.into(),
        }
    }

    /// Create an InvalidConfig error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput { .. } => ErrorKind::InvalidInput,
            Self::RuntimeFailure { .. } => ErrorKind::RuntimeFailure,
            Self::CommandFailure { .. } => ErrorKind::CommandFailure,
            Self::InvalidConfig { .. } | Self::Json { .. } | Self::Io { .. } => {
                ErrorKind::Environment
            }
        }
    }

    /// Get the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidInput { .. } => 1,
            Self::InvalidConfig { .. } => 1,
            Self::Json { .. } => 1,
            Self::RuntimeFailure { .. } => 3,
            Self::CommandFailure { .. } => 4,
            Self::Io { .. } => 5,
        }
    }
}
