use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Structured error shared by every layer of the assistant and surfaced to the outer shell.
///
/// `code` is a stable machine-readable identifier (`AI_ANALYSIS_FAILED`, `INDEX_READ_FAILED`, ...);
/// `message` is human readable; `details` carries the underlying cause when one exists.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    /// Filesystem failure with the offending path recorded in `details`.
    pub fn io(
        code: impl Into<String>,
        message: impl Into<String>,
        path: &Path,
        err: impl fmt::Display,
    ) -> Self {
        Self::new(code, message).with_details(format!("path={}; err={}", path.display(), err))
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(d) => write!(f, "[{}] {} ({})", self.code, self.message, d),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
