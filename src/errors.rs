// SPDX-License-Identifier: MPL-2.0

//! Error types for logging sessions

use std::fmt;

/// Result type alias using LogError
pub type LogResult<T> = Result<T, LogError>;

/// Errors reported by a logging session
#[derive(Debug, Clone)]
pub enum LogError {
    /// Requested codec unavailable, or frame parameters do not match the
    /// session configuration. Unrecoverable for the session (codec absence)
    /// or for the single offending frame (dimension mismatch).
    Configuration(String),
    /// Lock-file creation, container open/IO, or header/trailer write
    /// failed. Recoverable at the caller's discretion.
    Resource(String),
    /// The codec rejected a submitted frame or failed while draining
    /// packets. The session stays open; repeated failures should be
    /// treated as segment-fatal by the caller.
    Encode(String),
}

impl fmt::Display for LogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            LogError::Resource(msg) => write!(f, "Resource error: {}", msg),
            LogError::Encode(msg) => write!(f, "Encode error: {}", msg),
        }
    }
}

impl std::error::Error for LogError {}

impl From<std::io::Error> for LogError {
    fn from(err: std::io::Error) -> Self {
        LogError::Resource(err.to_string())
    }
}
