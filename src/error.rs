//! # Error Types
//!
//! Crate-wide error handling. Every failure carries a human readable message and
//! maps onto a small closed [`ErrorKind`] so callers can branch programmatically.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::config::ConfigurationError;
use crate::storage::StorageError;

/// Closed classification of failures surfaced to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Missing or malformed request input, rejected before any remote call
    InvalidInput,
    /// The credential exchange did not yield a usable token
    AuthFailure,
    /// The remote API or blob store answered with an unexpected response
    UpstreamError,
    /// A transport-level timeout
    Timeout,
    /// One of the concurrent result uploads failed
    PartialFailure,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::InvalidInput => "InvalidInput",
            ErrorKind::AuthFailure => "AuthFailure",
            ErrorKind::UpstreamError => "UpstreamError",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::PartialFailure => "PartialFailure",
        };
        f.write_str(name)
    }
}

/// Result alias used throughout the crate
pub type AutomationResult<T> = Result<T, AutomationError>;

#[derive(Debug, Error)]
pub enum AutomationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Authentication failed: {0}")]
    AuthFailure(String),

    #[error("Upstream error during {operation}: HTTP {status}: {body}")]
    Upstream {
        operation: String,
        status: u16,
        body: String,
    },

    #[error("Transport error during {operation}: {message}")]
    Transport {
        operation: String,
        message: String,
        timed_out: bool,
    },

    #[error("Invalid response for {operation}: {reason}")]
    InvalidResponse { operation: String, reason: String },

    #[error("Result upload failed for '{key}': {reason}")]
    PartialFailure { key: String, reason: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl AutomationError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn auth_failure(message: impl Into<String>) -> Self {
        Self::AuthFailure(message.into())
    }

    /// Create an upstream error from a non-success HTTP response
    pub fn upstream(operation: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::Upstream {
            operation: operation.into(),
            status,
            body: body.into(),
        }
    }

    pub fn invalid_response(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidResponse {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    pub fn partial_failure(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PartialFailure {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            AutomationError::InvalidInput(_) | AutomationError::Configuration(_) => {
                ErrorKind::InvalidInput
            }
            AutomationError::AuthFailure(_) => ErrorKind::AuthFailure,
            AutomationError::Transport { timed_out, .. } if *timed_out => ErrorKind::Timeout,
            AutomationError::Upstream { .. }
            | AutomationError::Transport { .. }
            | AutomationError::InvalidResponse { .. }
            | AutomationError::Storage(_) => ErrorKind::UpstreamError,
            AutomationError::PartialFailure { .. } => ErrorKind::PartialFailure,
        }
    }

    /// Raw diagnostic body returned by the remote side, when one exists
    #[must_use]
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            AutomationError::Upstream { body, .. } if !body.is_empty() => Some(body.as_str()),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for AutomationError {
    fn from(error: reqwest::Error) -> Self {
        Self::Transport {
            operation: error
                .url()
                .map(|u| u.path().to_string())
                .unwrap_or_else(|| "http request".to_string()),
            timed_out: error.is_timeout(),
            message: error.to_string(),
        }
    }
}
