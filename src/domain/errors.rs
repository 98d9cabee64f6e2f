use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

// Coarse category surfaced to the UI for a failed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorCategory {
    Connectivity,
    Unauthorized,
    Forbidden,
    NotFound,
    Unexpected,
}

impl ErrorCategory {
    pub fn from_status(status: u16) -> Self {
        match status {
            0 => ErrorCategory::Connectivity,
            401 => ErrorCategory::Unauthorized,
            403 => ErrorCategory::Forbidden,
            404 => ErrorCategory::NotFound,
            _ => ErrorCategory::Unexpected,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Connectivity => "connectivity",
            ErrorCategory::Unauthorized => "unauthorized",
            ErrorCategory::Forbidden => "forbidden",
            ErrorCategory::NotFound => "not-found",
            ErrorCategory::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform shape for any transport or HTTP failure.
///
/// Built once by the error classifier and handed to callers as-is. A status of
/// `0` means the request never produced an HTTP response.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{message} (status {status}, {url})")]
pub struct NormalizedError {
    pub status: u16,
    pub category: ErrorCategory,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub url: String,
    pub cause: Value,
}

impl NormalizedError {
    pub fn is_unauthorized(&self) -> bool {
        self.category == ErrorCategory::Unauthorized
    }
}

// Errors returned by the auth client operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    // Rejected locally; no request was sent.
    #[error("federated login token is missing")]
    InvalidToken,
    #[error(transparent)]
    Request(#[from] NormalizedError),
}

impl AuthError {
    /// The classified request failure, if the error came from the network.
    pub fn normalized(&self) -> Option<&NormalizedError> {
        match self {
            AuthError::InvalidToken => None,
            AuthError::Request(err) => Some(err),
        }
    }
}
