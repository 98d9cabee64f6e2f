// Turns raw transport outcomes into the normalized error shape.

use chrono::Utc;
use serde_json::{Value, json};

use crate::domain::{ErrorCategory, NormalizedError};
use crate::interface_adapters::protocol::ErrorResponse;

/// A failed request, as observed at the transport boundary.
#[derive(Debug, Clone)]
pub enum TransportFailure {
    // The request never produced an HTTP response (connect, DNS, timeout).
    Network {
        url: String,
        detail: String,
    },
    // The server answered with a non-success status.
    Status {
        url: String,
        status: u16,
        reason: Option<String>,
        body: Option<Value>,
    },
    // The server answered successfully but the body did not decode.
    Decode {
        url: String,
        status: u16,
        detail: String,
    },
}

/// Builds the single `NormalizedError` for a failure.
///
/// Known statuses get a fixed user-facing message; anything else uses the
/// server's `message` field when present.
pub fn classify(failure: TransportFailure) -> NormalizedError {
    let (status, url, message, cause) = match failure {
        TransportFailure::Network { url, detail } => (
            0,
            url,
            fixed_message(0).unwrap_or_default().to_string(),
            json!({ "error": detail }),
        ),
        TransportFailure::Status {
            url,
            status,
            reason,
            body,
        } => {
            let message = fixed_message(status)
                .map(str::to_string)
                .or_else(|| server_message(body.as_ref()))
                .unwrap_or_else(|| {
                    format!(
                        "Error {status}: {}",
                        reason.as_deref().unwrap_or("Unknown error")
                    )
                });
            (status, url, message, body.unwrap_or(Value::Null))
        }
        TransportFailure::Decode {
            url,
            status,
            detail,
        } => (
            status,
            url,
            "The server sent a response that could not be read.".to_string(),
            json!({ "error": detail }),
        ),
    };

    let error = NormalizedError {
        status,
        category: ErrorCategory::from_status(status),
        message,
        timestamp: Utc::now(),
        url,
        cause,
    };

    if error.status >= 500 {
        tracing::error!(status = error.status, url = %error.url, message = %error.message, "api error");
    } else {
        tracing::warn!(status = error.status, url = %error.url, message = %error.message, "api error");
    }
    error
}

fn fixed_message(status: u16) -> Option<&'static str> {
    match status {
        0 => Some("Connection error. Please check your network connection."),
        401 => Some("Unauthorized user. Please sign in again."),
        403 => Some("You do not have permission to perform this action."),
        404 => Some("Resource not found."),
        _ => None,
    }
}

fn server_message(body: Option<&Value>) -> Option<String> {
    let payload: ErrorResponse = serde_json::from_value(body?.clone()).ok()?;
    payload.message.filter(|message| !message.trim().is_empty())
}
