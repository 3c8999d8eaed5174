//! Error mapping helpers for the Heroku gateway.

use http::StatusCode;

use crate::error::ReviewAppError;

/// Checks if a status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}

pub(super) fn map_reqwest_error(operation: &str, error: &reqwest::Error) -> ReviewAppError {
    if error.is_decode() {
        return ReviewAppError::Api {
            message: format!("{operation} response deserialisation failed: {error}"),
        };
    }

    ReviewAppError::Network {
        message: format!("{operation} failed: {error}"),
    }
}

pub(super) fn map_http_error(
    operation: &str,
    status: StatusCode,
    maybe_message: Option<String>,
) -> ReviewAppError {
    let message = maybe_message.unwrap_or_else(|| "unknown error".to_owned());
    if status == StatusCode::CONFLICT {
        ReviewAppError::Conflict {
            message: format!("{operation}: {message}"),
        }
    } else if is_auth_failure(status) {
        ReviewAppError::Authentication {
            message: format!("{operation} failed: Heroku returned {status} {message}"),
        }
    } else {
        ReviewAppError::Api {
            message: format!("{operation} failed with status {status}: {message}"),
        }
    }
}

/// Pulls the `message` field out of a Heroku error body.
pub(super) fn extract_heroku_message(body: &str) -> Option<String> {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return None;
    };
    value
        .get("message")
        .and_then(serde_json::Value::as_str)
        .map(ToOwned::to_owned)
}
