use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::scene::ErrorResult;

/// Shown to the user when the generation call outlives its time budget.
pub const TIMEOUT_MESSAGE: &str = "Connection timed out. Check your network and try again.";

/// Shown to the user when the model provider could not be reached at all.
pub const NETWORK_MESSAGE: &str = "Network error: could not reach the model provider.";

#[derive(Error, Debug)]
pub enum ShortError {
    /// The model provider answered with a non-success status.
    #[error("Upstream error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    UpstreamError { status: u16, message: Option<String> },

    #[error("Upstream request timed out after {0} seconds")]
    TimeoutError(u64),

    /// Success status, but the body is missing the candidate/part/text shape.
    #[error("Malformed upstream response: {0}")]
    MalformedResponse(String),

    /// The model text did not parse into a complete short script.
    #[error("Script parsing error: {0}")]
    ScriptError(String),

    #[error("Invalid request: {0}")]
    RequestError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Built through `From`, which drops the request URL. The API key
    /// travels in the query string and must not reach logs or bodies.
    #[error("HTTP request error: {0}")]
    HttpError(reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShortError>;

impl From<reqwest::Error> for ShortError {
    fn from(e: reqwest::Error) -> Self {
        ShortError::HttpError(e.without_url())
    }
}

impl ShortError {
    /// HTTP status the script endpoint answers with for this failure.
    pub fn status(&self) -> StatusCode {
        match self {
            ShortError::UpstreamError { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            ShortError::MalformedResponse(_) | ShortError::ScriptError(_) => {
                StatusCode::BAD_GATEWAY
            }
            ShortError::RequestError(_) => StatusCode::BAD_REQUEST,
            ShortError::TimeoutError(_)
            | ShortError::HttpError(_)
            | ShortError::JsonError(_)
            | ShortError::IoError(_)
            | ShortError::EnvError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The message placed in the `error` field of the response body.
    ///
    /// Upstream errors pass the provider's own message through (or nothing);
    /// transport failures get a fixed, user-actionable text.
    pub fn public_message(&self) -> Option<String> {
        match self {
            ShortError::UpstreamError { message, .. } => message.clone(),
            ShortError::TimeoutError(_) => Some(TIMEOUT_MESSAGE.to_string()),
            ShortError::HttpError(_) | ShortError::IoError(_) => {
                Some(NETWORK_MESSAGE.to_string())
            }
            other => Some(other.to_string()),
        }
    }
}

impl IntoResponse for ShortError {
    fn into_response(self) -> Response {
        let body = ErrorResult {
            error: self.public_message(),
        };
        (self.status(), Json(body)).into_response()
    }
}
