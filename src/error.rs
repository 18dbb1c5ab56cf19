// src/error.rs

use std::fmt;

/// Client-side error enum.
/// Every fallible operation of the crate returns this type.
#[derive(Debug, Clone, PartialEq)]
pub enum AppError {
    // Transport failure (connection refused, timeout, TLS...)
    Network(String),

    // The server answered but the body did not have the expected shape
    BadResponse(String),

    // 400, or a request rejected locally before it was sent
    BadRequest(String),

    // 401 / 403
    AuthError(String),

    // 404
    NotFound(String),

    // 409 (e.g., already liked)
    Conflict(String),

    // 5xx and anything else unexpected
    ServerError(String),

    // Notification url that is not a known in-app destination
    InvalidDeepLink(String),

    // Missing or malformed configuration
    Config(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::error::Error for AppError {}

impl AppError {
    /// Maps a non-2xx HTTP status (and the server's message) onto an `AppError`.
    pub fn from_status(status: u16, message: String) -> Self {
        match status {
            400 | 422 => AppError::BadRequest(message),
            401 | 403 => AppError::AuthError(message),
            404 => AppError::NotFound(message),
            409 => AppError::Conflict(message),
            _ => AppError::ServerError(format!("{}: {}", status, message)),
        }
    }
}

/// Converts `reqwest::Error` into `AppError`.
/// Body decoding problems are reported as malformed responses,
/// everything else as transport failures.
impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::BadResponse(err.to_string())
        } else if let Some(status) = err.status() {
            AppError::from_status(status.as_u16(), err.to_string())
        } else {
            AppError::Network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadResponse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Config(err.to_string())
    }
}
