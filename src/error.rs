//! Error types for the relay server
//!
//! Defines application-level errors and connection send errors.
//! Uses thiserror for ergonomic error definitions.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

/// Application-level errors
///
/// Request-path errors map to HTTP responses via `IntoResponse`;
/// `Io` is process-fatal and only produced at startup.
#[derive(Debug, Error)]
pub enum AppError {
    /// Room not found with the given code
    #[error("Room not found: {0}")]
    RoomNotFound(String),

    /// Required query parameter missing from the request
    #[error("Missing parameter: {0}")]
    MissingParameter(&'static str),

    /// IO error (fatal - listener failed to bind)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match self {
            AppError::RoomNotFound(_) => StatusCode::NOT_FOUND,
            AppError::MissingParameter(_) => StatusCode::BAD_REQUEST,
            AppError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}

/// Connection send errors
///
/// Local to attach/broadcast; recovery is pruning the failing
/// connection, never propagating to other peers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SendError {
    /// The receiving end of the outbound channel has been closed
    #[error("Connection closed")]
    Closed,

    /// The outbound buffer is full (peer too slow to drain it)
    #[error("Connection send buffer full")]
    Full,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        let resp = AppError::RoomNotFound("123456".to_string()).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = AppError::MissingParameter("room").into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
