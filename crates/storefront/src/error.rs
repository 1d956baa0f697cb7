//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Every error response has the same JSON body:
//!
//! ```json
//! { "error": "Failed to fetch products", "timestamp": "2025-01-01T12:00:00Z" }
//! ```

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Database operation failed; `message` is safe to show to clients.
    #[error("{message}: {source}")]
    Failed {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub timestamp: DateTime<Utc>,
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Database(RepositoryError::InvalidInput(_)) | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Database(_) | Self::Failed { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    /// What the client sees. Internal details stay in logs and Sentry.
    fn public_message(&self) -> String {
        match self {
            Self::Database(RepositoryError::InvalidInput(msg)) | Self::BadRequest(msg) | Self::NotFound(msg) => {
                msg.clone()
            }
            Self::Database(_) => "Internal server error".to_string(),
            Self::Failed { message, .. } => (*message).to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let body = ErrorBody {
            error: self.public_message(),
            timestamp: Utc::now(),
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("Product not found".to_string());
        assert_eq!(err.to_string(), "Not found: Product not found");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(status_of(AppError::NotFound("x".to_string())), StatusCode::NOT_FOUND);
        assert_eq!(status_of(AppError::BadRequest("x".to_string())), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_of(AppError::Database(RepositoryError::InvalidInput("x".to_string()))),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(AppError::Database(RepositoryError::DataCorruption("x".to_string()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_envelope_hides_internal_detail() {
        let err = AppError::Failed {
            message: "Failed to fetch products",
            source: RepositoryError::DataCorruption("secret row detail".to_string()),
        };
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error, "Failed to fetch products");
        assert!(!String::from_utf8_lossy(&bytes).contains("secret row detail"));
    }
}
