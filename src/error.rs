//! Error types for the items server.
//!
//! This module defines all error types using `thiserror` for ergonomic error handling.
//! The HTTP boundary performs exactly one translation step from error kind to
//! status code via the [`IntoResponse`] impl; handlers never map errors themselves.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or non-positive resource id in the request path.
    #[error("invalid item id {raw:?}")]
    InvalidIdentifier { raw: String },

    /// Missing or malformed field in a create/update body.
    #[error("invalid payload: {message}")]
    InvalidPayload { message: String },

    /// No row matches the requested id.
    #[error("item {id} not found")]
    NotFound { id: i64 },

    /// Required configuration is absent or unusable.
    #[error("configuration error: {message}")]
    Configuration { message: String },

    /// The pool, schema provisioning, or a connection failed.
    #[error("persistence unavailable: {message}")]
    Unavailable { message: String },

    /// Unexpected store-level failure on a read or write.
    #[error("persistence error: {message}")]
    Persistence { message: String },

    /// An operation exceeded its time budget.
    #[error("timeout: {operation} exceeded {elapsed_secs}s")]
    Timeout { operation: String, elapsed_secs: u64 },
}

impl ApiError {
    /// Create an invalid identifier error from the raw path segment.
    pub fn invalid_identifier(raw: impl Into<String>) -> Self {
        Self::InvalidIdentifier { raw: raw.into() }
    }

    /// Create an invalid payload error. The message is echoed to the client.
    pub fn invalid_payload(message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            message: message.into(),
        }
    }

    /// Create a not found error.
    pub fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a persistence unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a persistence error.
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, elapsed_secs: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            elapsed_secs,
        }
    }

    /// HTTP status code for this error kind.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidIdentifier { .. } | Self::InvalidPayload { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Configuration { .. }
            | Self::Unavailable { .. }
            | Self::Persistence { .. }
            | Self::Timeout { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message echoed to the client. Server-side failures always map to a
    /// generic message; internal detail goes to the log, never to the caller.
    pub fn client_message(&self) -> String {
        match self {
            Self::InvalidIdentifier { .. } => "invalid id".to_string(),
            Self::InvalidPayload { message } => message.clone(),
            Self::NotFound { .. } => "not found".to_string(),
            Self::Configuration { .. }
            | Self::Unavailable { .. }
            | Self::Persistence { .. }
            | Self::Timeout { .. } => "Internal Server Error".to_string(),
        }
    }
}

/// Convert sqlx errors to ApiError.
impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Configuration(msg) => ApiError::configuration(msg.to_string()),
            sqlx::Error::Database(db_err) => {
                let message = match db_err.code() {
                    Some(code) => format!("{} (SQLSTATE: {})", db_err.message(), code),
                    None => db_err.message().to_string(),
                };
                ApiError::persistence(message)
            }
            sqlx::Error::PoolTimedOut => ApiError::timeout("connection pool acquire", 30),
            sqlx::Error::PoolClosed => ApiError::unavailable("connection pool is closed"),
            sqlx::Error::Io(io_err) => ApiError::unavailable(format!("I/O error: {}", io_err)),
            sqlx::Error::Tls(tls_err) => ApiError::unavailable(format!("TLS error: {}", tls_err)),
            sqlx::Error::Protocol(msg) => ApiError::unavailable(format!("protocol error: {}", msg)),
            sqlx::Error::RowNotFound => ApiError::persistence("no rows returned"),
            sqlx::Error::ColumnNotFound(col) => {
                ApiError::persistence(format!("column not found: {}", col))
            }
            sqlx::Error::ColumnDecode { index, source } => {
                ApiError::persistence(format!("failed to decode column {}: {}", index, source))
            }
            sqlx::Error::Decode(source) => ApiError::persistence(format!("decode error: {}", source)),
            sqlx::Error::WorkerCrashed => ApiError::unavailable("database worker crashed"),
            _ => ApiError::persistence(format!("unknown database error: {}", err)),
        }
    }
}

/// Single translation point from error kind to HTTP response.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        }
        (status, Json(json!({ "error": self.client_message() }))).into_response()
    }
}

/// Result type alias for fallible operations in this crate.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ApiError::not_found(42);
        assert!(err.to_string().contains("42"));
        let err = ApiError::timeout("list items", 30);
        assert!(err.to_string().contains("exceeded 30s"));
    }

    #[test]
    fn test_validation_errors_map_to_400() {
        assert_eq!(
            ApiError::invalid_identifier("abc").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::invalid_payload("name is required").status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_not_found_maps_to_404() {
        assert_eq!(ApiError::not_found(1).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_store_errors_map_to_500() {
        assert_eq!(
            ApiError::unavailable("down").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::configuration("DATABASE_URL is not set").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::persistence("constraint").status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::timeout("query", 30).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_client_message_never_leaks_internal_detail() {
        let err = ApiError::unavailable("password authentication failed for user postgres");
        assert_eq!(err.client_message(), "Internal Server Error");
        let err = ApiError::persistence("duplicate key value violates unique constraint");
        assert_eq!(err.client_message(), "Internal Server Error");
    }

    #[test]
    fn test_invalid_payload_message_echoed() {
        let err = ApiError::invalid_payload("description must be string or null");
        assert_eq!(err.client_message(), "description must be string or null");
    }

    #[test]
    fn test_sqlx_pool_timeout_maps_to_timeout() {
        let err: ApiError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, ApiError::Timeout { .. }));
    }

    #[test]
    fn test_sqlx_pool_closed_maps_to_unavailable() {
        let err: ApiError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, ApiError::Unavailable { .. }));
    }

    #[test]
    fn test_sqlx_row_not_found_maps_to_persistence() {
        let err: ApiError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ApiError::Persistence { .. }));
    }

    #[tokio::test]
    async fn test_error_response_body_shape() {
        let response = ApiError::invalid_identifier("abc").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({ "error": "invalid id" }));
    }
}
