// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for the service and the ingestion job

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Each variant maps to an HTTP status code and a JSON body
/// of the shape {"error": {"code", "message", "timestamp"}}
#[derive(Error, Debug)]
pub enum MosqueError {
    #[error("Mosque not found: {0}")]
    NotFound(String),

    #[error("Mosque already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Network failures, non-2xx responses, unparseable bodies and
    /// unexpected upstream statuses
    #[error("External API error: {0}")]
    ExternalApiError(String),

    /// The upstream service refused the request; repeating it won't help
    #[error("External API rejected request: {0}")]
    ExternalApiRejected(String),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Export error: {0}")]
    ExportError(String),
}

impl MosqueError {
    /// Whether a failed external call is worth repeating
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            MosqueError::ExternalApiError(_) | MosqueError::RateLimitExceeded
        )
    }

    fn error_code(&self) -> &'static str {
        match self {
            MosqueError::NotFound(_) => "NOT_FOUND",
            MosqueError::AlreadyExists(_) => "ALREADY_EXISTS",
            MosqueError::DatabaseError(_) => "DATABASE_ERROR",
            MosqueError::InvalidInput(_) => "INVALID_INPUT",
            MosqueError::ValidationError(_) => "VALIDATION_ERROR",
            MosqueError::ExternalApiError(_) => "EXTERNAL_API_ERROR",
            MosqueError::ExternalApiRejected(_) => "EXTERNAL_API_REJECTED",
            MosqueError::RateLimitExceeded => "RATE_LIMIT_EXCEEDED",
            MosqueError::ExportError(_) => "EXPORT_ERROR",
        }
    }
}

impl From<sqlx::Error> for MosqueError {
    fn from(e: sqlx::Error) -> Self {
        MosqueError::DatabaseError(e.to_string())
    }
}

/// Convert MosqueError to HTTP response
impl ResponseError for MosqueError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({
            "error": {
                "code": self.error_code(),
                "message": self.to_string(),
                "timestamp": chrono::Utc::now().to_rfc3339()
            }
        });

        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            MosqueError::NotFound(_) => StatusCode::NOT_FOUND,
            MosqueError::AlreadyExists(_) => StatusCode::CONFLICT,
            MosqueError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            MosqueError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            MosqueError::ValidationError(_) => StatusCode::BAD_REQUEST,
            MosqueError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
            MosqueError::ExternalApiRejected(_) => StatusCode::BAD_GATEWAY,
            MosqueError::RateLimitExceeded => StatusCode::TOO_MANY_REQUESTS,
            MosqueError::ExportError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(MosqueError::ExternalApiError("timeout".into()).is_retryable());
        assert!(MosqueError::RateLimitExceeded.is_retryable());
        assert!(!MosqueError::ExternalApiRejected("REQUEST_DENIED".into()).is_retryable());
        assert!(!MosqueError::NotFound("abc".into()).is_retryable());
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(
            MosqueError::NotFound("abc".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            MosqueError::AlreadyExists("abc".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            MosqueError::ValidationError("name".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }
}
