// ABOUTME: API error type and its JSON error envelope
// ABOUTME: Maps library errors and extractor rejections to status codes

use axum::{
    extract::{
        multipart::MultipartError,
        rejection::{JsonRejection, QueryRejection},
        FromRequest, FromRequestParts,
    },
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::collections::HashMap;
use storefront_core::ValidationErrors;
use storefront_media::MediaError;
use storefront_security::SecurityError;
use storefront_storage::StorageError;
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

/// Main application error type that all handlers should return
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Rate limit exceeded")]
    RateLimitExceeded { retry_after: u64, limit: u32 },

    #[error("Request body too large")]
    PayloadTooLarge,

    #[error("Media uploads are not configured")]
    ServiceUnavailable,

    #[error("Media upload failed: {0}")]
    MediaUpload(MediaError),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

/// Structured error response format for API consistency
#[derive(Serialize)]
struct ErrorResponse {
    success: bool,
    error: ErrorDetail,
    request_id: String,
}

/// Error detail structure with machine-readable codes
#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<HashMap<String, String>>,
}

impl AppError {
    /// Convert AppError to appropriate HTTP status code and error code
    pub(crate) fn to_status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::InvalidTransition(_) => (StatusCode::CONFLICT, "INVALID_TRANSITION"),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            AppError::RateLimitExceeded { .. } => {
                (StatusCode::TOO_MANY_REQUESTS, "RATE_LIMIT_EXCEEDED")
            }
            AppError::PayloadTooLarge => (StatusCode::PAYLOAD_TOO_LARGE, "PAYLOAD_TOO_LARGE"),
            AppError::ServiceUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
            }
            AppError::MediaUpload(_) => (StatusCode::BAD_GATEWAY, "MEDIA_UPLOAD_FAILED"),
            AppError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, "STORAGE_ERROR"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }

    /// Get user-friendly error message (sanitized for external consumption)
    pub(crate) fn to_user_message(&self) -> String {
        match self {
            AppError::Validation(errors) => match errors.errors() {
                [only] => only.message.clone(),
                _ => "Validation failed".to_string(),
            },
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(resource) => format!("{} not found", resource),
            AppError::InvalidTransition(msg) => msg.clone(),
            AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::RateLimitExceeded { .. } => {
                "Too many requests. Please try again later".to_string()
            }
            AppError::PayloadTooLarge => "Request body is too large".to_string(),
            AppError::ServiceUnavailable => "Media uploads are not available".to_string(),
            AppError::MediaUpload(_) => "Image upload failed".to_string(),
            AppError::Storage(_) => "Data storage error".to_string(),
            AppError::Internal(_) => "An internal server error occurred".to_string(),
        }
    }

    fn details(&self) -> Option<HashMap<String, String>> {
        match self {
            AppError::Validation(errors) => Some(
                errors
                    .errors()
                    .iter()
                    .map(|e| (e.field.clone(), e.message.clone()))
                    .collect(),
            ),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let request_id = Uuid::new_v4().to_string();
        let (status_code, error_code) = self.to_status_and_code();
        let user_message = self.to_user_message();

        // Log internal errors with full context but don't expose details
        match &self {
            AppError::Internal(err) => {
                error!(
                    request_id = %request_id,
                    error = %err,
                    "Internal server error occurred"
                );
            }
            AppError::Storage(err) => {
                error!(
                    request_id = %request_id,
                    storage_error = %err,
                    "Storage system error"
                );
            }
            AppError::MediaUpload(err) => {
                error!(
                    request_id = %request_id,
                    media_error = %err,
                    "Media upload failed"
                );
            }
            AppError::InvalidCredentials | AppError::Unauthorized => {
                warn!(
                    request_id = %request_id,
                    error_code = %error_code,
                    audit = true,
                    "Rejected admin request"
                );
            }
            AppError::RateLimitExceeded { retry_after, .. } => {
                warn!(
                    request_id = %request_id,
                    retry_after = %retry_after,
                    audit = true,
                    "Rate limit exceeded"
                );
            }
            _ => {
                info!(
                    request_id = %request_id,
                    error_code = %error_code,
                    error = %self,
                    "API error response"
                );
            }
        }

        let mut error_detail = ErrorDetail {
            code: error_code.to_string(),
            message: user_message,
            retry_after: None,
            details: self.details(),
        };

        if let AppError::RateLimitExceeded { retry_after, .. } = &self {
            error_detail.retry_after = Some(*retry_after);
        }

        let error_response = ErrorResponse {
            success: false,
            error: error_detail,
            request_id,
        };

        let mut response = (status_code, Json(error_response)).into_response();

        if let AppError::RateLimitExceeded { retry_after, limit } = &self {
            let headers = response.headers_mut();
            headers.insert(header::RETRY_AFTER, HeaderValue::from(*retry_after));
            headers.insert("x-ratelimit-limit", HeaderValue::from(*limit));
            headers.insert("x-ratelimit-remaining", HeaderValue::from_static("0"));
        }

        response
    }
}

/// Result type alias for API handlers
pub type ApiResult<T> = Result<T, AppError>;

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(resource) => AppError::NotFound(resource),
            StorageError::Validation(errors) => AppError::Validation(errors),
            StorageError::InvalidTransition(msg) => AppError::InvalidTransition(msg),
            StorageError::Conflict(msg) => AppError::Conflict(msg),
            other => AppError::Storage(other),
        }
    }
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::InvalidCredentials => AppError::InvalidCredentials,
            SecurityError::Unauthorized => AppError::Unauthorized,
            SecurityError::InvalidInput { field, message } => {
                AppError::Validation(ValidationErrors::single(field, message))
            }
            SecurityError::AdminExists(name) => {
                AppError::Conflict(format!("Admin '{}' already exists", name))
            }
            SecurityError::AdminNotFound(_) => AppError::NotFound("Admin"),
            SecurityError::Storage(err) => err.into(),
            SecurityError::Hashing(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        if err.is_invalid_input() {
            return AppError::Validation(ValidationErrors::single("file", err.to_string()));
        }
        match err {
            MediaError::NotConfigured => AppError::ServiceUnavailable,
            other => AppError::MediaUpload(other),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::BadRequest(err.body_text())
        }
    }
}

/// `Json` whose rejection uses the API error envelope
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `Query` whose rejection uses the API error envelope
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
