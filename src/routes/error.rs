use actix_web::{error, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::models::ErrorResponse;
use crate::services::{LlmError, RequestError, StoreError};

/// Every failure an HTTP handler can surface
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("{0}")]
    Validation(String),

    #[error("X-User-Email header is required")]
    MissingRequester,

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Request(#[from] RequestError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Llm(#[from] LlmError),
}

impl ApiError {
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }

    pub fn profile_not_found(email: &str) -> Self {
        ApiError::NotFound(format!("No profile found for {}", email))
    }

    /// Short machine-readable label for the error body
    fn label(&self) -> &'static str {
        match self {
            ApiError::InvalidJson(_) => "invalid_json",
            ApiError::InvalidQuery(_) => "invalid_query",
            ApiError::Validation(_) => "validation_failed",
            ApiError::MissingRequester => "missing_requester",
            ApiError::NotFound(_) => "not_found",
            ApiError::Request(RequestError::SelfRequest) => "self_request",
            ApiError::Request(RequestError::Duplicate { .. }) => "duplicate_request",
            ApiError::Request(RequestError::NotFound(_)) => "not_found",
            ApiError::Request(RequestError::NotRecipient(_)) => "not_recipient",
            ApiError::Request(RequestError::Store(_)) | ApiError::Store(_) => "storage_error",
            ApiError::Llm(_) => "recommender_unavailable",
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson(_)
            | ApiError::InvalidQuery(_)
            | ApiError::Validation(_)
            | ApiError::Request(RequestError::SelfRequest) => StatusCode::BAD_REQUEST,
            ApiError::MissingRequester => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) | ApiError::Request(RequestError::NotFound(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Request(RequestError::Duplicate { .. }) => StatusCode::CONFLICT,
            ApiError::Request(RequestError::NotRecipient(_)) => StatusCode::FORBIDDEN,
            ApiError::Request(RequestError::Store(_)) | ApiError::Store(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Llm(_) => StatusCode::BAD_GATEWAY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }

        HttpResponse::build(status).json(ErrorResponse {
            error: self.label().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    ApiError::InvalidJson(err.to_string()).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::info!("Query payload error on {}: {}", req.path(), err);
    ApiError::InvalidQuery(err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::MissingRequester.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Request(RequestError::SelfRequest).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Request(RequestError::Duplicate {
                from: "a".into(),
                to: "b".into()
            })
            .status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Request(RequestError::NotRecipient(uuid::Uuid::nil())).status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::Llm(LlmError::InvalidResponse("x".into())).status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(ApiError::profile_not_found("a@b.edu").label(), "not_found");
        assert_eq!(
            ApiError::profile_not_found("a@b.edu").to_string(),
            "No profile found for a@b.edu"
        );
    }
}
