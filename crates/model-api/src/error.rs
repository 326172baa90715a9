//! API error type and its JSON error envelope.

use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use model_types::{ConfigError, ErrorResponse, ModelStatus, ModelStoreError};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] ModelStoreError),
    #[error("invalid model configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("model id must be a valid UUID: {0}")]
    InvalidModelId(String),
    #[error("request body could not be processed: {0}")]
    InvalidBody(String),
    #[error("results for model {id:?} are not available while its status is {status}")]
    ResultsNotAvailable { id: String, status: ModelStatus },
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Store(ModelStoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(ModelStoreError::DuplicateKey(_)) => StatusCode::CONFLICT,
            ApiError::Store(ModelStoreError::InvalidTransition { .. }) => StatusCode::CONFLICT,
            ApiError::Store(ModelStoreError::IdentityMismatch { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ApiError::Config(e) if e.is_inaccessible() => StatusCode::BAD_REQUEST,
            ApiError::Config(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidModelId(_) | ApiError::InvalidBody(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::ResultsNotAvailable { .. } => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable snake_case code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Store(ModelStoreError::NotFound(_)) => "model_not_found",
            ApiError::Store(ModelStoreError::DuplicateKey(_)) => "duplicate_model",
            ApiError::Store(ModelStoreError::InvalidTransition { .. }) => {
                "invalid_status_transition"
            }
            ApiError::Store(ModelStoreError::IdentityMismatch { .. }) => "identity_mismatch",
            ApiError::Config(e) if e.is_inaccessible() => "data_source_inaccessible",
            ApiError::Config(_) => "invalid_config",
            ApiError::InvalidModelId(_) => "invalid_model_id",
            ApiError::InvalidBody(_) => "invalid_request_body",
            ApiError::ResultsNotAvailable { .. } => "results_not_available",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), error = %self, "request failed");
        } else {
            tracing::debug!(code = self.code(), error = %self, "request rejected");
        }
        let body = ErrorResponse::single(self.code(), self.to_string());
        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidModelId(rejection.body_text())
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
