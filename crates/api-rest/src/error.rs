use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use ward_core::ServiceError;

/// Body of every error response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    Service(ServiceError),
    /// A path or query parameter the handler could not use.
    BadRequest(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        ApiError::Service(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Service(err) => match err {
                ServiceError::NotFound { .. } => StatusCode::NOT_FOUND,
                ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
                ServiceError::BatchPartialFailure { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                ServiceError::Transport(_) => StatusCode::BAD_GATEWAY,
                ServiceError::InvalidConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Service(err) => err.to_string(),
            ApiError::BadRequest(message) => message,
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), "request failed: {}", error);
        } else {
            tracing::warn!(status = status.as_u16(), "request rejected: {}", error);
        }

        (status, Json(ErrorBody { error })).into_response()
    }
}
