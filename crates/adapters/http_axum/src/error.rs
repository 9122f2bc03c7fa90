//! HTTP error response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use plan_accion_domain::error::{AuthError, PlanError, ValidationError};

/// JSON error body returned by API endpoints.
#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Everything a handler can fail with.
#[derive(Debug)]
pub enum ApiError {
    /// A use-case failed.
    Domain(PlanError),
    /// The request could not be decoded (body, query string or path).
    BadRequest(String),
}

impl ApiError {
    pub(crate) fn bad_request(err: impl ToString) -> Self {
        Self::BadRequest(err.to_string())
    }

    fn status(&self) -> StatusCode {
        let err = match self {
            Self::BadRequest(_) => return StatusCode::BAD_REQUEST,
            Self::Domain(err) => err,
        };
        match err {
            PlanError::Validation(_) => StatusCode::BAD_REQUEST,
            PlanError::NotFound(_) => StatusCode::NOT_FOUND,
            PlanError::Conflict(_) => StatusCode::CONFLICT,
            PlanError::Auth(AuthError::Unauthenticated | AuthError::InvalidCredentials) => {
                StatusCode::UNAUTHORIZED
            }
            PlanError::Auth(
                AuthError::Forbidden | AuthError::AccountPending | AuthError::AccountRejected,
            ) => StatusCode::FORBIDDEN,
            PlanError::Storage(_) | PlanError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<PlanError> for ApiError {
    fn from(err: PlanError) -> Self {
        Self::Domain(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Domain(err.into())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        Self::Domain(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            Self::BadRequest(message) => message,
            Self::Domain(err) if status.is_server_error() => {
                tracing::error!(error = ?err, "request failed");
                "internal server error".to_string()
            }
            Self::Domain(PlanError::Validation(err)) => err.to_string(),
            Self::Domain(PlanError::Conflict(err)) => err.to_string(),
            Self::Domain(err) => err.to_string(),
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}
