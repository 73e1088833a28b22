use crate::dto::ErrorResponse;
use crate::validation::ValidationError;
use atlas::auth::AuthError;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use tracing::error;

/// Wraps core errors so each kind maps to one HTTP status.
#[derive(Debug)]
pub struct ApiError(pub AuthError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            AuthError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AuthError::UserAlreadyExists => StatusCode::CONFLICT,
            AuthError::InvalidCredentials
            | AuthError::InvalidRefreshToken
            | AuthError::SessionNotFound
            | AuthError::SessionExpired
            | AuthError::InvalidSessionOwner => StatusCode::UNAUTHORIZED,
            AuthError::HashingFailure(_)
            | AuthError::PersistenceError(_)
            | AuthError::TokenIssue(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError(err)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(AuthError::InvalidInput(err.to_string()))
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(AuthError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self.0 {
            AuthError::InvalidInput(details) => ErrorResponse::with_details("invalid input", details),
            err if status.is_server_error() => {
                // Internal detail stays in the logs
                error!(error = %err, "Request failed");
                ErrorResponse::new("internal server error")
            }
            err => ErrorResponse::new(err.to_string()),
        };

        (status, Json(body)).into_response()
    }
}
