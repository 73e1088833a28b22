use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::Json,
};
use atlas::auth::{AuthResponse, TokenPair};

use crate::dto::{LoginRequest, RefreshRequest, RegisterRequest};
use crate::error::ApiError;
use crate::state::AppState;
use crate::validation::{validate_login, validate_refresh, validate_register};

/// POST /api/v1/auth/register
///
/// Body: {"email": "...", "password": "...", "full_name": "..."}
///
/// Returns 201 with the new user's public fields and a token pair.
pub async fn register(
    State(state): State<AppState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    let Json(req) = body?;
    let input = validate_register(req)?;

    let response = state.auth_service.register(input).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/v1/auth/login
///
/// Body: {"email": "...", "password": "..."}
///
/// Unknown email and wrong password both answer 401 "Invalid credentials".
pub async fn login(
    State(state): State<AppState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, ApiError> {
    let Json(req) = body?;
    let input = validate_login(req)?;

    let response = state.auth_service.login(input).await?;

    Ok(Json(response))
}

/// POST /api/v1/auth/refresh
///
/// Body: {"refresh_token": "..."}
///
/// Returns a new token pair. The submitted refresh token cannot be used again.
pub async fn refresh(
    State(state): State<AppState>,
    body: Result<Json<RefreshRequest>, JsonRejection>,
) -> Result<Json<TokenPair>, ApiError> {
    let Json(req) = body?;
    let refresh_token = validate_refresh(req)?;

    let tokens = state.auth_service.refresh(&refresh_token).await?;

    Ok(Json(tokens))
}
