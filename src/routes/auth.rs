use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::{
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        user::{LoginRequest, RefreshTokenRequest, RegisterRequest},
    },
    services::{auth::AuthService, profiles::ProfileService},
    AppState,
};

pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    body.validate()?;

    let response = AuthService::register(
        &state.db,
        &body.email,
        &body.password,
        body.nome.as_deref(),
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(serde_json::to_value(response).unwrap())))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<Value>, ApiError> {
    let response = AuthService::login(
        &state.db,
        &body.email,
        &body.password,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await?;

    Ok(Json(serde_json::to_value(response).unwrap()))
}

pub async fn refresh_token(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    let response = AuthService::refresh(
        &state.db,
        &body.refresh_token,
        &state.config.jwt_secret,
        &state.config.jwt_refresh_secret,
        state.config.jwt_expiry_seconds,
        state.config.jwt_refresh_expiry_days,
    )
    .await?;

    Ok(Json(serde_json::to_value(response).unwrap()))
}

pub async fn logout(
    State(state): State<AppState>,
    Json(body): Json<RefreshTokenRequest>,
) -> Result<Json<Value>, ApiError> {
    AuthService::logout(&state.db, &body.refresh_token, &state.config.jwt_refresh_secret)
        .await?;
    Ok(Json(json!({ "message": "Sessão encerrada" })))
}

/// Identity echo: the caller's own profile (via the row-level policy) plus
/// the role list carried in the token.
pub async fn me(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let profile = ProfileService::me(&state.db, &user).await?;
    Ok(Json(json!({
        "user": serde_json::to_value(profile).unwrap(),
        "roles": user.roles,
    })))
}
