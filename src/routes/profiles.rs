use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    error::ApiError,
    models::{auth::AuthenticatedUser, profile::UpdateProfileRequest},
    services::profiles::ProfileService,
    AppState,
};

/// Admins see every profile; everyone else gets just their own row. The
/// select policy makes the cut; there is no role branch here.
pub async fn list_profiles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let profiles = ProfileService::list(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(profiles).unwrap()))
}

pub async fn get_my_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let profile = ProfileService::me(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}

pub async fn update_my_profile(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<UpdateProfileRequest>,
) -> Result<Json<Value>, ApiError> {
    body.validate()?;
    let profile = ProfileService::update_me(&state.db, &user, &body).await?;
    Ok(Json(serde_json::to_value(profile).unwrap()))
}
