use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::auth::require_admin,
    models::{auth::AuthenticatedUser, user::AssignRoleRequest},
    services::roles::RoleService,
    AppState,
};

/// Non-admins see only their own assignments (select policy), so this
/// doubles as "what am I allowed to do".
pub async fn list_roles(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let assignments = RoleService::list(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(assignments).unwrap()))
}

pub async fn assign_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<AssignRoleRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&user)?;

    let assignment = RoleService::assign(&state.db, &user, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(assignment).unwrap()),
    ))
}

pub async fn revoke_role(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    RoleService::revoke(&state.db, &user, id).await?;
    Ok(Json(json!({ "message": "Papel revogado" })))
}
