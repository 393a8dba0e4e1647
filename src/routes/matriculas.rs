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
    models::{
        auth::AuthenticatedUser,
        matricula::{CreateMatriculaRequest, UpdateMatriculaRequest},
    },
    services::matriculas::MatriculaService,
    AppState,
};

pub async fn list_matriculas(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let matriculas = MatriculaService::list(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(matriculas).unwrap()))
}

pub async fn create_matricula(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateMatriculaRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let matricula = MatriculaService::create(&state.db, &user, &body).await?;
    Ok((
        StatusCode::CREATED,
        Json(serde_json::to_value(matricula).unwrap()),
    ))
}

pub async fn update_matricula(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMatriculaRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let matricula = MatriculaService::update(&state.db, &user, id, &body).await?;
    Ok(Json(serde_json::to_value(matricula).unwrap()))
}

pub async fn delete_matricula(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    MatriculaService::delete(&state.db, &user, id).await?;
    Ok(Json(json!({ "message": "Matrícula removida" })))
}
