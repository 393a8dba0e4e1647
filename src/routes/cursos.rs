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
        curso::{CreateCursoRequest, UpdateCursoRequest},
    },
    services::cursos::CursoService,
    AppState,
};

pub async fn list_cursos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let cursos = CursoService::list(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(cursos).unwrap()))
}

pub async fn create_curso(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateCursoRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let curso = CursoService::create(&state.db, &user, &body).await?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(curso).unwrap())))
}

pub async fn update_curso(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateCursoRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let curso = CursoService::update(&state.db, &user, id, &body).await?;
    Ok(Json(serde_json::to_value(curso).unwrap()))
}

pub async fn delete_curso(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    CursoService::delete(&state.db, &user, id).await?;
    Ok(Json(json!({ "message": "Curso removido" })))
}
