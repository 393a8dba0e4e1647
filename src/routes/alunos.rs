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
        aluno::{CreateAlunoRequest, UpdateAlunoRequest},
        auth::AuthenticatedUser,
    },
    services::alunos::AlunoService,
    AppState,
};

pub async fn list_alunos(
    State(state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<Json<Value>, ApiError> {
    let alunos = AlunoService::list(&state.db, &user).await?;
    Ok(Json(serde_json::to_value(alunos).unwrap()))
}

pub async fn create_aluno(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Json(body): Json<CreateAlunoRequest>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let aluno = AlunoService::create(&state.db, &user, &body).await?;
    Ok((StatusCode::CREATED, Json(serde_json::to_value(aluno).unwrap())))
}

pub async fn update_aluno(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAlunoRequest>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;
    body.validate()?;

    let aluno = AlunoService::update(&state.db, &user, id, &body).await?;
    Ok(Json(serde_json::to_value(aluno).unwrap()))
}

/// Soft delete: flips the lifecycle status to INACTIVE, keeping the row
/// and its enrollments.
pub async fn delete_aluno(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    require_admin(&user)?;

    AlunoService::soft_delete(&state.db, &user, id).await?;
    Ok(Json(json!({ "message": "Aluno inativado" })))
}
