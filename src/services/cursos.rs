use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        curso::{CreateCursoRequest, Curso, UpdateCursoRequest},
    },
};

pub struct CursoService;

impl CursoService {
    pub async fn list(pool: &PgPool, user: &AuthenticatedUser) -> Result<Vec<Curso>, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let cursos = sqlx::query_as::<_, Curso>("SELECT * FROM cursos ORDER BY nome")
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(cursos)
    }

    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &CreateCursoRequest,
    ) -> Result<Curso, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let curso = sqlx::query_as::<_, Curso>(
            "INSERT INTO cursos (nome, codigo, duracao_semestres)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(&req.nome)
        .bind(&req.codigo)
        .bind(req.duracao_semestres)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(curso)
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        req: &UpdateCursoRequest,
    ) -> Result<Curso, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let curso = sqlx::query_as::<_, Curso>(
            "UPDATE cursos
             SET nome              = COALESCE($1, nome),
                 codigo            = COALESCE($2, codigo),
                 duracao_semestres = COALESCE($3, duracao_semestres)
             WHERE id = $4
             RETURNING *",
        )
        .bind(&req.nome)
        .bind(&req.codigo)
        .bind(req.duracao_semestres)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Curso não encontrado".into()))?;
        tx.commit().await?;
        Ok(curso)
    }

    /// Hard delete. The RESTRICT foreign key rejects the statement while
    /// the course still has enrollments.
    pub async fn delete(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let result = sqlx::query("DELETE FROM cursos WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Curso não encontrado".into()));
        }
        Ok(())
    }
}
