use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        matricula::{
            CreateMatriculaRequest, Matricula, MatriculaDetalhe, UpdateMatriculaRequest,
        },
    },
};

pub struct MatriculaService;

impl MatriculaService {
    /// Enrollments with the referenced aluno and curso display fields
    /// embedded in a single joined query.
    pub async fn list(
        pool: &PgPool,
        user: &AuthenticatedUser,
    ) -> Result<Vec<MatriculaDetalhe>, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let matriculas = sqlx::query_as::<_, MatriculaDetalhe>(
            "SELECT m.id, m.aluno_id, a.nome AS aluno_nome, a.matricula AS aluno_matricula,
                    m.curso_id, c.nome AS curso_nome, c.codigo AS curso_codigo,
                    m.ano_ingresso, m.semestre_ingresso, m.created_at
             FROM matriculas m
             JOIN alunos a ON a.id = m.aluno_id
             JOIN cursos c ON c.id = m.curso_id
             ORDER BY a.nome, c.nome",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(matriculas)
    }

    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &CreateMatriculaRequest,
    ) -> Result<Matricula, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let matricula = sqlx::query_as::<_, Matricula>(
            "INSERT INTO matriculas (aluno_id, curso_id, ano_ingresso, semestre_ingresso)
             VALUES ($1, $2, $3, $4)
             RETURNING *",
        )
        .bind(req.aluno_id)
        .bind(req.curso_id)
        .bind(req.ano_ingresso)
        .bind(req.semestre_ingresso)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(matricula)
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        req: &UpdateMatriculaRequest,
    ) -> Result<Matricula, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let matricula = sqlx::query_as::<_, Matricula>(
            "UPDATE matriculas
             SET ano_ingresso      = COALESCE($1, ano_ingresso),
                 semestre_ingresso = COALESCE($2, semestre_ingresso)
             WHERE id = $3
             RETURNING *",
        )
        .bind(req.ano_ingresso)
        .bind(req.semestre_ingresso)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Matrícula não encontrada".into()))?;
        tx.commit().await?;
        Ok(matricula)
    }

    pub async fn delete(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let result = sqlx::query("DELETE FROM matriculas WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Matrícula não encontrada".into()));
        }
        Ok(())
    }
}
