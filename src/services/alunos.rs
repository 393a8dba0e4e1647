use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    error::ApiError,
    models::{
        aluno::{Aluno, CreateAlunoRequest, UpdateAlunoRequest},
        auth::AuthenticatedUser,
    },
};

// status is a custom Postgres enum; always fetched as TEXT.
const ALUNO_COLUMNS: &str = "id, matricula, nome, cpf, email, data_nascimento, telefone, \
     status::TEXT as status, created_at, updated_at";

pub struct AlunoService;

impl AlunoService {
    pub async fn list(pool: &PgPool, user: &AuthenticatedUser) -> Result<Vec<Aluno>, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let alunos = sqlx::query_as::<_, Aluno>(&format!(
            "SELECT {ALUNO_COLUMNS} FROM alunos ORDER BY nome"
        ))
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(alunos)
    }

    pub async fn create(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &CreateAlunoRequest,
    ) -> Result<Aluno, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let aluno = sqlx::query_as::<_, Aluno>(&format!(
            "INSERT INTO alunos (matricula, nome, cpf, email, data_nascimento, telefone, status)
             VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 'ACTIVE')::status_aluno)
             RETURNING {ALUNO_COLUMNS}"
        ))
        .bind(&req.matricula)
        .bind(&req.nome)
        .bind(&req.cpf)
        .bind(&req.email)
        .bind(req.data_nascimento)
        .bind(&req.telefone)
        .bind(req.status.map(|s| s.to_string()))
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(aluno)
    }

    pub async fn update(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
        req: &UpdateAlunoRequest,
    ) -> Result<Aluno, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let aluno = sqlx::query_as::<_, Aluno>(&format!(
            "UPDATE alunos
             SET matricula       = COALESCE($1, matricula),
                 nome            = COALESCE($2, nome),
                 cpf             = COALESCE($3, cpf),
                 email           = COALESCE($4, email),
                 data_nascimento = COALESCE($5, data_nascimento),
                 telefone        = COALESCE($6, telefone),
                 status          = COALESCE($7::status_aluno, status)
             WHERE id = $8
             RETURNING {ALUNO_COLUMNS}"
        ))
        .bind(&req.matricula)
        .bind(&req.nome)
        .bind(&req.cpf)
        .bind(&req.email)
        .bind(req.data_nascimento)
        .bind(&req.telefone)
        .bind(req.status.map(|s| s.to_string()))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Aluno não encontrado".into()))?;
        tx.commit().await?;
        Ok(aluno)
    }

    /// "Deletion" is a lifecycle transition: the row stays, status flips to
    /// INACTIVE, enrollments and history remain intact.
    pub async fn soft_delete(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let result = sqlx::query("UPDATE alunos SET status = 'INACTIVE' WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Aluno não encontrado".into()));
        }
        Ok(())
    }
}
