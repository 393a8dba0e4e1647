use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Error surface of the API. Validation failures are caught before any
/// statement is issued; store rejections are classified by SQLSTATE, with
/// uniqueness and foreign-key cases given a friendlier hint derived from
/// the violated constraint name. Policy denials stay generic.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("Acesso negado")]
    Forbidden,
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Database(sqlx::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db) = err {
            match db.code().as_deref() {
                Some("23505") => return ApiError::Conflict(unique_hint(db.constraint())),
                Some("23503") => return ApiError::Conflict(fk_hint(db.constraint())),
                Some("42501") => return ApiError::Forbidden,
                _ => {}
            }
        }
        if matches!(err, sqlx::Error::RowNotFound) {
            return ApiError::NotFound("Registro não encontrado".into());
        }
        ApiError::Database(err)
    }
}

impl From<bcrypt::BcryptError> for ApiError {
    fn from(err: bcrypt::BcryptError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<jsonwebtoken::errors::Error> for ApiError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ApiError::Internal(err.into())
    }
}

/// Friendlier message for a uniqueness violation, keyed on the constraint.
fn unique_hint(constraint: Option<&str>) -> String {
    let msg = match constraint {
        Some("cursos_nome_key") => "Já existe um curso com este nome",
        Some("cursos_codigo_key") => "Já existe um curso com este código",
        Some("alunos_matricula_key") => "Já existe um aluno com esta matrícula",
        Some("alunos_cpf_key") => "Já existe um aluno com este CPF",
        Some("alunos_email_key") => "Já existe um aluno com este email",
        Some("matriculas_aluno_id_curso_id_key") => "Aluno já matriculado neste curso",
        Some("user_roles_user_id_role_key") => "Papel já atribuído a este usuário",
        Some("users_email_key") | Some("profiles_email_key") => "Email já cadastrado",
        _ => "Registro duplicado",
    };
    msg.to_string()
}

/// Friendlier message for a foreign-key violation.
fn fk_hint(constraint: Option<&str>) -> String {
    let msg = match constraint {
        Some("matriculas_curso_id_fkey") => {
            "Curso possui matrículas e não pode ser removido"
        }
        Some("matriculas_aluno_id_fkey") => "Aluno inexistente",
        _ => "Registro possui vínculos e não pode ser alterado",
    };
    msg.to_string()
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(m) => (StatusCode::UNPROCESSABLE_ENTITY, m.clone()),
            ApiError::Unauthorized(m) => (StatusCode::UNAUTHORIZED, m.clone()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m.clone()),
            ApiError::Database(e) => {
                tracing::error!("database error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno".to_string())
            }
            ApiError::Internal(e) => {
                tracing::error!("internal error: {e}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno".to_string())
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_hint_covers_course_constraints() {
        assert_eq!(
            unique_hint(Some("cursos_codigo_key")),
            "Já existe um curso com este código"
        );
        assert_eq!(
            unique_hint(Some("cursos_nome_key")),
            "Já existe um curso com este nome"
        );
    }

    #[test]
    fn unique_hint_covers_duplicate_enrollment() {
        assert_eq!(
            unique_hint(Some("matriculas_aluno_id_curso_id_key")),
            "Aluno já matriculado neste curso"
        );
    }

    #[test]
    fn unique_hint_falls_back_to_generic() {
        assert_eq!(unique_hint(Some("whatever_key")), "Registro duplicado");
        assert_eq!(unique_hint(None), "Registro duplicado");
    }

    #[test]
    fn fk_hint_names_course_with_enrollments() {
        assert_eq!(
            fk_hint(Some("matriculas_curso_id_fkey")),
            "Curso possui matrículas e não pode ser removido"
        );
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = ApiError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
