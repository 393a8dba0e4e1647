use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Curso {
    pub id: Uuid,
    pub nome: String,
    pub codigo: String,
    pub duracao_semestres: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateCursoRequest {
    pub nome: String,
    pub codigo: String,
    pub duracao_semestres: i32,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCursoRequest {
    pub nome: Option<String>,
    pub codigo: Option<String>,
    pub duracao_semestres: Option<i32>,
}

impl CreateCursoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.nome.trim().is_empty() {
            return Err(ApiError::Validation("Nome do curso é obrigatório".into()));
        }
        if self.codigo.trim().is_empty() {
            return Err(ApiError::Validation("Código do curso é obrigatório".into()));
        }
        check_duracao(self.duracao_semestres)
    }
}

impl UpdateCursoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(nome) = &self.nome {
            if nome.trim().is_empty() {
                return Err(ApiError::Validation("Nome do curso é obrigatório".into()));
            }
        }
        if let Some(codigo) = &self.codigo {
            if codigo.trim().is_empty() {
                return Err(ApiError::Validation("Código do curso é obrigatório".into()));
            }
        }
        if let Some(d) = self.duracao_semestres {
            check_duracao(d)?;
        }
        Ok(())
    }
}

fn check_duracao(d: i32) -> Result<(), ApiError> {
    if d < 1 {
        return Err(ApiError::Validation(
            "Duração deve ser um número positivo de semestres".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(nome: &str, codigo: &str, duracao: i32) -> CreateCursoRequest {
        CreateCursoRequest {
            nome: nome.into(),
            codigo: codigo.into(),
            duracao_semestres: duracao,
        }
    }

    #[test]
    fn accepts_well_formed_course() {
        assert!(req("Engenharia de Software", "ENG-SW", 8).validate().is_ok());
    }

    #[test]
    fn rejects_blank_fields_and_nonpositive_duration() {
        assert!(req("", "ENG-SW", 8).validate().is_err());
        assert!(req("Engenharia", "  ", 8).validate().is_err());
        assert!(req("Engenharia", "ENG-SW", 0).validate().is_err());
        assert!(req("Engenharia", "ENG-SW", -3).validate().is_err());
    }

    #[test]
    fn partial_update_only_checks_present_fields() {
        let upd = UpdateCursoRequest {
            nome: None,
            codigo: None,
            duracao_semestres: Some(4),
        };
        assert!(upd.validate().is_ok());

        let upd = UpdateCursoRequest {
            nome: Some(String::new()),
            codigo: None,
            duracao_semestres: None,
        };
        assert!(upd.validate().is_err());
    }
}
