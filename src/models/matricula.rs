use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Matricula {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub curso_id: Uuid,
    pub ano_ingresso: i32,
    pub semestre_ingresso: i16,
    pub created_at: DateTime<Utc>,
}

/// Listing row with the referenced aluno and curso display fields embedded
/// (single joined query).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MatriculaDetalhe {
    pub id: Uuid,
    pub aluno_id: Uuid,
    pub aluno_nome: String,
    pub aluno_matricula: String,
    pub curso_id: Uuid,
    pub curso_nome: String,
    pub curso_codigo: String,
    pub ano_ingresso: i32,
    pub semestre_ingresso: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateMatriculaRequest {
    pub aluno_id: Uuid,
    pub curso_id: Uuid,
    pub ano_ingresso: i32,
    pub semestre_ingresso: i16,
}

#[derive(Debug, Deserialize)]
pub struct UpdateMatriculaRequest {
    pub ano_ingresso: Option<i32>,
    pub semestre_ingresso: Option<i16>,
}

impl CreateMatriculaRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        check_ano(self.ano_ingresso)?;
        check_semestre(self.semestre_ingresso)
    }
}

impl UpdateMatriculaRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(ano) = self.ano_ingresso {
            check_ano(ano)?;
        }
        if let Some(semestre) = self.semestre_ingresso {
            check_semestre(semestre)?;
        }
        Ok(())
    }
}

fn check_ano(ano: i32) -> Result<(), ApiError> {
    if !(1900..=2100).contains(&ano) {
        return Err(ApiError::Validation("Ano de ingresso inválido".into()));
    }
    Ok(())
}

fn check_semestre(semestre: i16) -> Result<(), ApiError> {
    if semestre != 1 && semestre != 2 {
        return Err(ApiError::Validation(
            "Semestre de ingresso deve ser 1 ou 2".into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_entry_period() {
        let req = CreateMatriculaRequest {
            aluno_id: Uuid::new_v4(),
            curso_id: Uuid::new_v4(),
            ano_ingresso: 2025,
            semestre_ingresso: 1,
        };
        assert!(req.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_range_year_and_term() {
        let req = CreateMatriculaRequest {
            aluno_id: Uuid::new_v4(),
            curso_id: Uuid::new_v4(),
            ano_ingresso: 1899,
            semestre_ingresso: 1,
        };
        assert!(req.validate().is_err());

        let req = CreateMatriculaRequest {
            aluno_id: Uuid::new_v4(),
            curso_id: Uuid::new_v4(),
            ano_ingresso: 2025,
            semestre_ingresso: 3,
        };
        assert!(req.validate().is_err());
    }
}
