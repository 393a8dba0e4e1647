use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusAluno {
    Active,
    Inactive,
    Suspended,
    Graduated,
}

impl std::fmt::Display for StatusAluno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            StatusAluno::Active => "ACTIVE",
            StatusAluno::Inactive => "INACTIVE",
            StatusAluno::Suspended => "SUSPENDED",
            StatusAluno::Graduated => "GRADUATED",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for StatusAluno {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ACTIVE" => Ok(StatusAluno::Active),
            "INACTIVE" => Ok(StatusAluno::Inactive),
            "SUSPENDED" => Ok(StatusAluno::Suspended),
            "GRADUATED" => Ok(StatusAluno::Graduated),
            _ => Err(anyhow::anyhow!("Unknown status: {s}")),
        }
    }
}

/// DB row struct — status is fetched as TEXT (status::TEXT) to bypass the
/// SQLx enum OID mismatch on custom Postgres types.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Aluno {
    pub id: Uuid,
    pub matricula: String,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub telefone: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct CreateAlunoRequest {
    pub matricula: String,
    pub nome: String,
    pub cpf: String,
    pub email: String,
    pub data_nascimento: NaiveDate,
    pub telefone: Option<String>,
    pub status: Option<StatusAluno>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAlunoRequest {
    pub matricula: Option<String>,
    pub nome: Option<String>,
    pub cpf: Option<String>,
    pub email: Option<String>,
    pub data_nascimento: Option<NaiveDate>,
    pub telefone: Option<String>,
    pub status: Option<StatusAluno>,
}

impl CreateAlunoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if !is_valid_matricula(&self.matricula) {
            return Err(ApiError::Validation(
                "Matrícula deve seguir o formato AAAA-S-NNNN (ex.: 2025-1-0001)".into(),
            ));
        }
        if self.nome.trim().is_empty() {
            return Err(ApiError::Validation("Nome do aluno é obrigatório".into()));
        }
        if !is_valid_cpf_format(&self.cpf) {
            return Err(ApiError::Validation(
                "CPF deve seguir o formato 000.000.000-00".into(),
            ));
        }
        if !super::user::is_valid_email(&self.email) {
            return Err(ApiError::Validation("Email inválido".into()));
        }
        Ok(())
    }
}

impl UpdateAlunoRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(matricula) = &self.matricula {
            if !is_valid_matricula(matricula) {
                return Err(ApiError::Validation(
                    "Matrícula deve seguir o formato AAAA-S-NNNN (ex.: 2025-1-0001)".into(),
                ));
            }
        }
        if let Some(nome) = &self.nome {
            if nome.trim().is_empty() {
                return Err(ApiError::Validation("Nome do aluno é obrigatório".into()));
            }
        }
        if let Some(cpf) = &self.cpf {
            if !is_valid_cpf_format(cpf) {
                return Err(ApiError::Validation(
                    "CPF deve seguir o formato 000.000.000-00".into(),
                ));
            }
        }
        if let Some(email) = &self.email {
            if !super::user::is_valid_email(email) {
                return Err(ApiError::Validation("Email inválido".into()));
            }
        }
        Ok(())
    }
}

/// Matriculation id: four-digit year, dash, term digit (1 or 2), dash,
/// four-digit sequence. E.g. "2025-1-0001".
pub fn is_valid_matricula(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 11
        && b[..4].iter().all(|c| c.is_ascii_digit())
        && b[4] == b'-'
        && (b[5] == b'1' || b[5] == b'2')
        && b[6] == b'-'
        && b[7..].iter().all(|c| c.is_ascii_digit())
}

/// CPF display format: three groups of three digits separated by dots,
/// dash, two digits. Only the shape is checked; the store's uniqueness
/// constraint is the real gate.
pub fn is_valid_cpf_format(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() == 14
        && b.iter().enumerate().all(|(i, c)| match i {
            3 | 7 => *c == b'.',
            11 => *c == b'-',
            _ => c.is_ascii_digit(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn matricula_format_accepts_both_terms() {
        assert!(is_valid_matricula("2025-1-0001"));
        assert!(is_valid_matricula("1999-2-9876"));
    }

    #[test]
    fn matricula_format_rejects_malformed_ids() {
        assert!(!is_valid_matricula("2025-3-0001")); // term out of range
        assert!(!is_valid_matricula("25-1-0001")); // short year
        assert!(!is_valid_matricula("2025-1-001")); // short sequence
        assert!(!is_valid_matricula("2025/1/0001")); // wrong separators
        assert!(!is_valid_matricula("abcd-1-0001"));
        assert!(!is_valid_matricula(""));
    }

    #[test]
    fn cpf_format_checks_grouping() {
        assert!(is_valid_cpf_format("123.456.789-09"));
        assert!(!is_valid_cpf_format("12345678909"));
        assert!(!is_valid_cpf_format("123.456.789/09"));
        assert!(!is_valid_cpf_format("123.456.78-090"));
        assert!(!is_valid_cpf_format("abc.def.ghi-jk"));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            StatusAluno::Active,
            StatusAluno::Inactive,
            StatusAluno::Suspended,
            StatusAluno::Graduated,
        ] {
            assert_eq!(StatusAluno::from_str(&status.to_string()).unwrap(), status);
        }
        assert!(StatusAluno::from_str("ativo").is_err());
    }

    #[test]
    fn create_request_reports_first_violation() {
        let req = CreateAlunoRequest {
            matricula: "2025-1-0001".into(),
            nome: "João Silva".into(),
            cpf: "123.456.789-09".into(),
            email: "joao@exemplo.com".into(),
            data_nascimento: NaiveDate::from_ymd_opt(2000, 3, 14).unwrap(),
            telefone: None,
            status: None,
        };
        assert!(req.validate().is_ok());

        let bad = CreateAlunoRequest {
            cpf: "12345678909".into(),
            ..req
        };
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("CPF"));
    }
}
