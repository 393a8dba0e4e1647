use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::error::ApiError;

/// Identity record, keyed by the auth subject id. Created only by the
/// provisioning trigger; removed only by cascade from subject deletion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub nome: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub nome: Option<String>,
    pub email: Option<String>,
}

impl UpdateProfileRequest {
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(nome) = &self.nome {
            if nome.trim().is_empty() {
                return Err(ApiError::Validation("Nome não pode ficar em branco".into()));
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
