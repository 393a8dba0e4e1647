use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Reader,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Reader => "reader",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Role {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "reader" => Ok(Role::Reader),
            _ => Err(anyhow::anyhow!("Unknown role: {s}")),
        }
    }
}

/// Auth subject row (auth.users).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub display_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub token_hash: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

/// Role-assignment row — role is fetched as TEXT to avoid the SQLx enum
/// OID mismatch on custom Postgres types.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RoleAssignment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

// Request/Response DTOs
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub nome: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: super::profile::Profile,
    pub roles: Vec<Role>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Deserialize)]
pub struct AssignRoleRequest {
    pub user_id: Uuid,
    pub role: Role,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), crate::error::ApiError> {
        if !is_valid_email(&self.email) {
            return Err(crate::error::ApiError::Validation("Email inválido".into()));
        }
        if self.password.len() < 8 {
            return Err(crate::error::ApiError::Validation(
                "Senha deve ter pelo menos 8 caracteres".into(),
            ));
        }
        Ok(())
    }
}

/// Minimal structural email check. The unique constraints are the real
/// gate; this only catches obviously malformed input before a round trip.
pub fn is_valid_email(s: &str) -> bool {
    let mut parts = s.splitn(2, '@');
    let local = parts.next().unwrap_or("");
    let domain = parts.next().unwrap_or("");
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn role_round_trips_through_strings() {
        for role in [Role::Admin, Role::Reader] {
            assert_eq!(Role::from_str(&role.to_string()).unwrap(), role);
        }
        assert!(Role::from_str("root").is_err());
    }

    #[test]
    fn email_check_accepts_plausible_addresses() {
        assert!(is_valid_email("maria@exemplo.com.br"));
        assert!(is_valid_email("a@b.c"));
    }

    #[test]
    fn email_check_rejects_malformed_addresses() {
        assert!(!is_valid_email("sem-arroba"));
        assert!(!is_valid_email("@dominio.com"));
        assert!(!is_valid_email("user@semponto"));
        assert!(!is_valid_email("user@.com"));
    }

    #[test]
    fn register_requires_minimum_password() {
        let req = RegisterRequest {
            email: "maria@exemplo.com".into(),
            password: "curta".into(),
            nome: None,
        };
        assert!(req.validate().is_err());
    }
}
