use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    error::ApiError,
    models::{
        auth::{Claims, RefreshClaims},
        profile::Profile,
        user::{AuthUser, LoginResponse, RefreshToken, Role},
    },
};

/// Session management against the auth schema. Runs on the elevated pool:
/// the auth subsystem is not an end-user session, and the application role
/// has no grants on auth.*.
pub struct AuthService;

impl AuthService {
    /// Create an auth subject. The provisioning trigger materializes the
    /// profile row in the same transaction; a duplicate email aborts the
    /// whole insert and surfaces as a conflict.
    pub async fn register(
        pool: &PgPool,
        email: &str,
        password: &str,
        nome: Option<&str>,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> Result<LoginResponse, ApiError> {
        let password_hash = bcrypt::hash(password, 12)?;

        let user: AuthUser = sqlx::query_as(
            "INSERT INTO auth.users (email, password_hash, display_name)
             VALUES ($1, $2, $3)
             RETURNING *",
        )
        .bind(email)
        .bind(password_hash)
        .bind(nome)
        .fetch_one(pool)
        .await?;

        Self::build_session(pool, user.id, jwt_secret, refresh_secret, access_ttl, refresh_ttl_days)
            .await
    }

    pub async fn login(
        pool: &PgPool,
        email: &str,
        password: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> Result<LoginResponse, ApiError> {
        let user: AuthUser = sqlx::query_as("SELECT * FROM auth.users WHERE email = $1")
            .bind(email)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| ApiError::Unauthorized("Credenciais inválidas".into()))?;

        let valid = bcrypt::verify(password, &user.password_hash)
            .map_err(|_| ApiError::Unauthorized("Credenciais inválidas".into()))?;
        if !valid {
            return Err(ApiError::Unauthorized("Credenciais inválidas".into()));
        }

        Self::build_session(pool, user.id, jwt_secret, refresh_secret, access_ttl, refresh_ttl_days)
            .await
    }

    /// Rotate refresh token: revoke old, issue new pair.
    pub async fn refresh(
        pool: &PgPool,
        refresh_token_str: &str,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> Result<LoginResponse, ApiError> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let key = DecodingKey::from_secret(refresh_secret.as_bytes());
        let data = decode::<RefreshClaims>(
            refresh_token_str,
            &key,
            &Validation::new(Algorithm::HS256),
        )
        .map_err(|_| ApiError::Unauthorized("Sessão expirada".into()))?;
        let rc = data.claims;
        let jti: Uuid = rc
            .jti
            .parse()
            .map_err(|_| ApiError::Unauthorized("Sessão expirada".into()))?;

        let stored: RefreshToken = sqlx::query_as(
            "SELECT * FROM auth.refresh_tokens WHERE id = $1 AND revoked = FALSE",
        )
        .bind(jti)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Sessão expirada".into()))?;

        if stored.expires_at < Utc::now() {
            return Err(ApiError::Unauthorized("Sessão expirada".into()));
        }
        if !bcrypt::verify(refresh_token_str, &stored.token_hash)? {
            return Err(ApiError::Unauthorized("Sessão expirada".into()));
        }

        sqlx::query("UPDATE auth.refresh_tokens SET revoked = TRUE WHERE id = $1")
            .bind(jti)
            .execute(pool)
            .await?;

        Self::build_session(
            pool,
            stored.user_id,
            jwt_secret,
            refresh_secret,
            access_ttl,
            refresh_ttl_days,
        )
        .await
    }

    /// Revoke the refresh token (logout). Best-effort: an already-invalid
    /// token still logs out cleanly.
    pub async fn logout(
        pool: &PgPool,
        refresh_token_str: &str,
        refresh_secret: &str,
    ) -> Result<(), ApiError> {
        use jsonwebtoken::{decode, DecodingKey, Validation};

        let key = DecodingKey::from_secret(refresh_secret.as_bytes());
        if let Ok(data) =
            decode::<RefreshClaims>(refresh_token_str, &key, &Validation::new(Algorithm::HS256))
        {
            if let Ok(jti) = data.claims.jti.parse::<Uuid>() {
                sqlx::query("UPDATE auth.refresh_tokens SET revoked = TRUE WHERE id = $1")
                    .bind(jti)
                    .execute(pool)
                    .await?;
            }
        }
        Ok(())
    }

    /// Load profile + roles for a subject and issue the token pair.
    async fn build_session(
        pool: &PgPool,
        user_id: Uuid,
        jwt_secret: &str,
        refresh_secret: &str,
        access_ttl: u64,
        refresh_ttl_days: u64,
    ) -> Result<LoginResponse, ApiError> {
        let profile: Profile = sqlx::query_as("SELECT * FROM profiles WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        let roles = Self::load_roles(pool, user_id).await?;

        let access_token = Self::generate_access_token(user_id, &roles, jwt_secret, access_ttl)?;
        let (refresh_token_str, refresh_id) =
            Self::generate_refresh_token(user_id, refresh_secret, refresh_ttl_days)?;

        let hash = bcrypt::hash(&refresh_token_str, 8)?;
        let expires_at = Utc::now() + chrono::Duration::days(refresh_ttl_days as i64);
        sqlx::query(
            "INSERT INTO auth.refresh_tokens (id, user_id, token_hash, expires_at)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(refresh_id)
        .bind(user_id)
        .bind(hash)
        .bind(expires_at)
        .execute(pool)
        .await?;

        Ok(LoginResponse {
            access_token,
            refresh_token: refresh_token_str,
            user: profile,
            roles,
        })
    }

    pub async fn load_roles(pool: &PgPool, user_id: Uuid) -> Result<Vec<Role>, ApiError> {
        let rows: Vec<String> =
            sqlx::query_scalar("SELECT role::TEXT FROM user_roles WHERE user_id = $1 ORDER BY role")
                .bind(user_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.iter().filter_map(|r| r.parse().ok()).collect())
    }

    pub fn generate_access_token(
        user_id: Uuid,
        roles: &[Role],
        secret: &str,
        ttl_seconds: u64,
    ) -> Result<String, ApiError> {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            roles: roles.to_vec(),
            iat: now,
            exp: now + ttl_seconds as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok(token)
    }

    fn generate_refresh_token(
        user_id: Uuid,
        secret: &str,
        ttl_days: u64,
    ) -> Result<(String, Uuid), ApiError> {
        let now = Utc::now().timestamp() as usize;
        let jti = Uuid::new_v4();
        let claims = RefreshClaims {
            sub: user_id.to_string(),
            jti: jti.to_string(),
            iat: now,
            exp: now + (ttl_days * 86400) as usize,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )?;
        Ok((token, jti))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::auth::decode_access_token;

    #[test]
    fn access_token_round_trips_subject_and_roles() {
        let user_id = Uuid::new_v4();
        let token =
            AuthService::generate_access_token(user_id, &[Role::Admin], "segredo-de-teste", 900)
                .unwrap();

        let decoded = decode_access_token(&token, "segredo-de-teste").unwrap();
        assert_eq!(decoded.user_id, user_id);
        assert_eq!(decoded.roles, vec![Role::Admin]);
        assert!(decoded.is_admin());
    }

    #[test]
    fn access_token_rejects_wrong_secret() {
        let token =
            AuthService::generate_access_token(Uuid::new_v4(), &[], "segredo-a", 900).unwrap();
        assert!(decode_access_token(&token, "segredo-b").is_err());
    }

    #[test]
    fn expired_access_token_is_rejected() {
        use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            sub: Uuid::new_v4().to_string(),
            roles: vec![Role::Reader],
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"segredo"),
        )
        .unwrap();

        assert!(decode_access_token(&token, "segredo").is_err());
    }

    #[test]
    fn token_without_admin_role_is_not_admin() {
        let token =
            AuthService::generate_access_token(Uuid::new_v4(), &[Role::Reader], "s", 900).unwrap();
        let decoded = decode_access_token(&token, "s").unwrap();
        assert!(!decoded.is_admin());
    }
}
