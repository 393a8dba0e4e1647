use sqlx::PgPool;

use crate::{
    db,
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        profile::{Profile, UpdateProfileRequest},
    },
};

pub struct ProfileService;

impl ProfileService {
    /// The select policy decides visibility: admins see every profile,
    /// everyone else sees exactly their own row.
    pub async fn list(pool: &PgPool, user: &AuthenticatedUser) -> Result<Vec<Profile>, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let profiles = sqlx::query_as::<_, Profile>("SELECT * FROM profiles ORDER BY nome")
            .fetch_all(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(profiles)
    }

    pub async fn me(pool: &PgPool, user: &AuthenticatedUser) -> Result<Profile, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let profile = sqlx::query_as::<_, Profile>("SELECT * FROM profiles WHERE id = $1")
            .bind(user.user_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| ApiError::NotFound("Perfil não encontrado".into()))?;
        tx.commit().await?;
        Ok(profile)
    }

    pub async fn update_me(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &UpdateProfileRequest,
    ) -> Result<Profile, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let profile = sqlx::query_as::<_, Profile>(
            "UPDATE profiles
             SET nome  = COALESCE($1, nome),
                 email = COALESCE($2, email)
             WHERE id = $3
             RETURNING *",
        )
        .bind(&req.nome)
        .bind(&req.email)
        .bind(user.user_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| ApiError::NotFound("Perfil não encontrado".into()))?;
        tx.commit().await?;
        Ok(profile)
    }
}
