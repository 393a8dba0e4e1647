use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    db,
    error::ApiError,
    models::{
        auth::AuthenticatedUser,
        user::{AssignRoleRequest, RoleAssignment},
    },
};

pub struct RoleService;

impl RoleService {
    /// Admins see every assignment; other callers see their own rows only
    /// (select policy).
    pub async fn list(
        pool: &PgPool,
        user: &AuthenticatedUser,
    ) -> Result<Vec<RoleAssignment>, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let assignments = sqlx::query_as::<_, RoleAssignment>(
            "SELECT id, user_id, role::TEXT as role, created_at
             FROM user_roles
             ORDER BY created_at",
        )
        .fetch_all(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(assignments)
    }

    pub async fn assign(
        pool: &PgPool,
        user: &AuthenticatedUser,
        req: &AssignRoleRequest,
    ) -> Result<RoleAssignment, ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let assignment = sqlx::query_as::<_, RoleAssignment>(
            "INSERT INTO user_roles (user_id, role)
             VALUES ($1, $2::app_role)
             RETURNING id, user_id, role::TEXT as role, created_at",
        )
        .bind(req.user_id)
        .bind(req.role.to_string())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(assignment)
    }

    pub async fn revoke(
        pool: &PgPool,
        user: &AuthenticatedUser,
        id: Uuid,
    ) -> Result<(), ApiError> {
        let mut tx = db::begin_scoped(pool, user.user_id).await?;
        let result = sqlx::query("DELETE FROM user_roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound("Atribuição de papel não encontrada".into()));
        }
        Ok(())
    }
}
