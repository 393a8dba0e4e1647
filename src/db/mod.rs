use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run the migrations embedded in ./migrations/
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

/// Begin a transaction scoped to an authenticated caller.
///
/// Pins the caller identity into the request-local `app.user_id` GUC and
/// switches to the non-owner `secretaria_app` role, so every statement in
/// the transaction is subject to the row-level policies. Both settings are
/// `LOCAL` and vanish when the transaction ends.
pub async fn begin_scoped(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user_id.to_string())
        .execute(&mut *tx)
        .await?;
    sqlx::query("SET LOCAL ROLE secretaria_app")
        .execute(&mut *tx)
        .await?;
    Ok(tx)
}
