//! Bootstrap the first admin account.
//!
//! Role assignments are admin-gated by the row-level policies, so the very
//! first admin must be granted through the elevated connection. Creates the
//! auth subject if needed (the provisioning trigger fills in the profile)
//! and grants the admin role idempotently.
//!
//! Usage:
//!   DATABASE_URL=... seed-admin --email direcao@escola.edu.br [--nome "Direção"] [--password ...]

use anyhow::{Context, Result};
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

#[derive(Parser)]
#[command(about = "Cria o primeiro usuário administrador")]
struct Args {
    #[arg(long)]
    email: String,

    #[arg(long, default_value = "Administração")]
    nome: String,

    /// Generated when omitted (printed once).
    #[arg(long)]
    password: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL required")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    let password = args.password.unwrap_or_else(generate_password);
    let password_hash = bcrypt::hash(&password, 12)?;

    let existing: Option<Uuid> = sqlx::query_scalar("SELECT id FROM auth.users WHERE email = $1")
        .bind(&args.email)
        .fetch_optional(&pool)
        .await?;

    let user_id = match existing {
        Some(id) => {
            println!("Usuário {} já existe", args.email);
            id
        }
        None => {
            let id: Uuid = sqlx::query_scalar(
                "INSERT INTO auth.users (email, password_hash, display_name)
                 VALUES ($1, $2, $3)
                 RETURNING id",
            )
            .bind(&args.email)
            .bind(&password_hash)
            .bind(&args.nome)
            .fetch_one(&pool)
            .await?;
            println!("Usuário {} criado — senha: {password}", args.email);
            id
        }
    };

    sqlx::query(
        "INSERT INTO user_roles (user_id, role)
         VALUES ($1, 'admin')
         ON CONFLICT (user_id, role) DO NOTHING",
    )
    .bind(user_id)
    .execute(&pool)
    .await?;

    println!("Papel admin garantido para {}", args.email);
    Ok(())
}

fn generate_password() -> String {
    use rand::Rng;
    rand::thread_rng()
        .sample_iter(&rand::distributions::Alphanumeric)
        .take(16)
        .map(char::from)
        .collect()
}
