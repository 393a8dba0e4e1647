use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use secretaria_api::{config::Config, db, middleware::auth::JwtSecret, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Arc::new(Config::from_env()?);

    let pool = db::create_pool(&config.database_url).await?;
    db::run_migrations(&pool).await?;
    info!("Database connected and migrations applied");

    let state = AppState {
        db: pool,
        config: config.clone(),
    };

    // CORS: exact frontend origin when configured, otherwise any (dev).
    let cors_origin = match &config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.parse::<HeaderValue>()?),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::ACCEPT,
        ]))
        .allow_origin(cors_origin);

    let jwt_secret = JwtSecret(config.jwt_secret.clone());

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Auth
        .route("/auth/register", post(routes::auth::register))
        .route("/auth/login", post(routes::auth::login))
        .route("/auth/refresh", post(routes::auth::refresh_token))
        .route("/auth/logout", post(routes::auth::logout))
        .route("/auth/me", get(routes::auth::me))
        // Profiles
        .route("/profiles", get(routes::profiles::list_profiles))
        .route(
            "/profiles/me",
            get(routes::profiles::get_my_profile).put(routes::profiles::update_my_profile),
        )
        // Cursos
        .route(
            "/cursos",
            get(routes::cursos::list_cursos).post(routes::cursos::create_curso),
        )
        .route(
            "/cursos/{id}",
            put(routes::cursos::update_curso).delete(routes::cursos::delete_curso),
        )
        // Alunos
        .route(
            "/alunos",
            get(routes::alunos::list_alunos).post(routes::alunos::create_aluno),
        )
        .route(
            "/alunos/{id}",
            put(routes::alunos::update_aluno).delete(routes::alunos::delete_aluno),
        )
        // Matrículas
        .route(
            "/matriculas",
            get(routes::matriculas::list_matriculas).post(routes::matriculas::create_matricula),
        )
        .route(
            "/matriculas/{id}",
            put(routes::matriculas::update_matricula)
                .delete(routes::matriculas::delete_matricula),
        )
        // Papéis
        .route(
            "/roles",
            get(routes::roles::list_roles).post(routes::roles::assign_role),
        )
        .route("/roles/{id}", delete(routes::roles::revoke_role))
        .layer(axum::Extension(jwt_secret))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", config.host, config.port);
    info!("secretaria API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
