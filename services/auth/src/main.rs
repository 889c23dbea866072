use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod jwt;
mod middleware;
mod models;
mod repositories;
mod routes;
mod validation;

use sqlx::PgPool;
use std::env;

use common::database::{DatabaseConfig, init_pool, run_migrations};

use crate::{
    jwt::JwtService,
    repositories::{AccountRepository, SessionRepository},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_service: JwtService,
    pub account_repository: AccountRepository,
    pub session_repository: SessionRepository,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting authentication service");

    // Initialize database connection pool
    let db_config = DatabaseConfig::from_env()?;
    let pool = init_pool(&db_config).await?;

    // Check database connectivity
    if common::database::health_check(&pool).await? {
        info!("Database connection successful");
    } else {
        anyhow::bail!("Failed to connect to database");
    }

    run_migrations(&pool).await?;

    info!("Authentication service initialized successfully");

    // Initialize JWT service
    let jwt_config = jwt::JwtConfig::from_env()?;
    let jwt_service = jwt::JwtService::new(jwt_config)?;

    let account_repository = AccountRepository::new(pool.clone());
    let session_repository = SessionRepository::new(pool.clone());

    let app_state = AppState {
        db_pool: pool,
        jwt_service,
        account_repository,
        session_repository,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = env::var("AUTH_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Authentication service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
