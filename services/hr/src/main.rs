use anyhow::Result;
use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

mod actor;
mod attendance;
mod error;
mod export;
mod leave;
mod middleware;
mod models;
mod notifier;
mod policy;
mod repositories;
mod routes;
mod state;

use common::database::{DatabaseConfig, init_pool, run_migrations};
use std::env;

use crate::{
    notifier::Notifier,
    repositories::{
        AttendanceRepository, DepartmentRepository, EmployeeRepository, LeaveRepository,
        RecordsRepository,
    },
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting HR service");

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

    info!("HR service initialized successfully");

    // Initialize repositories
    let employee_repository = EmployeeRepository::new(pool.clone());
    let department_repository = DepartmentRepository::new(pool.clone());
    let leave_repository = LeaveRepository::new(pool.clone());
    let attendance_repository = AttendanceRepository::new(pool.clone());
    let records_repository = RecordsRepository::new(pool.clone());
    let notifier = Notifier::from_env();

    let app_state = AppState {
        db_pool: pool,
        employee_repository,
        department_repository,
        leave_repository,
        attendance_repository,
        records_repository,
        notifier,
    };

    // Start the web server
    let app = routes::create_router(app_state);

    let bind_addr = env::var("HR_BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3001".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HR service listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
