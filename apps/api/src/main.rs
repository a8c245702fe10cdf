//! Taskdesk API - task tracking REST server

use std::sync::Arc;

use axum::Router;
use axum_helpers::server::{create_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_tasks::{handlers, PgTaskRepository, TaskService, TasksApiDoc};
use tracing::info;

mod config;
mod readiness;

use config::Config;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    info!("Connecting to PostgreSQL");
    let db =
        database::postgres::connect_from_config_with_retry(config.database.clone(), None).await?;

    if config.reset_database {
        database::postgres::reset_schema::<migration::Migrator>(&db, config.app.name).await?;
    } else {
        database::postgres::run_migrations::<migration::Migrator>(&db, config.app.name).await?;
    }

    let service = Arc::new(TaskService::new(PgTaskRepository::new(db.clone())));
    let api_routes = Router::new().nest("/tasks", handlers::router(service));

    let router = axum_helpers::create_router::<TasksApiDoc>(api_routes).await?;
    let app = router
        .merge(health_router(config.app.clone()))
        .merge(readiness::router(db));

    info!(
        "Starting {} v{} on port {}",
        config.app.name, config.app.version, config.server.port
    );
    create_app(app, &config.server).await?;

    info!("{} shutdown complete", config.app.name);
    Ok(())
}
