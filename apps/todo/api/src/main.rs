use axum_helpers::server::create_production_app;
use core_config::tracing::{init_tracing, install_color_eyre};
use database::common::RetryPolicy;
use database::postgres::{connect_with_retry, run_migrations};
use domain_todos::{InMemoryTodoStorage, PgTodoStorage, StoreTodoRepository};
use eyre::eyre;
use tracing::info;

mod api;
mod config;
mod openapi;

use config::{Config, StorageBackend};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before any fallible operation
    install_color_eyre();

    let config = Config::from_env()?;

    init_tracing(&config.environment);

    match config.storage {
        StorageBackend::Postgres => serve_postgres(config).await?,
        StorageBackend::Memory => serve_memory(config).await?,
    }

    info!("Todo API shutdown complete");
    Ok(())
}

async fn serve_postgres(config: Config) -> eyre::Result<()> {
    let database = config
        .database
        .clone()
        .ok_or_else(|| eyre!("DATABASE_URL is required for the postgres backend"))?;

    let policy = RetryPolicy::new().with_max_retries(5).with_initial_delay(500);
    let db = connect_with_retry(database, policy)
        .await
        .map_err(|e| eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        run_migrations::<migration::Migrator>(&db, "todo-api").await?;
    }

    let repository = StoreTodoRepository::new(PgTodoStorage::new(db.clone()));
    let app = api::app(repository, config.server.request_timeout);

    info!(
        "Starting todo API on postgres (shutdown timeout {:?})",
        config.server.shutdown_timeout
    );
    create_production_app(app, &config.server, async move {
        info!("Shutting down: closing database connections");
        match db.close().await {
            Ok(()) => info!("PostgreSQL connection closed successfully"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .map_err(|e| eyre!("Server error: {}", e))
}

async fn serve_memory(config: Config) -> eyre::Result<()> {
    let repository = StoreTodoRepository::new(InMemoryTodoStorage::new());
    let app = api::app(repository, config.server.request_timeout);

    info!("Starting todo API on in-memory storage; records are lost on exit");
    create_production_app(app, &config.server, async {})
        .await
        .map_err(|e| eyre!("Server error: {}", e))
}
