use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tracing::info;

use super::PostgresConfig;
use crate::common::{DatabaseError, DatabaseResult, RetryPolicy, retry_with_policy};

/// Connect once using a PostgresConfig
pub async fn connect(config: PostgresConfig) -> DatabaseResult<DatabaseConnection> {
    let db = Database::connect(config.into_connect_options()).await?;
    info!("Successfully connected to PostgreSQL database");
    Ok(db)
}

/// Connect with exponential backoff.
///
/// Intended for process startup, where the database may still be coming up.
/// Returns [`DatabaseError::ConnectionFailed`] once the policy is exhausted.
///
/// # Example
/// ```ignore
/// use database::common::RetryPolicy;
/// use database::postgres::{PostgresConfig, connect_with_retry};
///
/// let config = PostgresConfig::from_env()?;
/// let db = connect_with_retry(config, RetryPolicy::new().with_max_retries(5)).await?;
/// ```
pub async fn connect_with_retry(
    config: PostgresConfig,
    policy: RetryPolicy,
) -> DatabaseResult<DatabaseConnection> {
    retry_with_policy(|| connect(config.clone()), &policy)
        .await
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))
}

/// Run migrations using the provided Migrator
///
/// `app_name` is only used for logging.
pub async fn run_migrations<M: MigratorTrait>(
    db: &DatabaseConnection,
    app_name: &str,
) -> DatabaseResult<()> {
    info!("Running {} database migrations...", app_name);
    M::up(db, None)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;
    info!("Migrations completed successfully for {}", app_name);
    Ok(())
}
