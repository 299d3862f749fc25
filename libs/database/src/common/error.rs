/// Raw storage failure.
///
/// Storage engines return this unclassified; callers above the persistence
/// boundary decide what kind of failure it represents.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    /// PostgreSQL-specific errors (SeaORM)
    #[cfg(feature = "postgres")]
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sea_orm::DbErr),

    /// Connection failed after retries
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Health check failed
    #[error("Health check failed: {0}")]
    HealthCheckFailed(String),

    /// Migration error
    #[error("Migration error: {0}")]
    MigrationError(String),

    /// Generic storage error
    #[error("Database error: {0}")]
    Generic(String),
}

/// Result type alias for storage operations
pub type DatabaseResult<T> = Result<T, DatabaseError>;
