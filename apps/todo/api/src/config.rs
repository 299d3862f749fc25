use core_config::{FromEnv, env_parse, server::ServerConfig};
use database::postgres::PostgresConfig;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where todo records live
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

/// Application configuration, composed from the shared config pieces
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub storage: StorageBackend,
    /// Present only for the Postgres backend
    pub database: Option<PostgresConfig>,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let server = ServerConfig::from_env()?; // HOST=0.0.0.0, PORT=8080
        let storage = env_parse("STORAGE_BACKEND", StorageBackend::default())?;
        let database = match storage {
            StorageBackend::Postgres => Some(PostgresConfig::from_env()?), // DATABASE_URL required
            StorageBackend::Memory => None,
        };
        let run_migrations = env_parse("RUN_MIGRATIONS", true)?;

        Ok(Self {
            environment,
            server,
            storage,
            database,
            run_migrations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_backend_needs_no_database_url() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("memory")),
                ("DATABASE_URL", None),
                ("PORT", Some("9090")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::Memory);
                assert!(config.database.is_none());
                assert_eq!(config.server.port, 9090);
                assert!(config.run_migrations);
            },
        );
    }

    #[test]
    fn test_postgres_is_the_default_backend() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None),
                ("DATABASE_URL", Some("postgresql://localhost/todos")),
                ("RUN_MIGRATIONS", Some("false")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::Postgres);
                assert_eq!(
                    config.database.as_ref().map(PostgresConfig::url),
                    Some("postgresql://localhost/todos")
                );
                assert!(!config.run_migrations);
            },
        );
    }

    #[test]
    fn test_postgres_without_url_fails() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", Some("Postgres")), ("DATABASE_URL", None)],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("DATABASE_URL"));
            },
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        temp_env::with_var("STORAGE_BACKEND", Some("sqlite"), || {
            let err = Config::from_env().unwrap_err();
            assert!(err.to_string().contains("STORAGE_BACKEND"));
        });
    }
}
