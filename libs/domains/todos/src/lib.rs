//! Todos Domain
//!
//! CRUD over to-do records with typed list queries and a closed error
//! taxonomy.
//!
//! # Architecture
//!
//! ```text
//! query string ──► query::aggregate ──► QueryDescription
//!                                            │
//! ┌──────────────┐                    ┌──────▼──────┐
//! │   handlers   │ ─────────────────► │ Repository  │  ← validation, id checks, classification
//! └──────────────┘                    └──────┬──────┘
//!                                            │
//!                                     ┌──────▼──────┐
//!                                     │   Storage   │  ← PostgreSQL or in-memory
//!                                     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_todos::{PgTodoStorage, StoreTodoRepository, handlers};
//! use sea_orm::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::connect("postgres://...").await?;
//! let repository = StoreTodoRepository::new(PgTodoStorage::new(db));
//! let routes = axum::Router::new().nest("/todos", handlers::router(repository));
//! # Ok(())
//! # }
//! ```

pub mod entity;
pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod query;
pub mod repository;
pub mod storage;

pub use error::{ErrorKind, TodoError, TodoResult};
pub use handlers::ApiDoc;
pub use memory::InMemoryTodoStorage;
pub use models::{DEFAULT_STATUS, NewTodo, Todo, TodoInput};
pub use postgres::PgTodoStorage;
pub use query::{
    Filter, FilterField, FilterSpec, ListParams, Pagination, QueryDescription, SortField,
    MAX_ROWS, SortSpec, aggregate,
};
pub use repository::{StoreTodoRepository, TodoRepository};
pub use storage::TodoStorage;
