use async_trait::async_trait;
use database::DatabaseResult;

use crate::models::{NewTodo, Todo};
use crate::query::QueryDescription;

/// Storage capability for todo records
///
/// Engines report raw failures as [`database::DatabaseError`]; classification
/// happens in the repository. Every method is a single round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoStorage: Send + Sync {
    /// Insert a record and return it with its assigned id and timestamps
    async fn insert(&self, todo: NewTodo) -> DatabaseResult<Todo>;

    /// Filters, then sort, then pagination
    async fn select_many(&self, query: &QueryDescription) -> DatabaseResult<Vec<Todo>>;

    async fn select_one(&self, id: i64) -> DatabaseResult<Option<Todo>>;

    /// Replace description and status, bumping `updated_at`.
    /// Returns `None` when no row has this id.
    async fn replace(&self, id: i64, todo: &NewTodo) -> DatabaseResult<Option<Todo>>;

    /// Returns the number of rows removed
    async fn remove(&self, id: i64) -> DatabaseResult<u64>;

    /// Cheap liveness probe used by readiness checks
    async fn ping(&self) -> DatabaseResult<()>;
}
