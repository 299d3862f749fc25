use async_trait::async_trait;
use std::sync::Arc;
use validator::Validate;

use crate::error::{TodoError, TodoResult};
use crate::models::{NewTodo, Todo, TodoInput};
use crate::query::QueryDescription;
use crate::storage::TodoStorage;

/// Repository trait for todo persistence
///
/// Every method performs at most one storage call and returns a classified
/// [`TodoError`] on failure.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoRepository: Send + Sync {
    /// Create a todo; a missing status defaults to "TO DO"
    async fn create(&self, input: TodoInput) -> TodoResult<Todo>;

    /// List todos; an empty result is not an error
    async fn list(&self, query: QueryDescription) -> TodoResult<Vec<Todo>>;

    async fn get(&self, id: i64) -> TodoResult<Todo>;

    /// Replace description and status of todo `id`. Any id in `input` is ignored.
    async fn update(&self, input: TodoInput, id: i64) -> TodoResult<Todo>;

    async fn delete(&self, id: i64) -> TodoResult<()>;

    /// Storage readiness
    async fn ping(&self) -> TodoResult<()>;
}

/// Repository over any [`TodoStorage`] engine
pub struct StoreTodoRepository<S: TodoStorage> {
    storage: Arc<S>,
}

impl<S: TodoStorage> Clone for StoreTodoRepository<S> {
    fn clone(&self) -> Self {
        Self {
            storage: Arc::clone(&self.storage),
        }
    }
}

impl<S: TodoStorage> StoreTodoRepository<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage: Arc::new(storage),
        }
    }
}

fn check_id(id: i64) -> TodoResult<()> {
    if id <= 0 {
        return Err(TodoError::invalid_id(id));
    }
    Ok(())
}

fn prepare(input: TodoInput) -> TodoResult<NewTodo> {
    input.validate()?;
    Ok(input.into())
}

#[async_trait]
impl<S: TodoStorage + 'static> TodoRepository for StoreTodoRepository<S> {
    async fn create(&self, input: TodoInput) -> TodoResult<Todo> {
        let todo = prepare(input)?;
        self.storage
            .insert(todo)
            .await
            .map_err(|e| TodoError::classify("Failed creating todo", e))
    }

    async fn list(&self, query: QueryDescription) -> TodoResult<Vec<Todo>> {
        self.storage
            .select_many(&query)
            .await
            .map_err(|e| TodoError::classify("Failed listing todos", e))
    }

    async fn get(&self, id: i64) -> TodoResult<Todo> {
        check_id(id)?;
        self.storage
            .select_one(id)
            .await
            .map_err(|e| TodoError::classify(format!("Failed getting todo {}", id), e))?
            .ok_or_else(|| TodoError::not_found(id))
    }

    async fn update(&self, input: TodoInput, id: i64) -> TodoResult<Todo> {
        check_id(id)?;
        let todo = prepare(input)?;
        self.storage
            .replace(id, &todo)
            .await
            .map_err(|e| TodoError::classify(format!("Failed updating todo {}", id), e))?
            .ok_or_else(|| TodoError::not_found(id))
    }

    async fn delete(&self, id: i64) -> TodoResult<()> {
        check_id(id)?;
        let removed = self
            .storage
            .remove(id)
            .await
            .map_err(|e| TodoError::classify(format!("Failed deleting todo {}", id), e))?;

        if removed == 0 {
            return Err(TodoError::not_found(id));
        }
        Ok(())
    }

    async fn ping(&self) -> TodoResult<()> {
        self.storage
            .ping()
            .await
            .map_err(|e| TodoError::classify("Storage is not ready", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::DEFAULT_STATUS;
    use crate::storage::MockTodoStorage;
    use chrono::Utc;
    use database::DatabaseError;
    use mockall::predicate::eq;
    use sea_orm::DbErr;

    fn stored(id: i64, description: &str, status: &str) -> Todo {
        let now = Utc::now();
        Todo {
            id,
            description: description.to_string(),
            status: status.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_create_applies_default_status() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_insert()
            .withf(|todo| todo.status == DEFAULT_STATUS && todo.description == "buy milk")
            .times(1)
            .returning(|todo| Ok(stored(1, &todo.description, &todo.status)));

        let repo = StoreTodoRepository::new(storage);
        let todo = repo.create(TodoInput::new("buy milk")).await.unwrap();
        assert_eq!(todo.id, 1);
        assert_eq!(todo.status, DEFAULT_STATUS);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_input_without_storage_call() {
        let mut storage = MockTodoStorage::new();
        storage.expect_insert().never();

        let repo = StoreTodoRepository::new(storage);
        let err = repo.create(TodoInput::new("")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_get_non_positive_id_is_validation_before_storage() {
        let mut storage = MockTodoStorage::new();
        storage.expect_select_one().never();

        let repo = StoreTodoRepository::new(storage);
        for id in [0, -1] {
            let err = repo.get(id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Validation);
        }
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_select_one()
            .with(eq(42))
            .times(1)
            .returning(|_| Ok(None));

        let repo = StoreTodoRepository::new(storage);
        let err = repo.get(42).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Todo 42 not found");
    }

    #[tokio::test]
    async fn test_list_empty_is_ok() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_select_many()
            .times(1)
            .returning(|_| Ok(vec![]));

        let repo = StoreTodoRepository::new(storage);
        let todos = repo.list(QueryDescription::default()).await.unwrap();
        assert!(todos.is_empty());
    }

    #[tokio::test]
    async fn test_list_classifies_connection_failure() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_select_many()
            .returning(|_| Err(DatabaseError::Postgres(DbErr::Conn(
                sea_orm::RuntimeErr::Internal("connection refused".to_string()),
            ))));

        let repo = StoreTodoRepository::new(storage);
        let err = repo.list(QueryDescription::default()).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
        assert!(err.cause().is_some());
    }

    #[tokio::test]
    async fn test_update_path_id_wins_over_body_id() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_replace()
            .withf(|id, todo| *id == 5 && todo.status == "DONE")
            .times(1)
            .returning(|id, todo| Ok(Some(stored(id, &todo.description, &todo.status))));

        let repo = StoreTodoRepository::new(storage);
        let input = TodoInput {
            id: Some(99),
            ..TodoInput::new("walk dog").with_status("DONE")
        };
        let todo = repo.update(input, 5).await.unwrap();
        assert_eq!(todo.id, 5);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut storage = MockTodoStorage::new();
        storage.expect_replace().returning(|_, _| Ok(None));

        let repo = StoreTodoRepository::new(storage);
        let err = repo.update(TodoInput::new("x"), 8).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let mut storage = MockTodoStorage::new();
        storage
            .expect_remove()
            .with(eq(3))
            .times(1)
            .returning(|_| Ok(0));

        let repo = StoreTodoRepository::new(storage);
        let err = repo.delete(3).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_delete_existing() {
        let mut storage = MockTodoStorage::new();
        storage.expect_remove().returning(|_| Ok(1));

        let repo = StoreTodoRepository::new(storage);
        assert!(repo.delete(3).await.is_ok());
    }

    #[tokio::test]
    async fn test_ping_failure_is_unavailable() {
        let mut storage = MockTodoStorage::new();
        storage.expect_ping().returning(|| {
            Err(DatabaseError::HealthCheckFailed("timeout".to_string()))
        });

        let repo = StoreTodoRepository::new(storage);
        let err = repo.ping().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unavailable);
    }
}
