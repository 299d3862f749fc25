use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use database::DatabaseResult;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use crate::models::{NewTodo, Todo};
use crate::query::{FilterField, QueryDescription, SortField};
use crate::storage::TodoStorage;

#[derive(Debug, Default)]
struct Table {
    next_id: i64,
    rows: BTreeMap<i64, Todo>,
}

/// In-process storage engine, used for tests and database-less local runs
#[derive(Debug, Default)]
pub struct InMemoryTodoStorage {
    table: RwLock<Table>,
}

impl InMemoryTodoStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn field_value(todo: &Todo, field: FilterField) -> &str {
    match field {
        FilterField::Status => &todo.status,
        FilterField::Description => &todo.description,
    }
}

fn compare(a: &Todo, b: &Todo, field: SortField) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Description => a.description.cmp(&b.description),
        SortField::Status => a.status.cmp(&b.status),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

// Same rule as the database: never move backwards, always move forwards
fn bump(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

#[async_trait]
impl TodoStorage for InMemoryTodoStorage {
    async fn insert(&self, todo: NewTodo) -> DatabaseResult<Todo> {
        let mut table = self.table.write().await;
        table.next_id += 1;
        let now = Utc::now();
        let record = Todo {
            id: table.next_id,
            description: todo.description,
            status: todo.status,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(record.id, record.clone());
        Ok(record)
    }

    async fn select_many(&self, query: &QueryDescription) -> DatabaseResult<Vec<Todo>> {
        let table = self.table.read().await;

        // BTreeMap iteration is already id ascending
        let mut todos: Vec<Todo> = table
            .rows
            .values()
            .filter(|todo| {
                query
                    .filter
                    .iter()
                    .all(|f| field_value(todo, f.field) == f.value)
            })
            .cloned()
            .collect();

        if let Some(field) = query.sort.field {
            todos.sort_by(|a, b| {
                let ord = compare(a, b, field);
                let ord = if query.sort.descending {
                    ord.reverse()
                } else {
                    ord
                };
                ord.then_with(|| a.id.cmp(&b.id))
            });
        }

        if let Some(page) = query.pagination {
            let offset = usize::try_from(page.offset).unwrap_or(usize::MAX);
            let limit = usize::try_from(page.limit).unwrap_or(usize::MAX);
            todos = todos.into_iter().skip(offset).take(limit).collect();
        }

        Ok(todos)
    }

    async fn select_one(&self, id: i64) -> DatabaseResult<Option<Todo>> {
        Ok(self.table.read().await.rows.get(&id).cloned())
    }

    async fn replace(&self, id: i64, todo: &NewTodo) -> DatabaseResult<Option<Todo>> {
        let mut table = self.table.write().await;
        let Some(record) = table.rows.get_mut(&id) else {
            return Ok(None);
        };
        record.description = todo.description.clone();
        record.status = todo.status.clone();
        record.updated_at = bump(record.updated_at);
        Ok(Some(record.clone()))
    }

    async fn remove(&self, id: i64) -> DatabaseResult<u64> {
        let removed = self.table.write().await.rows.remove(&id);
        Ok(u64::from(removed.is_some()))
    }

    async fn ping(&self) -> DatabaseResult<()> {
        Ok(())
    }
}
