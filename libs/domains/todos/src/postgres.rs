use async_trait::async_trait;
use database::DatabaseResult;
use database::postgres::check_health;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect, Select,
};

use crate::entity;
use crate::models::{NewTodo, Todo};
use crate::query::{FilterField, QueryDescription, SortField};
use crate::storage::TodoStorage;

/// `updated_at` must move forward even when two writes land in the same clock tick
const BUMP_UPDATED_AT: &str =
    "GREATEST(CURRENT_TIMESTAMP, updated_at + INTERVAL '1 microsecond')";

/// PostgreSQL storage engine backed by a SeaORM connection pool
#[derive(Clone)]
pub struct PgTodoStorage {
    db: DatabaseConnection,
}

impl PgTodoStorage {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn sort_column(field: SortField) -> entity::Column {
    match field {
        SortField::Id => entity::Column::Id,
        SortField::Description => entity::Column::Description,
        SortField::Status => entity::Column::Status,
        SortField::CreatedAt => entity::Column::CreatedAt,
        SortField::UpdatedAt => entity::Column::UpdatedAt,
    }
}

fn filter_column(field: FilterField) -> entity::Column {
    match field {
        FilterField::Status => entity::Column::Status,
        FilterField::Description => entity::Column::Description,
    }
}

/// Build the single SELECT for a list call
pub(crate) fn build_select(query: &QueryDescription) -> Select<entity::Entity> {
    let mut select = entity::Entity::find();

    for filter in &query.filter {
        select = select.filter(filter_column(filter.field).eq(filter.value.as_str()));
    }

    match query.sort.field {
        Some(field) => {
            let order = if query.sort.descending {
                Order::Desc
            } else {
                Order::Asc
            };
            select = select.order_by(sort_column(field), order);
            if field != SortField::Id {
                select = select.order_by_asc(entity::Column::Id);
            }
        }
        None => select = select.order_by_asc(entity::Column::Id),
    }

    if let Some(page) = query.pagination {
        select = select.limit(page.limit).offset(page.offset);
    }

    select
}

#[async_trait]
impl TodoStorage for PgTodoStorage {
    async fn insert(&self, todo: NewTodo) -> DatabaseResult<Todo> {
        let active_model = entity::ActiveModel {
            id: NotSet,
            description: Set(todo.description),
            status: Set(todo.status),
            created_at: NotSet,
            updated_at: NotSet,
        };

        let model = active_model.insert(&self.db).await?;
        Ok(model.into())
    }

    async fn select_many(&self, query: &QueryDescription) -> DatabaseResult<Vec<Todo>> {
        let models = build_select(query).all(&self.db).await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn select_one(&self, id: i64) -> DatabaseResult<Option<Todo>> {
        let model = entity::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn replace(&self, id: i64, todo: &NewTodo) -> DatabaseResult<Option<Todo>> {
        let models = entity::Entity::update_many()
            .col_expr(entity::Column::Description, Expr::value(todo.description.clone()))
            .col_expr(entity::Column::Status, Expr::value(todo.status.clone()))
            .col_expr(entity::Column::UpdatedAt, Expr::cust(BUMP_UPDATED_AT))
            .filter(entity::Column::Id.eq(id))
            .exec_with_returning(&self.db)
            .await?;

        Ok(models.into_iter().next().map(Into::into))
    }

    async fn remove(&self, id: i64) -> DatabaseResult<u64> {
        let result = entity::Entity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected)
    }

    async fn ping(&self) -> DatabaseResult<()> {
        check_health(&self.db).await
    }
}
