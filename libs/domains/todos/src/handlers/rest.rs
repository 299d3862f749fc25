use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use axum::extract::rejection::QueryRejection;
use axum_helpers::errors::responses::{
    BadRequestIdentifierResponse, BadRequestValidationResponse, ConflictResponse,
    InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::{AppError, IdPath, JsonBody};
use std::sync::Arc;
use tracing::instrument;

use crate::error::TodoResult;
use crate::models::{Todo, TodoInput};
use crate::query::{ListParams, QueryDescription};
use crate::repository::TodoRepository;

/// List todos with optional sort, status filter and pagination
///
/// A repeated query key keeps its first value.
#[utoipa::path(
    get,
    path = "",
    tag = "todos",
    params(ListParams),
    responses(
        (status = 200, description = "List of todos, possibly empty", body = Vec<Todo>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository))]
pub async fn list_todos<R: TodoRepository>(
    State(repository): State<Arc<R>>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<Todo>>, AppError> {
    let Query(pairs) = query?;
    let params = ListParams::from_pairs(pairs);
    let description = QueryDescription::from_params(&params)?;
    let todos = repository.list(description).await?;
    Ok(Json(todos))
}

/// Get a todo by id
#[utoipa::path(
    get,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo id")
    ),
    responses(
        (status = 200, description = "Todo found", body = Todo),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository))]
pub async fn get_todo<R: TodoRepository>(
    State(repository): State<Arc<R>>,
    IdPath(id): IdPath,
) -> TodoResult<Json<Todo>> {
    let todo = repository.get(id).await?;
    Ok(Json(todo))
}

/// Create a todo; status defaults to "TO DO"
#[utoipa::path(
    post,
    path = "",
    tag = "todos",
    request_body = TodoInput,
    responses(
        (status = 201, description = "Todo created", body = Todo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 409, response = ConflictResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository, input))]
pub async fn create_todo<R: TodoRepository>(
    State(repository): State<Arc<R>>,
    JsonBody(input): JsonBody<TodoInput>,
) -> TodoResult<impl IntoResponse> {
    let todo = repository.create(input).await?;
    tracing::info!(todo_id = todo.id, "Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Replace a todo's description and status
#[utoipa::path(
    put,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo id")
    ),
    request_body = TodoInput,
    responses(
        (status = 200, description = "Todo updated", body = Todo),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository, input))]
pub async fn update_todo<R: TodoRepository>(
    State(repository): State<Arc<R>>,
    IdPath(id): IdPath,
    JsonBody(input): JsonBody<TodoInput>,
) -> TodoResult<Json<Todo>> {
    let todo = repository.update(input, id).await?;
    tracing::info!(todo_id = id, "Updated todo");
    Ok(Json(todo))
}

/// Delete a todo
#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "todos",
    params(
        ("id" = i64, Path, description = "Todo id")
    ),
    responses(
        (status = 204, description = "Todo deleted"),
        (status = 400, response = BadRequestIdentifierResponse),
        (status = 404, response = NotFoundResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
#[instrument(skip(repository))]
pub async fn delete_todo<R: TodoRepository>(
    State(repository): State<Arc<R>>,
    IdPath(id): IdPath,
) -> TodoResult<StatusCode> {
    repository.delete(id).await?;
    tracing::info!(todo_id = id, "Deleted todo");
    Ok(StatusCode::NO_CONTENT)
}
