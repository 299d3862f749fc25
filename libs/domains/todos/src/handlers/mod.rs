mod rest;

use axum::{Router, routing::get, routing::post};
use axum_helpers::errors::responses::{
    BadRequestIdentifierResponse, BadRequestValidationResponse, ConflictResponse,
    InternalServerErrorResponse, NotFoundResponse,
};
use axum_helpers::{AppError, ErrorResponse};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::{ErrorKind, TodoError};
use crate::models::{Todo, TodoInput};
use crate::repository::TodoRepository;

/// OpenAPI documentation for the Todos API
#[derive(OpenApi)]
#[openapi(
    paths(
        rest::list_todos,
        rest::get_todo,
        rest::create_todo,
        rest::update_todo,
        rest::delete_todo,
    ),
    components(
        schemas(Todo, TodoInput, ErrorResponse),
        responses(
            BadRequestIdentifierResponse,
            BadRequestValidationResponse,
            ConflictResponse,
            InternalServerErrorResponse,
            NotFoundResponse,
        )
    ),
    tags(
        (name = "todos", description = "To-do record operations")
    )
)]
pub struct ApiDoc;

/// Router for `/todos`, to be nested by the app
///
/// `POST /add` is kept as an alias of `POST /`.
pub fn router<R: TodoRepository + 'static>(repository: R) -> Router {
    let shared = Arc::new(repository);

    Router::new()
        .route("/", get(rest::list_todos::<R>).post(rest::create_todo::<R>))
        .route("/add", post(rest::create_todo::<R>))
        .route(
            "/{id}",
            get(rest::get_todo::<R>)
                .put(rest::update_todo::<R>)
                .delete(rest::delete_todo::<R>),
        )
        .with_state(shared)
}

/// Render a classified error; server-side kinds log their cause
impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        let message = err.message().to_string();
        match err.kind() {
            ErrorKind::NotFound => AppError::NotFound(message),
            ErrorKind::Validation => AppError::BadRequest(message),
            ErrorKind::Conflict => {
                tracing::warn!(cause = ?err.cause(), "{}", message);
                AppError::Conflict(message)
            }
            ErrorKind::Unavailable | ErrorKind::Unknown => {
                tracing::error!(kind = %err.kind(), cause = ?err.cause(), "{}", message);
                AppError::InternalServerError(message)
            }
        }
    }
}

impl axum::response::IntoResponse for TodoError {
    fn into_response(self) -> axum::response::Response {
        AppError::from(self).into_response()
    }
}
