use axum::Router;
use axum_helpers::server::{HealthCheckFuture, create_router, health_router, ready_router};
use domain_todos::{TodoRepository, handlers};
use std::time::Duration;

use crate::openapi::ApiDoc;

const APP_NAME: &str = "todo-api";

/// Routes without the `/api` prefix; `create_router` adds it.
pub fn routes<R>(repository: R) -> Router
where
    R: TodoRepository + 'static,
{
    Router::new().nest("/todos", handlers::router(repository))
}

/// The full application: API, docs, `/health` and a `/ready` that pings storage.
pub fn app<R>(repository: R, request_timeout: Duration) -> Router
where
    R: TodoRepository + Clone + 'static,
{
    let probe = repository.clone();
    let ready = ready_router("storage", move || -> HealthCheckFuture<'static> {
        let probe = probe.clone();
        Box::pin(async move { probe.ping().await.map_err(|e| e.to_string()) })
    });

    create_router::<ApiDoc>(routes(repository), request_timeout)
        .merge(health_router(APP_NAME, env!("CARGO_PKG_VERSION")))
        .merge(ready)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use domain_todos::{
        ErrorKind, InMemoryTodoStorage, QueryDescription, StoreTodoRepository, Todo, TodoError,
        TodoInput, TodoResult,
    };
    use http_body_util::BodyExt;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn memory_app() -> Router {
        app(
            StoreTodoRepository::new(InMemoryTodoStorage::new()),
            Duration::from_secs(5),
        )
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_todos_are_served_under_api_prefix() {
        let app = memory_app();

        let create = Request::builder()
            .method("POST")
            .uri("/api/todos")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"description": "water plants"}).to_string()))
            .unwrap();
        let (status, created) = send(app.clone(), create).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["status"], "TO DO");

        let (status, list) = send(app, get("/api/todos")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list.as_array().map(Vec::len), Some(1));
    }

    #[tokio::test]
    async fn test_health_reports_name_and_version() {
        let (status, body) = send(memory_app(), get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["name"], APP_NAME);
    }

    #[tokio::test]
    async fn test_ready_with_memory_storage() {
        let (status, body) = send(memory_app(), get("/ready")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
        assert_eq!(body["storage"], "connected");
    }

    /// Repository whose storage never answers
    #[derive(Clone)]
    struct Unreachable;

    #[async_trait::async_trait]
    impl TodoRepository for Unreachable {
        async fn create(&self, _: TodoInput) -> TodoResult<Todo> {
            unreachable!()
        }
        async fn list(&self, _: QueryDescription) -> TodoResult<Vec<Todo>> {
            unreachable!()
        }
        async fn get(&self, _: i64) -> TodoResult<Todo> {
            unreachable!()
        }
        async fn update(&self, _: TodoInput, _: i64) -> TodoResult<Todo> {
            unreachable!()
        }
        async fn delete(&self, _: i64) -> TodoResult<()> {
            unreachable!()
        }
        async fn ping(&self) -> TodoResult<()> {
            Err(TodoError::new(ErrorKind::Unavailable, "Storage is not ready"))
        }
    }

    #[tokio::test]
    async fn test_ready_reports_unreachable_storage() {
        let app = app(Unreachable, Duration::from_secs(5));
        let (status, body) = send(app, get("/ready")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["storage"], "disconnected");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let (status, body) = send(memory_app(), get("/nope")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_openapi_document_lists_todo_paths() {
        let (status, body) = send(memory_app(), get("/api-docs/openapi.json")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"].get("/todos").is_some());
        assert!(body["paths"].get("/todos/{id}").is_some());
    }
}
