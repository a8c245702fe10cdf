pub mod rest;

use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use axum_helpers::errors::ErrorResponse;
use utoipa::OpenApi;

use crate::models::TaskDto;
use crate::repository::TaskRepository;
use crate::service::TaskService;

#[derive(OpenApi)]
#[openapi(
    paths(
        rest::create_task,
        rest::list_tasks,
        rest::search_tasks,
        rest::get_task,
        rest::update_task,
        rest::delete_task,
        rest::complete_task,
        rest::pending_task,
    ),
    components(schemas(TaskDto, ErrorResponse)),
    tags((name = "tasks", description = "Task tracking endpoints"))
)]
pub struct TasksApiDoc;

/// Routes for the task resource, to be nested under `/tasks`.
pub fn router<R: TaskRepository + 'static>(service: Arc<TaskService<R>>) -> Router {
    Router::new()
        .route("/", get(rest::list_tasks::<R>).post(rest::create_task::<R>))
        .route("/search", get(rest::search_tasks::<R>))
        .route(
            "/{id}",
            get(rest::get_task::<R>)
                .put(rest::update_task::<R>)
                .delete(rest::delete_task::<R>),
        )
        .route("/{id}/complete", put(rest::complete_task::<R>))
        .route("/{id}/pending", put(rest::pending_task::<R>))
        .with_state(service)
}
