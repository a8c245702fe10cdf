use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use axum_helpers::errors::{AppError, ErrorResponse};
use serde_json::json;
use tracing::instrument;

use crate::models::{current_timestamp, wire_datetime, SearchParams, TaskDto};
use crate::repository::TaskRepository;
use crate::service::TaskService;

/// Create a new task
#[utoipa::path(
    post,
    path = "",
    request_body = TaskDto,
    responses(
        (status = 201, description = "Task created", body = TaskDto),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Referenced entity missing", body = ErrorResponse),
        (status = 500, description = "Internal error", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service, payload))]
pub async fn create_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    payload: Result<Json<TaskDto>, JsonRejection>,
) -> Result<(StatusCode, Json<TaskDto>), AppError> {
    let Json(dto) = payload?;
    let created = service.create_task(dto).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Fetch a single task by id
///
/// Any failure, a missing id included, surfaces as a generic 500.
#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task found", body = TaskDto),
        (status = 500, description = "Lookup failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn get_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>, AppError> {
    let task = service
        .get_task(id)
        .await
        .map_err(|err| AppError::InternalServerError(format!("Error fetching task: {err}")))?;
    Ok(Json(task))
}

/// List every task
#[utoipa::path(
    get,
    path = "",
    responses(
        (status = 200, description = "All tasks", body = [TaskDto]),
        (status = 500, description = "Lookup failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn list_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
) -> Result<Json<Vec<TaskDto>>, AppError> {
    let tasks = service
        .get_all_tasks()
        .await
        .map_err(|err| AppError::InternalServerError(format!("Error fetching tasks: {err}")))?;
    Ok(Json(tasks))
}

/// Update an existing task
#[utoipa::path(
    put,
    path = "/{id}",
    params(("id" = i64, Path, description = "Task id")),
    request_body = TaskDto,
    responses(
        (status = 200, description = "Task updated", body = TaskDto),
        (status = 400, description = "Validation failure", body = ErrorResponse),
        (status = 404, description = "Task not found", body = ErrorResponse),
        (status = 500, description = "Update failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service, payload))]
pub async fn update_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<i64>,
    payload: Result<Json<TaskDto>, JsonRejection>,
) -> Result<Json<TaskDto>, AppError> {
    use crate::error::TaskError;

    let Json(dto) = payload?;
    let updated = service.update_task(id, dto).await.map_err(|err| match err {
        TaskError::Validation(msg) => AppError::BadRequest(format!("Validation error: {msg}")),
        TaskError::NotFound(task_id) => {
            AppError::NotFound(format!("Task not found with id: {task_id}"))
        }
        // The nested cause stays in the message on purpose
        other => AppError::InternalServerError(format!("Error updating task: {other}")),
    })?;
    Ok(Json(updated))
}

/// Delete a task
///
/// Like fetch-one, every failure maps to a generic 500.
#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 500, description = "Delete failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn delete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    service
        .delete_task(id)
        .await
        .map_err(|err| AppError::InternalServerError(format!("Error deleting task: {err}")))?;
    Ok(StatusCode::NO_CONTENT)
}

/// Mark a task as completed
#[utoipa::path(
    put,
    path = "/{id}/complete",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task marked DONE", body = TaskDto),
        (status = 500, description = "Transition failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn complete_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>, AppError> {
    let task = service.mark_completed(id).await.map_err(|err| {
        AppError::InternalServerError(format!("Error marking task as complete: {err}"))
    })?;
    Ok(Json(task))
}

/// Mark a task as pending
#[utoipa::path(
    put,
    path = "/{id}/pending",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "Task marked TODO", body = TaskDto),
        (status = 500, description = "Transition failure", body = ErrorResponse)
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn pending_task<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Path(id): Path<i64>,
) -> Result<Json<TaskDto>, AppError> {
    let task = service.mark_pending(id).await.map_err(|err| {
        AppError::InternalServerError(format!("Error marking task as pending: {err}"))
    })?;
    Ok(Json(task))
}

/// Search tasks by title and/or status
///
/// Successful searches always answer 200, an empty array included. The
/// unlikely failure path answers with a structured body echoing the
/// parameters rather than the shared error envelope.
#[utoipa::path(
    get,
    path = "/search",
    params(SearchParams),
    responses(
        (status = 200, description = "Matching tasks", body = [TaskDto]),
        (status = 500, description = "Search failure")
    ),
    tag = "tasks"
)]
#[instrument(skip(service))]
pub async fn search_tasks<R: TaskRepository>(
    State(service): State<Arc<TaskService<R>>>,
    Query(params): Query<SearchParams>,
) -> Response {
    match service
        .search_tasks(params.title.as_deref(), params.status.as_deref())
        .await
    {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(err) => {
            let body = json!({
                "error": format!("Error searching tasks: {err}"),
                "timestamp": current_timestamp().format(wire_datetime::FORMAT).to_string(),
                "search_parameters": {
                    "title": params.title.as_deref().unwrap_or("null"),
                    "status": params.status.as_deref().unwrap_or("null"),
                },
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}
