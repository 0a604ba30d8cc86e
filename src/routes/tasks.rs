use crate::{
    auth::AuthenticatedUserId,
    error::AppError,
    models::{TaskInput, TaskQuery, TaskUpdate},
    response::ApiResponse,
    tasks::TaskService,
};
use actix_web::{delete, get, http::StatusCode, post, route, web, HttpResponse};
use serde_json::json;
use uuid::Uuid;

// `AuthenticatedUserId` is the first argument of every handler so that a missing or
// bad token is reported as 401 before the body or path is looked at.

/// Retrieves the authenticated user's tasks, newest first.
///
/// ## Query Parameters:
/// - `status` (optional): `pending` or `completed`.
///
/// ## Responses:
/// - `200 OK`: the caller's tasks.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[get("")]
pub async fn get_tasks(
    user: AuthenticatedUserId,
    tasks: web::Data<TaskService>,
    query_params: web::Query<TaskQuery>,
) -> Result<HttpResponse, AppError> {
    let tasks = tasks.list(user.0, &query_params).await?;
    Ok(ApiResponse::success(StatusCode::OK, tasks, "Tasks fetched").into_response())
}

/// Creates a new task owned by the authenticated user.
///
/// ## Request Body:
/// - `title`: required, non-blank, at most 200 characters.
/// - `description` (optional): at most 1000 characters.
/// - `status` (optional): defaults to `pending`.
///
/// ## Responses:
/// - `201 Created`: the new task.
/// - `400 Bad Request`: missing or invalid title/description.
/// - `401 Unauthorized`: missing, invalid or expired token.
#[post("")]
pub async fn create_task(
    user: AuthenticatedUserId,
    tasks: web::Data<TaskService>,
    task_data: web::Json<TaskInput>,
) -> Result<HttpResponse, AppError> {
    let task = tasks.create(user.0, task_data.into_inner()).await?;
    Ok(ApiResponse::success(StatusCode::CREATED, task, "Task created").into_response())
}

/// Retrieves a specific task by its ID.
///
/// ## Responses:
/// - `200 OK`: the task, if the caller owns it.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no task with this id.
#[get("/{id}")]
pub async fn get_task(
    user: AuthenticatedUserId,
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task = tasks.get(user.0, task_id.into_inner()).await?;
    Ok(ApiResponse::success(StatusCode::OK, task, "Task fetched").into_response())
}

/// Updates an existing task. PUT and PATCH both apply a partial update: fields left
/// out of the body keep their current value.
///
/// ## Responses:
/// - `200 OK`: the updated task.
/// - `400 Bad Request`: invalid field values.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no task with this id.
#[route("/{id}", method = "PUT", method = "PATCH")]
pub async fn update_task(
    user: AuthenticatedUserId,
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
    task_data: web::Json<TaskUpdate>,
) -> Result<HttpResponse, AppError> {
    let task = tasks
        .update(user.0, task_id.into_inner(), task_data.into_inner())
        .await?;
    Ok(ApiResponse::success(StatusCode::OK, task, "Task updated").into_response())
}

/// Deletes a task by its ID.
///
/// ## Responses:
/// - `200 OK`: `{ "id": .. }` of the deleted task.
/// - `401 Unauthorized`: missing, invalid or expired token.
/// - `403 Forbidden`: the task belongs to someone else.
/// - `404 Not Found`: no task with this id.
#[delete("/{id}")]
pub async fn delete_task(
    user: AuthenticatedUserId,
    tasks: web::Data<TaskService>,
    task_id: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let task_id = task_id.into_inner();
    tasks.delete(user.0, task_id).await?;
    Ok(
        ApiResponse::success(StatusCode::OK, json!({ "id": task_id }), "Task successfully deleted")
            .into_response(),
    )
}
