use uuid::Uuid;

use crate::error::AppError;
use crate::models::Task;
use crate::store::TaskStore;

/// Loads `task_id` and checks that `caller_id` owns it.
///
/// A missing task is `NotFound` for every caller. An existing task owned by someone
/// else is `Forbidden`. Nothing about the task leaves this function unless the caller
/// is the owner.
pub async fn authorize(
    store: &dyn TaskStore,
    task_id: Uuid,
    caller_id: i32,
) -> Result<Task, AppError> {
    let task = store
        .find_task(task_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Task not found".into()))?;

    if task.user_id != caller_id {
        log::warn!("User {} denied access to task {}", caller_id, task_id);
        return Err(AppError::Forbidden(
            "You do not have permission to access this task".into(),
        ));
    }

    Ok(task)
}
