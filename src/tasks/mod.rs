//! Task use cases for an authenticated caller.
//!
//! Every operation on a specific task id runs [`guard::authorize`] before touching the
//! store, so a non-owner never observes or changes another user's task. Creation needs
//! no guard: the owner is always the caller.

pub mod guard;

use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;
use crate::models::{Task, TaskInput, TaskQuery, TaskUpdate};
use crate::store::TaskStore;

pub struct TaskService {
    store: Arc<dyn TaskStore>,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>) -> Self {
        Self { store }
    }

    pub async fn list(&self, caller_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        self.store.list_tasks(caller_id, query).await
    }

    pub async fn create(&self, caller_id: i32, input: TaskInput) -> Result<Task, AppError> {
        input.validate()?;
        let task = self.store.insert_task(Task::new(input, caller_id)).await?;
        log::info!("User {} created task {}", caller_id, task.id);
        Ok(task)
    }

    pub async fn get(&self, caller_id: i32, task_id: Uuid) -> Result<Task, AppError> {
        guard::authorize(self.store.as_ref(), task_id, caller_id).await
    }

    /// Partial update. Concurrent updates to one task are last-write-wins.
    pub async fn update(
        &self,
        caller_id: i32,
        task_id: Uuid,
        update: TaskUpdate,
    ) -> Result<Task, AppError> {
        guard::authorize(self.store.as_ref(), task_id, caller_id).await?;
        update.validate()?;

        // The task can vanish between the guard and the write if the owner deletes it
        // from another request.
        self.store
            .update_task(task_id, caller_id, &update)
            .await?
            .ok_or_else(|| AppError::NotFound("Task not found".into()))
    }

    pub async fn delete(&self, caller_id: i32, task_id: Uuid) -> Result<(), AppError> {
        guard::authorize(self.store.as_ref(), task_id, caller_id).await?;

        if !self.store.delete_task(task_id, caller_id).await? {
            return Err(AppError::NotFound("Task not found".into()));
        }
        log::info!("User {} deleted task {}", caller_id, task_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TaskStatus;
    use crate::store::MemoryStore;

    const ALICE: i32 = 1;
    const BOB: i32 = 2;

    fn service() -> TaskService {
        TaskService::new(Arc::new(MemoryStore::new()))
    }

    fn input(title: &str) -> TaskInput {
        TaskInput {
            title: title.to_string(),
            description: None,
            status: None,
        }
    }

    #[actix_rt::test]
    async fn test_create_sets_owner_from_caller() {
        let service = service();
        let task = service.create(ALICE, input("Ship it")).await.unwrap();
        assert_eq!(task.user_id, ALICE);
        assert_eq!(task.status, TaskStatus::Pending);

        let missing_title = service.create(ALICE, input("")).await;
        assert!(matches!(missing_title, Err(AppError::ValidationError(_))));
    }

    #[actix_rt::test]
    async fn test_list_only_returns_callers_tasks() {
        let service = service();
        service.create(ALICE, input("a")).await.unwrap();
        service.create(BOB, input("b")).await.unwrap();

        let tasks = service.list(ALICE, &TaskQuery::default()).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "a");
    }

    #[actix_rt::test]
    async fn test_non_owner_cannot_read_update_or_delete() {
        let service = service();
        let task = service.create(ALICE, input("Private")).await.unwrap();

        assert!(matches!(service.get(BOB, task.id).await, Err(AppError::Forbidden(_))));

        let update = TaskUpdate {
            title: Some("Hijacked".to_string()),
            status: Some(TaskStatus::Completed),
            ..Default::default()
        };
        assert!(matches!(
            service.update(BOB, task.id, update).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(service.delete(BOB, task.id).await, Err(AppError::Forbidden(_))));

        let unchanged = service.get(ALICE, task.id).await.unwrap();
        assert_eq!(unchanged, task);
    }

    #[actix_rt::test]
    async fn test_guard_runs_before_update_validation() {
        let service = service();
        let task = service.create(ALICE, input("Private")).await.unwrap();

        // An invalid body from a non-owner must not reveal anything beyond 403.
        let invalid = TaskUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(matches!(
            service.update(BOB, task.id, invalid.clone()).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            service.update(ALICE, task.id, invalid).await,
            Err(AppError::ValidationError(_))
        ));
    }

    #[actix_rt::test]
    async fn test_owner_update_and_delete() {
        let service = service();
        let task = service.create(ALICE, input("Draft")).await.unwrap();

        let updated = service
            .update(
                ALICE,
                task.id,
                TaskUpdate {
                    status: Some(TaskStatus::Completed),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.status, TaskStatus::Completed);
        assert_eq!(updated.title, "Draft");

        service.delete(ALICE, task.id).await.unwrap();
        assert!(matches!(service.get(ALICE, task.id).await, Err(AppError::NotFound(_))));
        assert!(matches!(service.delete(ALICE, task.id).await, Err(AppError::NotFound(_))));
    }
    #[actix_rt::test]
    async fn test_update_with_null_description_clears_it() {
        let service = service();
        let mut with_description = input("Documented");
        with_description.description = Some("d".to_string());
        let task = service.create(ALICE, with_description).await.unwrap();

        let update: TaskUpdate = serde_json::from_str(r#"{"description": null}"#).unwrap();
        let updated = service.update(ALICE, task.id, update).await.unwrap();
        assert_eq!(updated.description, None);
        assert_eq!(updated.title, "Documented");
    }
}
