use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use super::{TaskStore, UserStore};
use crate::error::{AppError, DUPLICATE_EMAIL_MESSAGE};
use crate::models::{NewUser, Task, TaskQuery, TaskUpdate, User};

#[derive(Default)]
struct MemoryState {
    users: Vec<User>,
    tasks: HashMap<Uuid, Task>,
}

/// In-process store. Every operation holds one lock for its whole read-modify-write,
/// so the email uniqueness check and the insert are atomic.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::InternalServerError("memory store lock poisoned".into()))
    }

    pub fn user_count(&self) -> usize {
        self.lock().map(|state| state.users.len()).unwrap_or(0)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let state = self.lock()?;
        Ok(state.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AppError> {
        let mut state = self.lock()?;
        if state.users.iter().any(|u| u.email == user.email) {
            return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.into()));
        }

        let id = state.users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };
        state.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl TaskStore for MemoryStore {
    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError> {
        let state = self.lock()?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.user_id == owner_id)
            .filter(|t| query.status.map_or(true, |status| t.status == status))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError> {
        let state = self.lock()?;
        Ok(state.tasks.get(&id).cloned())
    }

    async fn insert_task(&self, task: Task) -> Result<Task, AppError> {
        let mut state = self.lock()?;
        state.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task(
        &self,
        id: Uuid,
        owner_id: i32,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError> {
        let mut state = self.lock()?;
        match state.tasks.get_mut(&id) {
            Some(task) if task.user_id == owner_id => {
                task.apply(update);
                Ok(Some(task.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn delete_task(&self, id: Uuid, owner_id: i32) -> Result<bool, AppError> {
        let mut state = self.lock()?;
        let owned = state
            .tasks
            .get(&id)
            .map_or(false, |task| task.user_id == owner_id);
        if owned {
            state.tasks.remove(&id);
        }
        Ok(owned)
    }
}
