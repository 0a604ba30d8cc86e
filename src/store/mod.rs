//! Persistence contracts for users and tasks.
//!
//! The auth and task services only see these traits; `PgStore` backs them with
//! PostgreSQL and `MemoryStore` with process-local maps.
//!
//! Task mutations take the owner id and include it in the storage predicate, so a
//! store call can never touch another user's row even if a caller skipped the
//! access guard. Concurrent updates to the same task are last-write-wins.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{NewUser, Task, TaskQuery, TaskUpdate, User};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// `email` must already be normalized.
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Fails with `AppError::Conflict` if the email is taken.
    async fn insert_user(&self, user: NewUser) -> Result<User, AppError>;
}

#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Tasks owned by `owner_id`, newest first.
    async fn list_tasks(&self, owner_id: i32, query: &TaskQuery) -> Result<Vec<Task>, AppError>;

    async fn find_task(&self, id: Uuid) -> Result<Option<Task>, AppError>;

    async fn insert_task(&self, task: Task) -> Result<Task, AppError>;

    /// Returns `None` when no task with this id belongs to `owner_id`.
    async fn update_task(
        &self,
        id: Uuid,
        owner_id: i32,
        update: &TaskUpdate,
    ) -> Result<Option<Task>, AppError>;

    /// Returns `false` when no task with this id belongs to `owner_id`.
    async fn delete_task(&self, id: Uuid, owner_id: i32) -> Result<bool, AppError>;
}
