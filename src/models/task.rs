use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;
use std::borrow::Cow;
use uuid::Uuid;
use validator::{Validate, ValidationError};

/// Represents the status of a task.
/// Corresponds to the `task_status` SQL enum.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Not done yet.
    #[default]
    Pending,
    /// Done.
    Completed,
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

const MAX_DESCRIPTION_LEN: usize = 1000;

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn explicit_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

fn validate_update_description(update: &TaskUpdate) -> Result<(), ValidationError> {
    match &update.description {
        Some(Some(description)) if description.chars().count() > MAX_DESCRIPTION_LEN => {
            let mut err = ValidationError::new("description");
            err.message = Some(Cow::from("Description must be at most 1000 characters"));
            Err(err)
        }
        _ => Ok(()),
    }
}

/// Input structure for creating a task.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct TaskInput {
    /// The title of the task.
    /// Must be between 1 and 200 characters and not only whitespace.
    #[serde(default)]
    #[validate(
        length(min = 1, max = 200, message = "Title is required"),
        custom(function = "validate_not_blank", message = "Title is required")
    )]
    pub title: String,

    /// An optional description for the task.
    /// Maximum length of 1000 characters if provided.
    #[validate(length(max = 1000))]
    pub description: Option<String>,

    /// Initial status; `pending` when omitted.
    #[serde(default)]
    pub status: Option<TaskStatus>,
}

/// Partial update of a task. Absent fields are left untouched.
///
/// There is no owner field: unknown keys such as `user_id` are ignored, so ownership can
/// never be reassigned through an update.
#[derive(Debug, Default, Clone, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_update_description"))]
pub struct TaskUpdate {
    #[validate(
        length(min = 1, max = 200, message = "Title must not be empty"),
        custom(function = "validate_not_blank", message = "Title must not be empty")
    )]
    pub title: Option<String>,

    /// `Some(None)` clears the description; `None` leaves it as is.
    #[serde(default, deserialize_with = "explicit_null", skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,

    pub status: Option<TaskStatus>,
}

/// Represents a task entity as stored in the database and returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Task {
    /// Unique identifier for the task (UUID v4).
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Identifier of the user who owns the task. Set once at creation.
    pub user_id: i32,
}

/// Query parameters accepted when listing tasks.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct TaskQuery {
    pub status: Option<TaskStatus>,
}

impl Task {
    /// Creates a new `Task` owned by `owner_id`, with a fresh UUID and both timestamps set
    /// to the current time.
    pub fn new(input: TaskInput, owner_id: i32) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title.trim().to_string(),
            description: input.description,
            status: input.status.unwrap_or_default(),
            created_at: now,
            updated_at: now,
            user_id: owner_id,
        }
    }

    /// Applies a partial update in place. The owner is never touched.
    pub fn apply(&mut self, update: &TaskUpdate) {
        if let Some(title) = &update.title {
            self.title = title.trim().to_string();
        }
        if let Some(description) = &update.description {
            self.description = description.clone();
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        self.updated_at = Utc::now();
    }
}
