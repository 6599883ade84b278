//! Service layer for owner-scoped task management.

use crate::task::{
    domain::{
        OwnerId, Task, TaskDomainError, TaskDraft, TaskId, TaskLabel, TaskPriority, TaskTitle,
    },
    ports::{ReminderWrite, TaskFilter, TaskRepository, TaskRepositoryError},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Partial-update instruction for an optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    /// Leave the stored value as it is.
    #[default]
    Keep,
    /// Replace the stored value.
    Set(T),
    /// Remove the stored value.
    Clear,
}

impl<T> FieldUpdate<T> {
    /// Resolves the update against the current value.
    fn resolve(self, current: Option<T>) -> Option<T> {
        match self {
            Self::Keep => current,
            Self::Set(value) => Some(value),
            Self::Clear => None,
        }
    }

    /// Applies `f` to a `Set` value, keeping `Keep` and `Clear` as they are.
    fn try_map<U, E>(self, f: impl FnOnce(T) -> Result<U, E>) -> Result<FieldUpdate<U>, E> {
        Ok(match self {
            Self::Keep => FieldUpdate::Keep,
            Self::Set(value) => FieldUpdate::Set(f(value)?),
            Self::Clear => FieldUpdate::Clear,
        })
    }

    const fn is_keep(&self) -> bool {
        matches!(self, Self::Keep)
    }
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    owner_id: OwnerId,
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: Option<String>,
    label: Option<String>,
    is_done: bool,
    reminder_at: Option<DateTime<Utc>>,
}

impl CreateTaskRequest {
    /// Creates a request with the required fields.
    #[must_use]
    pub fn new(owner_id: OwnerId, title: impl Into<String>) -> Self {
        Self {
            owner_id,
            title: title.into(),
            description: None,
            due_date: None,
            priority: None,
            label: None,
            is_done: false,
            reminder_at: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the priority (`low`, `medium`, or `high`).
    #[must_use]
    pub fn with_priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets the label.
    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Marks the task as already done.
    #[must_use]
    pub const fn done(mut self) -> Self {
        self.is_done = true;
        self
    }

    /// Schedules a reminder.
    #[must_use]
    pub const fn with_reminder_at(mut self, reminder_at: DateTime<Utc>) -> Self {
        self.reminder_at = Some(reminder_at);
        self
    }
}

/// Request payload for a partial task update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    owner_id: OwnerId,
    task_id: TaskId,
    title: Option<String>,
    description: FieldUpdate<String>,
    due_date: FieldUpdate<DateTime<Utc>>,
    priority: Option<String>,
    label: FieldUpdate<String>,
    is_done: Option<bool>,
    reminder_at: FieldUpdate<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    /// Creates an update that changes nothing until fields are set.
    #[must_use]
    pub const fn new(owner_id: OwnerId, task_id: TaskId) -> Self {
        Self {
            owner_id,
            task_id,
            title: None,
            description: FieldUpdate::Keep,
            due_date: FieldUpdate::Keep,
            priority: None,
            label: FieldUpdate::Keep,
            is_done: None,
            reminder_at: FieldUpdate::Keep,
        }
    }

    /// Replaces the title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn description(mut self, description: FieldUpdate<String>) -> Self {
        self.description = description;
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub fn due_date(mut self, due_date: FieldUpdate<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    /// Replaces the priority.
    #[must_use]
    pub fn priority(mut self, priority: impl Into<String>) -> Self {
        self.priority = Some(priority.into());
        self
    }

    /// Sets or clears the label.
    #[must_use]
    pub fn label(mut self, label: FieldUpdate<String>) -> Self {
        self.label = label;
        self
    }

    /// Sets the completion flag.
    #[must_use]
    pub const fn is_done(mut self, is_done: bool) -> Self {
        self.is_done = Some(is_done);
        self
    }

    /// Schedules, reschedules, or clears the reminder.
    #[must_use]
    pub fn reminder_at(mut self, reminder_at: FieldUpdate<DateTime<Utc>>) -> Self {
        self.reminder_at = reminder_at;
        self
    }
}

/// Service-level errors for task management operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] TaskRepositoryError),
    /// The task does not exist or belongs to another owner.
    #[error("task {0} not found")]
    NotFound(TaskId),
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Owner-scoped task management service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: TaskRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when the title, label or priority
    /// is invalid, or [`TaskServiceError::Repository`] when persistence
    /// fails.
    pub async fn create_task(&self, request: CreateTaskRequest) -> TaskServiceResult<Task> {
        let mut draft = TaskDraft::new(request.owner_id, TaskTitle::new(request.title)?);
        draft.description = request.description;
        draft.due_date = request.due_date;
        draft.priority = parse_priority(request.priority.as_deref())?.unwrap_or_default();
        draft.label = request.label.map(TaskLabel::new).transpose()?;
        draft.is_done = request.is_done;
        draft.reminder_at = request.reminder_at;

        let task = Task::new(draft, &*self.clock);
        self.repository.store(&task).await?;
        Ok(task)
    }

    /// Returns one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] when the task does not exist or
    /// belongs to another owner.
    pub async fn get_task(&self, owner_id: OwnerId, task_id: TaskId) -> TaskServiceResult<Task> {
        self.repository
            .find_by_id(task_id)
            .await?
            .filter(|task| task.owner_id() == owner_id)
            .ok_or(TaskServiceError::NotFound(task_id))
    }

    /// Lists the owner's tasks, optionally narrowed by priority and label.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] when a filter value is invalid or
    /// [`TaskServiceError::Repository`] when the lookup fails.
    pub async fn list_tasks(
        &self,
        owner_id: OwnerId,
        priority: Option<&str>,
        label: Option<&str>,
    ) -> TaskServiceResult<Vec<Task>> {
        let filter = TaskFilter {
            priority: parse_priority(priority)?,
            label: label.map(TaskLabel::new).transpose()?,
        };
        Ok(self.repository.list_for_owner(owner_id, &filter).await?)
    }

    /// Applies a partial update to one of the owner's tasks.
    ///
    /// Only fields present in the request are touched; `updated_at` advances
    /// when at least one field is applied. The stored reminder is written
    /// only when the request sets or clears it, so an edit racing the
    /// reminder worker cannot re-arm a reminder that already fired.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown or foreign tasks,
    /// [`TaskServiceError::Domain`] for invalid values, or
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn update_task(&self, request: UpdateTaskRequest) -> TaskServiceResult<Task> {
        let UpdateTaskRequest {
            owner_id,
            task_id,
            title,
            description,
            due_date,
            priority,
            label,
            is_done,
            reminder_at,
        } = request;

        let new_title = title.map(TaskTitle::new).transpose()?;
        let new_priority = parse_priority(priority.as_deref())?;
        let new_label = label.try_map(TaskLabel::new)?;

        let mut task = self.get_task(owner_id, task_id).await?;
        let clock = &*self.clock;

        if let Some(value) = new_title {
            task.rename(value, clock);
        }
        if !description.is_keep() {
            let current = task.description().map(ToOwned::to_owned);
            task.set_description(description.resolve(current), clock);
        }
        if !due_date.is_keep() {
            task.set_due_date(due_date.resolve(task.due_date()), clock);
        }
        if let Some(value) = new_priority {
            task.set_priority(value, clock);
        }
        if !new_label.is_keep() {
            let current = task.label().cloned();
            task.set_label(new_label.resolve(current), clock);
        }
        if let Some(value) = is_done {
            task.set_done(value, clock);
        }
        let reminder_write = if reminder_at.is_keep() {
            ReminderWrite::Preserve
        } else {
            task.schedule_reminder(reminder_at.resolve(task.reminder_at()), clock);
            ReminderWrite::Overwrite
        };

        Ok(self.repository.update(&task, reminder_write).await?)
    }

    /// Deletes one of the owner's tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::NotFound`] for unknown or foreign tasks, or
    /// [`TaskServiceError::Repository`] when persistence fails.
    pub async fn delete_task(&self, owner_id: OwnerId, task_id: TaskId) -> TaskServiceResult<()> {
        let task = self.get_task(owner_id, task_id).await?;
        self.repository.delete(task.id()).await?;
        Ok(())
    }
}

fn parse_priority(value: Option<&str>) -> Result<Option<TaskPriority>, TaskDomainError> {
    value
        .map(TaskPriority::try_from)
        .transpose()
        .map_err(TaskDomainError::from)
}
