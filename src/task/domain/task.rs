//! Task aggregate root.

use super::{OwnerId, TaskId, TaskLabel, TaskPriority, TaskTitle};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner_id: OwnerId,
    title: TaskTitle,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    priority: TaskPriority,
    label: Option<TaskLabel>,
    is_done: bool,
    reminder_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Validated input for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Owning user.
    pub owner_id: OwnerId,
    /// Display title.
    pub title: TaskTitle,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Urgency.
    pub priority: TaskPriority,
    /// Optional tag.
    pub label: Option<TaskLabel>,
    /// Whether the task starts out completed.
    pub is_done: bool,
    /// Optional reminder time.
    pub reminder_at: Option<DateTime<Utc>>,
}

impl TaskDraft {
    /// Creates a draft with only the required fields set.
    #[must_use]
    pub fn new(owner_id: OwnerId, title: TaskTitle) -> Self {
        Self {
            owner_id,
            title,
            description: None,
            due_date: None,
            priority: TaskPriority::default(),
            label: None,
            is_done: false,
            reminder_at: None,
        }
    }
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner identifier.
    pub owner_id: OwnerId,
    /// Persisted title.
    pub title: TaskTitle,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted due date, if any.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted priority.
    pub priority: TaskPriority,
    /// Persisted label, if any.
    pub label: Option<TaskLabel>,
    /// Persisted completion flag.
    pub is_done: bool,
    /// Persisted reminder time, if armed.
    pub reminder_at: Option<DateTime<Utc>>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task from a validated draft.
    #[must_use]
    pub fn new(draft: TaskDraft, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            owner_id: draft.owner_id,
            title: draft.title,
            description: draft.description,
            due_date: draft.due_date,
            priority: draft.priority,
            label: draft.label,
            is_done: draft.is_done,
            reminder_at: draft.reminder_at,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner_id: data.owner_id,
            title: data.title,
            description: data.description,
            due_date: data.due_date,
            priority: data.priority,
            label: data.label,
            is_done: data.is_done,
            reminder_at: data.reminder_at,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> TaskPriority {
        self.priority
    }

    /// Returns the label, if any.
    #[must_use]
    pub const fn label(&self) -> Option<&TaskLabel> {
        self.label.as_ref()
    }

    /// Returns whether the task is completed.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.is_done
    }

    /// Returns the armed reminder time, if any.
    #[must_use]
    pub const fn reminder_at(&self) -> Option<DateTime<Utc>> {
        self.reminder_at
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns whether the reminder should fire at `now`.
    ///
    /// Done tasks never fire, whatever their reminder time.
    #[must_use]
    pub fn is_reminder_due(&self, now: DateTime<Utc>) -> bool {
        !self.is_done && self.reminder_at.is_some_and(|at| at <= now)
    }

    /// Replaces the title.
    pub fn rename(&mut self, title: TaskTitle, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces or clears the description.
    pub fn set_description(&mut self, description: Option<String>, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Replaces or clears the due date.
    pub fn set_due_date(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Replaces the priority.
    pub fn set_priority(&mut self, priority: TaskPriority, clock: &impl Clock) {
        self.priority = priority;
        self.touch(clock);
    }

    /// Replaces or clears the label.
    pub fn set_label(&mut self, label: Option<TaskLabel>, clock: &impl Clock) {
        self.label = label;
        self.touch(clock);
    }

    /// Sets the completion flag.
    pub fn set_done(&mut self, is_done: bool, clock: &impl Clock) {
        self.is_done = is_done;
        self.touch(clock);
    }

    /// Arms, reschedules, or clears the reminder on behalf of the owner.
    pub fn schedule_reminder(&mut self, reminder_at: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.reminder_at = reminder_at;
        self.touch(clock);
    }

    /// Clears the reminder if it still equals `expected`.
    ///
    /// Returns `false` and leaves the task untouched when the reminder was
    /// rescheduled or already cleared. No other field changes, `updated_at`
    /// included.
    pub fn disarm_reminder(&mut self, expected: DateTime<Utc>) -> bool {
        if self.reminder_at != Some(expected) {
            return false;
        }
        self.reminder_at = None;
        true
    }

    /// Adopts a reminder read back from storage. `updated_at` is unchanged.
    pub(crate) const fn restore_reminder(&mut self, reminder_at: Option<DateTime<Utc>>) {
        self.reminder_at = reminder_at;
    }

    /// Updates the `updated_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
