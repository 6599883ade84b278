//! Snapshot of a task whose reminder is due, and the message sent for it.

use crate::task::domain::{OwnerId, Task, TaskId, TaskTitle};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The reminder-relevant slice of a task, as observed by a scan.
///
/// `reminder_at` is the value read from the store and is handed back as the
/// expected value when disarming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueReminder {
    task_id: TaskId,
    owner_id: OwnerId,
    title: TaskTitle,
    reminder_at: DateTime<Utc>,
}

impl DueReminder {
    /// Creates a due-reminder snapshot.
    #[must_use]
    pub const fn new(
        task_id: TaskId,
        owner_id: OwnerId,
        title: TaskTitle,
        reminder_at: DateTime<Utc>,
    ) -> Self {
        Self {
            task_id,
            owner_id,
            title,
            reminder_at,
        }
    }

    /// Builds a snapshot from a task whose reminder is armed.
    ///
    /// Returns `None` when the task has no reminder.
    #[must_use]
    pub fn from_task(task: &Task) -> Option<Self> {
        task.reminder_at().map(|reminder_at| {
            Self::new(task.id(), task.owner_id(), task.title().clone(), reminder_at)
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner_id(&self) -> OwnerId {
        self.owner_id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the reminder time observed by the scan.
    #[must_use]
    pub const fn reminder_at(&self) -> DateTime<Utc> {
        self.reminder_at
    }

    /// Renders the user-facing notification for this reminder.
    #[must_use]
    pub fn message(&self) -> ReminderMessage {
        ReminderMessage::for_reminder(self)
    }
}

/// User-facing reminder text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderMessage(String);

impl ReminderMessage {
    /// Formats the message for a due reminder.
    #[must_use]
    pub fn for_reminder(reminder: &DueReminder) -> Self {
        Self(format!(
            "Reminder: {} (User ID: {})",
            reminder.title(),
            reminder.owner_id()
        ))
    }

    /// Returns the message text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ReminderMessage {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for ReminderMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
