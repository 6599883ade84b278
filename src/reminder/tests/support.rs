//! Shared fixtures for reminder tests.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use std::sync::{Arc, Mutex};

use crate::reminder::{
    domain::{DueReminder, ReminderMessage},
    ports::{Notifier, NotifierResult, ReminderStore, ReminderStoreResult},
};
use crate::task::domain::{OwnerId, TaskId};
use async_trait::async_trait;
use mockall::mock;

/// Clock frozen at a settable instant.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().expect("clock lock") = now;
    }
}

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock lock")
    }
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid timestamp")
}

mock! {
    pub Store {}

    #[async_trait]
    impl ReminderStore for Store {
        async fn find_due_reminders(
            &self,
            now: DateTime<Utc>,
        ) -> ReminderStoreResult<Vec<DueReminder>>;

        async fn clear_reminder(
            &self,
            task_id: TaskId,
            expected_reminder_at: DateTime<Utc>,
        ) -> ReminderStoreResult<bool>;
    }
}

mock! {
    pub Notify {}

    #[async_trait]
    impl Notifier for Notify {
        async fn notify(
            &self,
            owner_id: OwnerId,
            message: &ReminderMessage,
        ) -> NotifierResult<()>;
    }
}
