//! Notifier that emits reminders as structured log events.

use crate::reminder::{
    domain::ReminderMessage,
    ports::{Notifier, NotifierResult},
};
use crate::task::domain::OwnerId;
use async_trait::async_trait;
use tracing::info;

/// Delivers reminders to the process log.
///
/// Stands in for a real push/email/SMS channel; never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl LogNotifier {
    /// Creates a log notifier.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, owner_id: OwnerId, message: &ReminderMessage) -> NotifierResult<()> {
        info!(target: "easytask::reminder", %owner_id, "{message}");
        Ok(())
    }
}
