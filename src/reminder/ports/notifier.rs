//! Notifier port for delivering reminders to users.

use crate::reminder::domain::ReminderMessage;
use crate::task::domain::OwnerId;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for notifier operations.
pub type NotifierResult<T> = Result<T, NotifierError>;

/// Delivery channel for user-facing reminders (push, email, SMS, log).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers `message` to the user identified by `owner_id`.
    async fn notify(&self, owner_id: OwnerId, message: &ReminderMessage) -> NotifierResult<()>;
}

/// Errors returned by notifier implementations.
#[derive(Debug, Clone, Error)]
pub enum NotifierError {
    /// The channel rejected or failed to deliver the message.
    #[error("notification delivery failed: {0}")]
    Delivery(Arc<dyn std::error::Error + Send + Sync>),

    /// Delivery did not finish within the configured bound.
    #[error("notification timed out after {0:?}")]
    TimedOut(Duration),
}

impl NotifierError {
    /// Wraps a delivery failure from the underlying channel.
    pub fn delivery(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Delivery(Arc::new(err))
    }
}
