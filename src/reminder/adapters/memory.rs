//! In-memory notifier adapter for tests and deterministic local runs.

use crate::reminder::{
    domain::ReminderMessage,
    ports::{Notifier, NotifierError, NotifierResult},
};
use crate::task::domain::OwnerId;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::{Arc, RwLock};

/// A notification accepted by [`InMemoryNotifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveredNotification {
    /// Recipient.
    pub owner_id: OwnerId,
    /// Message text.
    pub message: ReminderMessage,
}

/// Records deliveries instead of sending them.
///
/// Owners can be marked unreachable, in which case delivery fails and nothing
/// is recorded.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotifier {
    state: Arc<RwLock<InMemoryNotifierState>>,
}

#[derive(Debug, Default)]
struct InMemoryNotifierState {
    delivered: Vec<DeliveredNotification>,
    unreachable: HashSet<OwnerId>,
    attempts: usize,
}

impl InMemoryNotifier {
    /// Creates a notifier with no recorded deliveries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes delivery to `owner_id` fail until [`Self::set_reachable`] is
    /// called.
    ///
    /// # Errors
    ///
    /// Returns delivery errors when lock acquisition fails.
    pub fn set_unreachable(&self, owner_id: OwnerId) -> NotifierResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        state.unreachable.insert(owner_id);
        Ok(())
    }

    /// Restores delivery to `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns delivery errors when lock acquisition fails.
    pub fn set_reachable(&self, owner_id: OwnerId) -> NotifierResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        state.unreachable.remove(&owner_id);
        Ok(())
    }

    /// Returns every successful delivery in order.
    #[must_use]
    pub fn delivered(&self) -> Vec<DeliveredNotification> {
        self.state
            .read()
            .map(|state| state.delivered.clone())
            .unwrap_or_default()
    }

    /// Returns the number of notify calls, failed ones included.
    #[must_use]
    pub fn attempts(&self) -> usize {
        self.state.read().map(|state| state.attempts).unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for InMemoryNotifier {
    async fn notify(&self, owner_id: OwnerId, message: &ReminderMessage) -> NotifierResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| NotifierError::delivery(std::io::Error::other(err.to_string())))?;
        state.attempts += 1;
        if state.unreachable.contains(&owner_id) {
            return Err(NotifierError::delivery(std::io::Error::new(
                std::io::ErrorKind::NotConnected,
                format!("owner {owner_id} is unreachable"),
            )));
        }
        state.delivered.push(DeliveredNotification {
            owner_id,
            message: message.clone(),
        });
        Ok(())
    }
}
