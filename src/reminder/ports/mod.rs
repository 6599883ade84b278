//! Port contracts for reminder scanning.

mod notifier;
mod store;

pub use notifier::{Notifier, NotifierError, NotifierResult};
pub use store::{ReminderStore, ReminderStoreError, ReminderStoreResult};
