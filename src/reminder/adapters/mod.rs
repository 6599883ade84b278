//! Notifier adapters.

mod logging;
pub mod memory;

pub use logging::LogNotifier;
pub use memory::{DeliveredNotification, InMemoryNotifier};
