//! Reminder scanning services.

mod scanner;
mod worker;

pub use scanner::{ReminderScanner, ScanError, ScannerConfig, ScannerConfigError};
pub use worker::{ReminderWorker, ReminderWorkerError, ReminderWorkerHandle};
