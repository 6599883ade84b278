//! Domain model for reminder scanning.
//!
//! A scan observes [`DueReminder`] snapshots, sends a [`ReminderMessage`]
//! for each one, and records the outcome in a [`ScanReport`].

mod due;
mod scan;

pub use due::{DueReminder, ReminderMessage};
pub use scan::{
    DisarmPolicy, ParseDisarmPolicyError, ScanReport, ScannerState, ScannerStatus,
};
