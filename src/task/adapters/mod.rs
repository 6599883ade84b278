//! Adapter implementations of the task ports.
//!
//! Both repositories also implement
//! [`ReminderStore`](crate::reminder::ports::ReminderStore), so the reminder
//! scanner runs against the same rows the task service writes.

pub mod memory;
pub mod postgres;
