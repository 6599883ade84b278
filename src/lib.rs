//! EasyTask: owner-scoped tasks with one-shot reminders.
//!
//! This crate provides task storage and management, and a background worker
//! that notifies owners when a task's reminder time has passed.
//!
//! # Architecture
//!
//! EasyTask follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, logging, memory)
//!
//! # Modules
//!
//! - [`task`]: Task records, validation, and owner-scoped management
//! - [`reminder`]: Due-reminder scanning, notification, and the managed worker
//! - [`config`]: Worker settings from flags and the environment
//! - [`telemetry`]: Tracing subscriber setup

pub mod config;
pub mod reminder;
pub mod task;
pub mod telemetry;
