//! Domain model for tasks.
//!
//! The task domain models ownership, completion, priority and label
//! metadata, and the optional reminder time, while keeping all
//! infrastructure concerns outside of the domain boundary.

mod error;
mod ids;
mod task;
mod values;

pub use error::{ParseTaskPriorityError, TaskDomainError};
pub use ids::{OwnerId, TaskId};
pub use task::{PersistedTaskData, Task, TaskDraft};
pub use values::{TaskLabel, TaskPriority, TaskTitle};
