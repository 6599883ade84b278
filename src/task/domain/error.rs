//! Error types for task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the persisted column width.
    #[error("task title is {length} characters, maximum is {max}")]
    TitleTooLong {
        /// Length of the rejected title in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The label is empty after trimming.
    #[error("task label must not be empty")]
    EmptyLabel,

    /// The label exceeds the persisted column width.
    #[error("task label is {length} characters, maximum is {max}")]
    LabelTooLong {
        /// Length of the rejected label in characters.
        length: usize,
        /// Maximum accepted length.
        max: usize,
    },

    /// The priority value is not recognised.
    #[error(transparent)]
    InvalidPriority(#[from] ParseTaskPriorityError),
}

/// Error returned while parsing task priorities from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParseTaskPriorityError(pub String);
