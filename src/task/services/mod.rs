//! Application services for task management.

mod management;

pub use management::{
    CreateTaskRequest, FieldUpdate, TaskService, TaskServiceError, TaskServiceResult,
    UpdateTaskRequest,
};
