//! Application services for workforce task orchestration.

mod activity;
mod management;

pub use activity::ActivityLogger;
pub use management::{
    CreateTaskItem, TaskDetails, TaskManagementError, TaskManagementResult,
    TaskManagementService, UpdateTaskItem,
};
