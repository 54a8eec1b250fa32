//! Domain model for workforce task management.
//!
//! The task domain models tasks attached to business references, the
//! static catalog of applicable task kinds per reference type, and the
//! per-task activity log, while keeping all infrastructure concerns
//! outside of the domain boundary.

mod activity;
mod catalog;
mod error;
mod ids;
mod task;

pub use activity::{Activity, ActivityEvent, NewActivity};
pub use catalog::{ReferenceType, TaskKind};
pub use error::{ParsePriorityError, ParseTaskStatusError, TaskDomainError};
pub use ids::{ActivityId, ReferenceId, TaskId, UserId};
pub use task::{NewTask, Priority, Task, TaskStatus};
