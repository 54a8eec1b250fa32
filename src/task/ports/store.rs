//! Store port for task persistence, indexed lookup, and the activity log.

use crate::task::domain::{
    Activity, NewActivity, NewTask, Priority, ReferenceId, ReferenceType, Task, TaskId, UserId,
};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Each individual operation appears atomic to other callers. Compound
/// service operations layer their own serialization on top (see the
/// per-reference lock in the management service).
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Persists a new task, allocating the next task identifier.
    ///
    /// Task identifiers are unique and strictly increasing for the
    /// lifetime of the store.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::Persistence`] when the backing state is
    /// unavailable.
    async fn insert(&self, draft: NewTask) -> TaskStoreResult<Task>;

    /// Persists changes to an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn update(&self, task: &Task) -> TaskStoreResult<()>;

    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_by_id(&self, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns all tasks attached to the given business reference, in
    /// unspecified order.
    async fn find_by_reference(
        &self,
        reference_id: ReferenceId,
        reference_type: ReferenceType,
    ) -> TaskStoreResult<Vec<Task>>;

    /// Returns all tasks whose assignee is in the given set.
    async fn find_by_assignees(&self, assignee_ids: &[UserId]) -> TaskStoreResult<Vec<Task>>;

    /// Returns all tasks with the given priority.
    async fn find_by_priority(&self, priority: Priority) -> TaskStoreResult<Vec<Task>>;

    /// Returns the activity log of a task in append order.
    ///
    /// A task without activities (or an unknown task id) yields an empty
    /// sequence.
    async fn activities_for(&self, task_id: TaskId) -> TaskStoreResult<Vec<Activity>>;

    /// Appends an activity to a task's log, allocating the next
    /// activity identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::UnknownTask`] when the draft targets a
    /// task that does not exist; every persisted activity resolves to a
    /// task.
    async fn append_activity(&self, draft: NewActivity) -> TaskStoreResult<Activity>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task targeted by an update was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// An activity was appended for a task that does not exist.
    #[error("cannot record activity for unknown task: {0}")]
    UnknownTask(TaskId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
