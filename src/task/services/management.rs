//! Task management orchestration service.
//!
//! Implements the behavioural core: batch creation and updates, priority
//! edits, comments, the reassignment engine, and the date-window and
//! priority queries. Every mutation is mirrored into the activity log
//! through [`ActivityLogger`].

use crate::task::{
    domain::{
        Activity, NewTask, Priority, ReferenceId, ReferenceType, Task, TaskDomainError, TaskId,
        TaskKind, TaskStatus, UserId,
    },
    ports::{TaskStore, TaskStoreError},
    services::ActivityLogger,
};
use chrono::{DateTime, Duration, Utc};
use mockable::Clock;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

/// Request payload for creating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskItem {
    reference_id: ReferenceId,
    reference_type: ReferenceType,
    kind: TaskKind,
    assignee_id: UserId,
    deadline: DateTime<Utc>,
    priority: Option<Priority>,
    description: Option<String>,
}

impl CreateTaskItem {
    /// Creates a request item with required fields.
    #[must_use]
    pub const fn new(
        reference_id: ReferenceId,
        reference_type: ReferenceType,
        kind: TaskKind,
        assignee_id: UserId,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            reference_id,
            reference_type,
            kind,
            assignee_id,
            deadline,
            priority: None,
            description: None,
        }
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    fn into_draft(self) -> Result<NewTask, TaskDomainError> {
        let mut draft = NewTask::new(
            self.reference_id,
            self.reference_type,
            self.kind,
            self.assignee_id,
            self.deadline,
        )?;
        if let Some(priority) = self.priority {
            draft = draft.with_priority(priority);
        }
        if let Some(description) = self.description {
            draft = draft.with_description(description);
        }
        Ok(draft)
    }
}

/// Request payload for updating one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskItem {
    task_id: TaskId,
    status: Option<TaskStatus>,
    description: Option<String>,
}

impl UpdateTaskItem {
    /// Creates an update item for the given task.
    #[must_use]
    pub const fn new(task_id: TaskId) -> Self {
        Self {
            task_id,
            status: None,
            description: None,
        }
    }

    /// Requests a status transition.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Requests a description overwrite.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A task hydrated with its full activity log in append order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDetails {
    task: Task,
    activities: Vec<Activity>,
}

impl TaskDetails {
    /// Returns the task.
    #[must_use]
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Returns the activity log in append order.
    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }
}

/// Service-level errors for task management operations.
#[derive(Debug, Error)]
pub enum TaskManagementError {
    /// The referenced task does not exist.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A date-window query requires at least one assignee.
    #[error("assignee list must not be empty")]
    EmptyAssignees,

    /// The date window's end precedes its start.
    #[error("invalid date window: end {end} precedes start {start}")]
    InvalidDateWindow {
        /// Requested window start.
        start: DateTime<Utc>,
        /// Requested window end.
        end: DateTime<Utc>,
    },

    /// A comment must carry non-blank text.
    #[error("comment must not be empty")]
    EmptyComment,

    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),

    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for task management operations.
pub type TaskManagementResult<T> = Result<T, TaskManagementError>;

type ReferenceKey = (ReferenceId, ReferenceType);

/// Task management orchestration service.
///
/// Batch operations are atomic: all inputs are validated and all
/// referenced tasks loaded before the first write, so a failing item
/// leaves no partial state behind.
pub struct TaskManagementService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    logger: ActivityLogger<S, C>,
    // Serializes compound reassignment per reference so concurrent
    // calls cannot leave two active tasks of one kind behind.
    assign_locks: Arc<Mutex<HashMap<ReferenceKey, Arc<Mutex<()>>>>>,
}

// Every field is a shared handle; a derived Clone would demand
// `S: Clone` and `C: Clone`.
impl<S, C> Clone for TaskManagementService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            logger: self.logger.clone(),
            assign_locks: Arc::clone(&self.assign_locks),
        }
    }
}

impl<S, C> TaskManagementService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a new task management service.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        let logger = ActivityLogger::new(Arc::clone(&store), Arc::clone(&clock));
        Self {
            store,
            clock,
            logger,
            assign_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Creates one task per request item.
    ///
    /// The whole batch is validated up front; an invalid item fails the
    /// call before any task is stored. Every created task receives a
    /// creation activity.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::Domain`] when an item's kind does
    /// not belong to its reference type, or
    /// [`TaskManagementError::Store`] on persistence failure.
    pub async fn create_tasks(
        &self,
        items: Vec<CreateTaskItem>,
    ) -> TaskManagementResult<Vec<Task>> {
        let mut drafts = Vec::with_capacity(items.len());
        for item in items {
            drafts.push(item.into_draft()?);
        }

        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let task = self.store.insert(draft).await?;
            self.logger.task_created(&task).await?;
            created.push(task);
        }
        Ok(created)
    }

    /// Applies status and description edits to a batch of tasks.
    ///
    /// All referenced tasks are loaded before the first write; a missing
    /// id fails the whole batch with nothing applied. Items naming the
    /// same task apply cumulatively in batch order and the task is
    /// persisted once, so a status equal to the one a task has already
    /// reached appends no activity. The returned tasks mirror the items,
    /// each carrying its task's final state.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::NotFound`] when any referenced
    /// task does not exist, or [`TaskManagementError::Store`] on
    /// persistence failure.
    pub async fn update_tasks(
        &self,
        items: Vec<UpdateTaskItem>,
    ) -> TaskManagementResult<Vec<Task>> {
        let mut loaded: HashMap<TaskId, Task> = HashMap::with_capacity(items.len());
        for item in &items {
            if !loaded.contains_key(&item.task_id) {
                let task = self.require_task(item.task_id).await?;
                loaded.insert(item.task_id, task);
            }
        }

        let order: Vec<TaskId> = items.iter().map(|item| item.task_id).collect();
        for item in items {
            let Some(task) = loaded.get_mut(&item.task_id) else {
                continue;
            };
            if let Some(next) = item.status {
                let previous = task.status();
                if next != previous {
                    task.set_status(next);
                    let task_id = task.id();
                    let assignee_id = task.assignee_id();
                    self.logger
                        .status_changed(task_id, previous, next, Some(assignee_id))
                        .await?;
                }
            }
            if let Some(description) = item.description {
                task.set_description(description);
            }
        }

        for task in loaded.values() {
            self.store.update(task).await?;
        }
        Ok(order
            .into_iter()
            .filter_map(|task_id| loaded.get(&task_id).cloned())
            .collect())
    }

    /// Changes a task's priority.
    ///
    /// Setting the current priority again is a pure no-op: nothing is
    /// persisted and no activity is appended.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::NotFound`] when the task does not
    /// exist, or [`TaskManagementError::Store`] on persistence failure.
    pub async fn update_task_priority(
        &self,
        task_id: TaskId,
        priority: Priority,
    ) -> TaskManagementResult<Task> {
        let mut task = self.require_task(task_id).await?;
        let previous = task.priority();
        if previous == priority {
            return Ok(task);
        }
        task.set_priority(priority);
        self.store.update(&task).await?;
        self.logger
            .priority_changed(task.id(), previous, priority)
            .await?;
        Ok(task)
    }

    /// Attaches a comment to a task's activity log.
    ///
    /// The task itself is not mutated; its existence is checked so the
    /// log cannot reference a missing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::NotFound`] when the task does not
    /// exist, [`TaskManagementError::EmptyComment`] for blank text, or
    /// [`TaskManagementError::Store`] on persistence failure.
    pub async fn add_comment(
        &self,
        task_id: TaskId,
        comment: &str,
        user_id: UserId,
    ) -> TaskManagementResult<Activity> {
        if comment.trim().is_empty() {
            return Err(TaskManagementError::EmptyComment);
        }
        self.require_task(task_id).await?;
        let activity = self.logger.comment_added(task_id, comment, user_id).await?;
        Ok(activity)
    }

    /// Reassigns every applicable task of a reference to a new owner.
    ///
    /// For each task kind the catalog demands for the reference type:
    /// when no active task of that kind exists, a new one is created for
    /// the requested assignee; otherwise the active task with the
    /// smallest id survives (reassigned if owned by someone else) and
    /// every other active duplicate is cancelled. The operation is
    /// idempotent: repeating it with the same assignee appends no
    /// further activities.
    ///
    /// Calls for the same reference are serialized through a per
    /// reference lock so concurrent reassignment cannot leave duplicate
    /// active tasks behind.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::Store`] on persistence failure.
    /// Domain validation cannot reject a created task here because every
    /// kind comes straight from the catalog.
    pub async fn assign_by_reference(
        &self,
        reference_id: ReferenceId,
        reference_type: ReferenceType,
        assignee_id: UserId,
    ) -> TaskManagementResult<String> {
        let key = (reference_id, reference_type);
        let reference_lock = self.reference_lock(key).await;
        let outcome = {
            let _guard = reference_lock.lock().await;
            self.reconcile_reference(reference_id, reference_type, assignee_id)
                .await
        };
        drop(reference_lock);
        self.release_reference_lock(key).await;
        outcome?;

        Ok(format!(
            "Tasks assigned successfully for reference {reference_id}"
        ))
    }

    async fn reconcile_reference(
        &self,
        reference_id: ReferenceId,
        reference_type: ReferenceType,
        assignee_id: UserId,
    ) -> TaskManagementResult<()> {
        let existing = self
            .store
            .find_by_reference(reference_id, reference_type)
            .await?;

        for &kind in reference_type.applicable_kinds() {
            let mut active: Vec<Task> = existing
                .iter()
                .filter(|task| task.kind() == kind && task.status().is_active())
                .cloned()
                .collect();
            // Deterministic survivor: the oldest task wins.
            active.sort_by_key(Task::id);

            let mut candidates = active.into_iter();
            match candidates.next() {
                None => {
                    let draft = NewTask::new(
                        reference_id,
                        reference_type,
                        kind,
                        assignee_id,
                        // Tasks created by reassignment get a one-day
                        // deadline, matching the seeded fixture.
                        self.clock.utc() + Duration::days(1),
                    )?;
                    let task = self.store.insert(draft).await?;
                    self.logger.task_created(&task).await?;
                }
                Some(mut survivor) => {
                    let previous = survivor.assignee_id();
                    if previous != assignee_id {
                        survivor.reassign(assignee_id);
                        self.store.update(&survivor).await?;
                        self.logger
                            .assignee_changed(survivor.id(), previous, assignee_id)
                            .await?;
                    }
                    for mut duplicate in candidates {
                        duplicate.cancel();
                        self.store.update(&duplicate).await?;
                        self.logger
                            .cancelled_by_reassignment(duplicate.id(), assignee_id)
                            .await?;
                    }
                }
            }
        }

        Ok(())
    }

    /// Returns the tasks an owner should see for a date window.
    ///
    /// A task qualifies when it belongs to one of the given assignees,
    /// is not cancelled, and either its deadline falls inside the
    /// inclusive window or its deadline lies beyond the window's end
    /// while the task is still open. Deadlines before the window start
    /// are excluded regardless of status; completed tasks appear only
    /// with an in-window deadline.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::EmptyAssignees`] for an empty
    /// assignee list, [`TaskManagementError::InvalidDateWindow`] when
    /// the end precedes the start, or [`TaskManagementError::Store`] on
    /// persistence failure.
    pub async fn fetch_tasks_by_date(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        assignee_ids: &[UserId],
    ) -> TaskManagementResult<Vec<Task>> {
        if assignee_ids.is_empty() {
            return Err(TaskManagementError::EmptyAssignees);
        }
        if end < start {
            return Err(TaskManagementError::InvalidDateWindow { start, end });
        }

        let tasks = self.store.find_by_assignees(assignee_ids).await?;
        Ok(tasks
            .into_iter()
            .filter(|task| {
                if task.status() == TaskStatus::Cancelled {
                    return false;
                }
                let deadline = task.deadline();
                let inside_window = start <= deadline && deadline <= end;
                let open_beyond_window = deadline > end && task.status().is_active();
                inside_window || open_beyond_window
            })
            .collect())
    }

    /// Returns all tasks with the given priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::Store`] on persistence failure.
    pub async fn find_tasks_by_priority(
        &self,
        priority: Priority,
    ) -> TaskManagementResult<Vec<Task>> {
        let tasks = self.store.find_by_priority(priority).await?;
        Ok(tasks)
    }

    /// Returns a task hydrated with its activity log in append order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskManagementError::NotFound`] when the task does not
    /// exist, or [`TaskManagementError::Store`] on persistence failure.
    pub async fn find_task_by_id(&self, task_id: TaskId) -> TaskManagementResult<TaskDetails> {
        let task = self.require_task(task_id).await?;
        let activities = self.store.activities_for(task_id).await?;
        Ok(TaskDetails { task, activities })
    }

    async fn require_task(&self, task_id: TaskId) -> TaskManagementResult<Task> {
        self.store
            .find_by_id(task_id)
            .await?
            .ok_or(TaskManagementError::NotFound(task_id))
    }

    async fn reference_lock(&self, key: ReferenceKey) -> Arc<Mutex<()>> {
        let mut locks = self.assign_locks.lock().await;
        Arc::clone(locks.entry(key).or_default())
    }

    // Removes a reference's lock entry once no caller holds it, keeping
    // the map bounded by concurrent reassignment activity rather than
    // by every reference ever seen.
    async fn release_reference_lock(&self, key: ReferenceKey) {
        let mut locks = self.assign_locks.lock().await;
        if locks
            .get(&key)
            .is_some_and(|entry| Arc::strong_count(entry) == 1)
        {
            locks.remove(&key);
        }
    }

    #[cfg(test)]
    pub(crate) async fn reference_lock_count(&self) -> usize {
        self.assign_locks.lock().await.len()
    }
}
