//! Activity log appender with monotonic timestamps.

use crate::task::{
    domain::{Activity, ActivityEvent, NewActivity, Priority, Task, TaskId, TaskStatus, UserId},
    ports::{TaskStore, TaskStoreResult},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

/// Appends activity entries on behalf of the management service.
///
/// Timestamps are clamped against an atomic watermark so that a clock
/// stepping backwards never produces an entry that appears to predate an
/// earlier one.
pub struct ActivityLogger<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<S>,
    clock: Arc<C>,
    watermark: Arc<AtomicI64>,
}

// Every field is a shared handle; a derived Clone would demand
// `S: Clone` and `C: Clone`.
impl<S, C> Clone for ActivityLogger<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            clock: Arc::clone(&self.clock),
            watermark: Arc::clone(&self.watermark),
        }
    }
}

impl<S, C> ActivityLogger<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a logger writing through the given store.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self {
            store,
            clock,
            watermark: Arc::new(AtomicI64::new(i64::MIN)),
        }
    }

    /// Returns the current clock time, never earlier than any timestamp
    /// already handed out by this logger.
    fn next_stamp(&self) -> DateTime<Utc> {
        let now = self.clock.utc();
        let now_ms = now.timestamp_millis();
        let prev_ms = self.watermark.fetch_max(now_ms, Ordering::AcqRel);
        if prev_ms <= now_ms {
            now
        } else {
            DateTime::from_timestamp_millis(prev_ms).unwrap_or(now)
        }
    }

    async fn append(
        &self,
        task_id: TaskId,
        event: ActivityEvent,
        message: String,
        actor: Option<UserId>,
    ) -> TaskStoreResult<Activity> {
        let draft = NewActivity::new(task_id, self.next_stamp(), event, message, actor);
        self.store.append_activity(draft).await
    }

    /// Records the creation of a freshly persisted task.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn task_created(&self, task: &Task) -> TaskStoreResult<Activity> {
        self.append(
            task.id(),
            ActivityEvent::TaskCreated,
            "Task created.".to_owned(),
            Some(task.assignee_id()),
        )
        .await
    }

    /// Records a change of assignee, attributed to the new assignee.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn assignee_changed(
        &self,
        task_id: TaskId,
        previous: UserId,
        next: UserId,
    ) -> TaskStoreResult<Activity> {
        self.append(
            task_id,
            ActivityEvent::AssigneeChanged,
            format!("Assignee changed from {previous} to {next}"),
            Some(next),
        )
        .await
    }

    /// Records a status transition.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn status_changed(
        &self,
        task_id: TaskId,
        previous: TaskStatus,
        next: TaskStatus,
        actor: Option<UserId>,
    ) -> TaskStoreResult<Activity> {
        self.append(
            task_id,
            ActivityEvent::StatusChanged,
            format!("Status changed from {previous} to {next}"),
            actor,
        )
        .await
    }

    /// Records the cancellation of a duplicate task during reassignment.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn cancelled_by_reassignment(
        &self,
        task_id: TaskId,
        actor: UserId,
    ) -> TaskStoreResult<Activity> {
        self.append(
            task_id,
            ActivityEvent::StatusChanged,
            "Task cancelled due to reassignment.".to_owned(),
            Some(actor),
        )
        .await
    }

    /// Records a priority change. Priority changes carry no
    /// attributable actor.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn priority_changed(
        &self,
        task_id: TaskId,
        previous: Priority,
        next: Priority,
    ) -> TaskStoreResult<Activity> {
        self.append(
            task_id,
            ActivityEvent::PriorityChanged,
            format!("Priority changed from {previous} to {next}"),
            None,
        )
        .await
    }

    /// Records a user comment.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::task::ports::TaskStoreError`] when the append
    /// fails.
    pub async fn comment_added(
        &self,
        task_id: TaskId,
        comment: impl Into<String> + Send,
        actor: UserId,
    ) -> TaskStoreResult<Activity> {
        self.append(
            task_id,
            ActivityEvent::CommentAdded,
            comment.into(),
            Some(actor),
        )
        .await
    }
}
