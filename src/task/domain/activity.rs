//! Per-task activity log entries.
//!
//! Activities are the audit trail of a task. Once appended they are
//! never edited or removed, which keeps the trail trustworthy and makes
//! concurrent reads simple.

use super::{ActivityId, TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of event an activity records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityEvent {
    /// The task was persisted for the first time.
    TaskCreated,
    /// The task changed hands.
    AssigneeChanged,
    /// The task moved to a different lifecycle status.
    StatusChanged,
    /// The task priority changed.
    PriorityChanged,
    /// A user commented on the task.
    CommentAdded,
}

impl ActivityEvent {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TaskCreated => "task_created",
            Self::AssigneeChanged => "assignee_changed",
            Self::StatusChanged => "status_changed",
            Self::PriorityChanged => "priority_changed",
            Self::CommentAdded => "comment_added",
        }
    }
}

impl std::fmt::Display for ActivityEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    id: ActivityId,
    task_id: TaskId,
    recorded_at: DateTime<Utc>,
    event: ActivityEvent,
    message: String,
    actor: Option<UserId>,
}

impl Activity {
    /// Reconstructs a persisted activity from a stored draft and its
    /// allocated identifier. Intended for store adapters.
    #[must_use]
    pub fn from_draft(id: ActivityId, draft: NewActivity) -> Self {
        Self {
            id,
            task_id: draft.task_id,
            recorded_at: draft.recorded_at,
            event: draft.event,
            message: draft.message,
            actor: draft.actor,
        }
    }

    /// Returns the activity identifier.
    #[must_use]
    pub const fn id(&self) -> ActivityId {
        self.id
    }

    /// Returns the task this activity belongs to.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the moment the activity was appended.
    #[must_use]
    pub const fn recorded_at(&self) -> DateTime<Utc> {
        self.recorded_at
    }

    /// Returns the recorded event kind.
    #[must_use]
    pub const fn event(&self) -> ActivityEvent {
        self.event
    }

    /// Returns the free-text message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the user who performed the action, when attributable.
    ///
    /// Priority changes carry no actor.
    #[must_use]
    pub const fn actor(&self) -> Option<UserId> {
        self.actor
    }
}

/// Draft of an activity awaiting its identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
    task_id: TaskId,
    recorded_at: DateTime<Utc>,
    event: ActivityEvent,
    message: String,
    actor: Option<UserId>,
}

impl NewActivity {
    /// Creates an activity draft.
    #[must_use]
    pub fn new(
        task_id: TaskId,
        recorded_at: DateTime<Utc>,
        event: ActivityEvent,
        message: impl Into<String>,
        actor: Option<UserId>,
    ) -> Self {
        Self {
            task_id,
            recorded_at,
            event,
            message: message.into(),
            actor,
        }
    }

    /// Returns the task this draft targets.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }
}
