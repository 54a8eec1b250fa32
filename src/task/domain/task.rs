//! Task aggregate root and related lifecycle types.

use super::{
    ParsePriorityError, ParseTaskStatusError, ReferenceId, ReferenceType, TaskDomainError,
    TaskId, TaskKind, UserId,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default description for tasks created without an explicit one.
const DEFAULT_DESCRIPTION: &str = "New task created.";

/// Task lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been handed to an assignee but work has not started.
    Assigned,
    /// Task work is in progress.
    Started,
    /// Task work has finished.
    Completed,
    /// Task was withdrawn, typically by reassignment.
    Cancelled,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Assigned => "assigned",
            Self::Started => "started",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Returns whether the task still demands work from its assignee.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Assigned | Self::Started)
    }

    /// Returns whether the status is terminal.
    ///
    /// Terminal tasks never transition again; a new active task for the
    /// same reference and kind may coexist with them.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "assigned" => Ok(Self::Assigned),
            "started" => Ok(Self::Started),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Low urgency.
    Low,
    /// Normal urgency.
    Medium,
    /// High urgency.
    High,
}

impl Priority {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl TryFrom<&str> for Priority {
    type Error = ParsePriorityError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ParsePriorityError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Task aggregate root.
///
/// A task couples a unit of work ([`TaskKind`]) to a business reference
/// and the user currently responsible for it. Tasks are never deleted;
/// they move through statuses and accumulate activities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    reference_id: ReferenceId,
    reference_type: ReferenceType,
    kind: TaskKind,
    assignee_id: UserId,
    status: TaskStatus,
    priority: Priority,
    description: String,
    deadline: DateTime<Utc>,
}

impl Task {
    /// Reconstructs a persisted task from a stored draft and its
    /// allocated identifier.
    ///
    /// Intended for store adapters; the draft has already passed domain
    /// validation.
    #[must_use]
    pub fn from_draft(id: TaskId, draft: NewTask) -> Self {
        Self {
            id,
            reference_id: draft.reference_id,
            reference_type: draft.reference_type,
            kind: draft.kind,
            assignee_id: draft.assignee_id,
            status: draft.status,
            priority: draft.priority,
            description: draft.description,
            deadline: draft.deadline,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the business reference this task is attached to.
    #[must_use]
    pub const fn reference_id(&self) -> ReferenceId {
        self.reference_id
    }

    /// Returns the type of the business reference.
    #[must_use]
    pub const fn reference_type(&self) -> ReferenceType {
        self.reference_type
    }

    /// Returns the kind of work this task represents.
    #[must_use]
    pub const fn kind(&self) -> TaskKind {
        self.kind
    }

    /// Returns the user currently responsible for the task.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the priority.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the free-text description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Hands the task to a new assignee.
    pub const fn reassign(&mut self, assignee_id: UserId) {
        self.assignee_id = assignee_id;
    }

    /// Moves the task to a new lifecycle status.
    pub const fn set_status(&mut self, status: TaskStatus) {
        self.status = status;
    }

    /// Changes the priority.
    pub const fn set_priority(&mut self, priority: Priority) {
        self.priority = priority;
    }

    /// Overwrites the description.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Cancels the task. Cancelled tasks are terminal.
    pub const fn cancel(&mut self) {
        self.status = TaskStatus::Cancelled;
    }
}

/// Draft of a task awaiting its first save.
///
/// The store allocates the [`TaskId`] on insertion; everything else is
/// validated here so no invalid task can reach persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    reference_id: ReferenceId,
    reference_type: ReferenceType,
    kind: TaskKind,
    assignee_id: UserId,
    status: TaskStatus,
    priority: Priority,
    description: String,
    deadline: DateTime<Utc>,
}

impl NewTask {
    /// Creates a validated task draft.
    ///
    /// New tasks start in [`TaskStatus::Assigned`] with
    /// [`Priority::Medium`] and a default description; use the `with_*`
    /// methods to override.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::KindNotApplicable`] when the kind does
    /// not belong to the declared reference type per the catalog.
    pub fn new(
        reference_id: ReferenceId,
        reference_type: ReferenceType,
        kind: TaskKind,
        assignee_id: UserId,
        deadline: DateTime<Utc>,
    ) -> Result<Self, TaskDomainError> {
        if !kind.is_applicable_to(reference_type) {
            return Err(TaskDomainError::KindNotApplicable {
                kind,
                reference_type,
            });
        }
        Ok(Self {
            reference_id,
            reference_type,
            kind,
            assignee_id,
            status: TaskStatus::Assigned,
            priority: Priority::Medium,
            description: DEFAULT_DESCRIPTION.to_owned(),
            deadline,
        })
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the initial status.
    ///
    /// Only seed tooling should need this; regular creation paths start
    /// tasks as [`TaskStatus::Assigned`].
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Returns the user the draft will be assigned to.
    #[must_use]
    pub const fn assignee_id(&self) -> UserId {
        self.assignee_id
    }
}
