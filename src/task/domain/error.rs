//! Error types for task domain validation and parsing.

use super::{ReferenceType, TaskKind};
use thiserror::Error;

/// Errors returned while constructing domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task kind is not applicable to the declared reference type.
    #[error("task kind '{kind}' is not applicable to reference type '{reference_type}'")]
    KindNotApplicable {
        /// The rejected task kind.
        kind: TaskKind,
        /// The reference type the kind was declared against.
        reference_type: ReferenceType,
    },
}

/// Error returned while parsing task statuses from storage strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing priorities from storage strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown priority: {0}")]
pub struct ParsePriorityError(pub String);
