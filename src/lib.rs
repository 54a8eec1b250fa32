//! Foreman: workforce task-management core.
//!
//! This crate maintains a collection of tasks attached to business
//! references (orders, entities), supports reassignment and
//! status/priority edits, records an activity log per task, and answers
//! date-window and priority queries.
//!
//! # Architecture
//!
//! Foreman follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (in-memory store)
//! - **Services**: Orchestration of the task lifecycle and activity log
//!
//! Transport envelopes, JSON field conventions, and durable persistence
//! are adapter concerns and live outside this crate.

pub mod task;
