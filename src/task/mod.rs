//! Workforce task lifecycle management.
//!
//! This module implements the task lifecycle and reassignment engine:
//! creating tasks against business references, deduplicating duplicate
//! assignments when a reference changes owner, recording an immutable
//! activity log per task, and answering the "smart" date-window query
//! that keeps still-open tasks visible beyond the window's end. The
//! module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
