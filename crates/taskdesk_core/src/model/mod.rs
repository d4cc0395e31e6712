//! Task domain model.
//!
//! # Responsibility
//! - Define the single task record shared by repository, store and report.
//! - Own the timestamp text format used by every serialized view.
//!
//! # Invariants
//! - A task title is never mutated after construction.
//! - Priority is fixed at construction; only state changes.

pub mod task;
