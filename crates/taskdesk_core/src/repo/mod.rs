//! Repository layer abstractions and implementations.
//!
//! # Responsibility
//! - Define the task data access contract used by the service layer.
//! - Keep collection ownership in one place.
//!
//! # Invariants
//! - Repository writes must enforce `Task::validate()` before mutation.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateTitle`).

pub mod task_repo;
