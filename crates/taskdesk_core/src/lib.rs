//! Core domain logic for the task desk.
//! This crate is the single source of truth for task invariants and the
//! task file / report formats.

pub mod logging;
pub mod model;
pub mod report;
pub mod repo;
pub mod service;
pub mod store;

pub use logging::{default_log_level, init_logging, LoggingError};
pub use model::task::{
    format_timestamp, parse_timestamp, ParsePriorityError, ParseTaskStateError, Priority, Task,
    TaskState, TaskValidationError, TIMESTAMP_FORMAT,
};
pub use report::html::{render_report, write_report, ReportError, ReportResult};
pub use repo::task_repo::{InMemoryTaskRepository, RepoError, RepoResult, TaskRepository};
pub use service::task_service::{ServiceError, ServiceResult, TaskService};
pub use store::xml_store::{
    decode_tasks, encode_tasks, load_tasks, save_tasks, StoreError, StoreResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
