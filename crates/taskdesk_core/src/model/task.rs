//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical task record and its priority/state enums.
//! - Provide the persisted literal names and display labels for both enums.
//!
//! # Invariants
//! - `title` and `priority` are immutable; `state` is the only mutable field.
//! - `created_at` carries whole seconds only, matching `TIMESTAMP_FORMAT`.
//! - Title comparisons always go through `title_key()`.

use chrono::{Local, NaiveDateTime, Timelike};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Text format for creation and generation timestamps (second precision, no zone).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Urgency level of a task.
///
/// Declaration order is the report sort order: `High < Medium < Low`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    /// Literal written to and read from the task file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "ALTA",
            Self::Medium => "MEDIA",
            Self::Low => "BAIXA",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }

    /// Color marker used by the HTML report.
    pub fn color(self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "orange",
            Self::Low => "green",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ParsePriorityError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|priority| priority.as_str() == value)
            .ok_or_else(|| ParsePriorityError(value.to_string()))
    }
}

/// Progress state of a task. Any state may move to any other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskState {
    Pending,
    InProgress,
    Done,
}

impl TaskState {
    pub const ALL: [TaskState; 3] = [TaskState::Pending, TaskState::InProgress, TaskState::Done];

    /// Literal written to and read from the task file.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDENTE",
            Self::InProgress => "EM_PROGRESSO",
            Self::Done => "CONCLUIDA",
        }
    }

    /// Human-facing label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::InProgress => "IN_PROGRESS",
            Self::Done => "DONE",
        }
    }
}

impl Display for TaskState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TaskState {
    type Err = ParseTaskStateError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == value)
            .ok_or_else(|| ParseTaskStateError(value.to_string()))
    }
}

/// Error returned when a persisted priority literal is unknown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority `{0}`")]
pub struct ParsePriorityError(pub String);

/// Error returned when a persisted state literal is unknown.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state `{0}`")]
pub struct ParseTaskStateError(pub String);

/// Task-level validation failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace only.
    #[error("task title must not be empty")]
    EmptyTitle,
}

/// One unit of work tracked by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    title: String,
    description: String,
    created_at: NaiveDateTime,
    priority: Priority,
    state: TaskState,
}

impl Task {
    /// Creates a fresh task stamped with the current local time.
    ///
    /// # Invariants
    /// - `state` starts as `TaskState::Pending`.
    /// - `created_at` is truncated to whole seconds.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> Self {
        let now = Local::now().naive_local();
        Self::restore(
            title,
            description,
            truncate_to_seconds(now),
            priority,
            TaskState::Pending,
        )
    }

    /// Rebuilds a task with every field supplied, as done by the file loader.
    ///
    /// This constructor does not validate; call `validate()` where needed.
    pub fn restore(
        title: impl Into<String>,
        description: impl Into<String>,
        created_at: NaiveDateTime,
        priority: Priority,
        state: TaskState,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            created_at,
            priority,
            state,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn created_at(&self) -> NaiveDateTime {
        self.created_at
    }

    pub fn priority(&self) -> Priority {
        self.priority
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    /// Moves the task to `state`. All transitions are allowed.
    pub fn set_state(&mut self, state: TaskState) {
        self.state = state;
    }

    /// Case-folded natural key used for uniqueness and lookup.
    pub fn title_key(&self) -> String {
        title_key(&self.title)
    }

    /// Returns whether `title` names this task, ignoring case.
    pub fn matches_title(&self, title: &str) -> bool {
        self.title_key() == title_key(title)
    }

    /// Validates insertion-time invariants.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        Ok(())
    }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, {})", self.title, self.priority, self.state)
    }
}

/// Folds a title into its comparison key.
pub fn title_key(title: &str) -> String {
    title.to_lowercase()
}

/// Formats a timestamp with `TIMESTAMP_FORMAT`.
pub fn format_timestamp(value: NaiveDateTime) -> String {
    value.format(TIMESTAMP_FORMAT).to_string()
}

/// Parses a timestamp written by `format_timestamp`.
pub fn parse_timestamp(value: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
}

fn truncate_to_seconds(value: NaiveDateTime) -> NaiveDateTime {
    value.with_nanosecond(0).unwrap_or(value)
}
