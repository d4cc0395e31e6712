//! Task repository contract and in-memory implementation.
//!
//! # Responsibility
//! - Own the live task collection and every mutation applied to it.
//! - Enforce title uniqueness and title-keyed lookup.
//!
//! # Invariants
//! - Insertion order is preserved; `list_*` results keep it.
//! - Title matching is case-insensitive and uses `Task::title_key()`.
//! - Read paths return owned copies, never references into the collection.
//! - `add` calls `Task::validate()` before mutating.

use crate::model::task::{Task, TaskState, TaskValidationError};
use thiserror::Error;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task mutation and lookup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RepoError {
    /// Task failed `Task::validate()`.
    #[error(transparent)]
    InvalidTask(#[from] TaskValidationError),
    /// Another task already uses this title (ignoring case).
    #[error("a task titled '{0}' already exists")]
    DuplicateTitle(String),
    /// No task matches the given title.
    #[error("task '{0}' was not found")]
    NotFound(String),
}

impl RepoError {
    /// Rejected input; the collection is unchanged.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidTask(_) | Self::DuplicateTitle(_))
    }

    /// Referenced title does not exist; the collection is unchanged.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Repository interface for task CRUD and queries.
pub trait TaskRepository {
    /// Appends `task` unless its title is blank or already taken.
    fn add(&mut self, task: Task) -> RepoResult<()>;
    /// Removes the first task matching `title`.
    fn remove(&mut self, title: &str) -> RepoResult<()>;
    /// Sets the state of the task matching `title` in place.
    fn set_state(&mut self, title: &str, state: TaskState) -> RepoResult<()>;
    /// Returns a copy of every task in insertion order.
    fn list_all(&self) -> Vec<Task>;
    /// Returns a copy of the first task matching `title`.
    fn find_by_title(&self, title: &str) -> RepoResult<Task>;
    /// Returns copies of the tasks in `state`, insertion order kept.
    fn list_by_state(&self, state: TaskState) -> Vec<Task>;
    fn count(&self) -> usize;
    /// Discards the collection and installs `tasks` as-is. Load path only.
    fn replace_all(&mut self, tasks: Vec<Task>);
}

/// Vec-backed task repository for single-session use.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    tasks: Vec<Task>,
}

impl InMemoryTaskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, title: &str) -> Option<usize> {
        self.tasks.iter().position(|task| task.matches_title(title))
    }
}

impl TaskRepository for InMemoryTaskRepository {
    fn add(&mut self, task: Task) -> RepoResult<()> {
        task.validate()?;

        if self.position(task.title()).is_some() {
            return Err(RepoError::DuplicateTitle(task.title().to_string()));
        }

        self.tasks.push(task);
        Ok(())
    }

    fn remove(&mut self, title: &str) -> RepoResult<()> {
        let index = self
            .position(title)
            .ok_or_else(|| RepoError::NotFound(title.to_string()))?;
        self.tasks.remove(index);
        Ok(())
    }

    fn set_state(&mut self, title: &str, state: TaskState) -> RepoResult<()> {
        let index = self
            .position(title)
            .ok_or_else(|| RepoError::NotFound(title.to_string()))?;
        self.tasks[index].set_state(state);
        Ok(())
    }

    fn list_all(&self) -> Vec<Task> {
        self.tasks.clone()
    }

    fn find_by_title(&self, title: &str) -> RepoResult<Task> {
        self.position(title)
            .map(|index| self.tasks[index].clone())
            .ok_or_else(|| RepoError::NotFound(title.to_string()))
    }

    fn list_by_state(&self, state: TaskState) -> Vec<Task> {
        self.tasks
            .iter()
            .filter(|task| task.state() == state)
            .cloned()
            .collect()
    }

    fn count(&self) -> usize {
        self.tasks.len()
    }

    fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }
}
