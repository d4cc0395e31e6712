//! Task use-case service.
//!
//! # Responsibility
//! - Provide the entry points the interactive shell calls.
//! - Bridge the repository with the XML store and the HTML report.
//!
//! # Invariants
//! - Service APIs never bypass repository validation.
//! - Store and report only ever see snapshots from `list_all()`.
//! - `load_from` replaces the collection only after the whole file decoded.

use crate::model::task::{Priority, Task, TaskState};
use crate::report::html::{write_report, ReportError};
use crate::repo::task_repo::{RepoError, TaskRepository};
use crate::store::xml_store::{load_tasks, save_tasks, StoreError};
use std::path::Path;
use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Error surfaced to shell callers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Repo(#[from] RepoError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Use-case service wrapper around one task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a fresh pending task and adds it.
    ///
    /// # Contract
    /// - Sets `state = TaskState::Pending` and `created_at = now`.
    /// - Fails with a validation error for blank or duplicate titles.
    pub fn create_task(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
    ) -> ServiceResult<()> {
        self.add_task(Task::new(title, description, priority))
    }

    pub fn add_task(&mut self, task: Task) -> ServiceResult<()> {
        Ok(self.repo.add(task)?)
    }

    pub fn remove_task(&mut self, title: &str) -> ServiceResult<()> {
        Ok(self.repo.remove(title)?)
    }

    pub fn set_state(&mut self, title: &str, state: TaskState) -> ServiceResult<()> {
        Ok(self.repo.set_state(title, state)?)
    }

    pub fn find_task(&self, title: &str) -> ServiceResult<Task> {
        Ok(self.repo.find_by_title(title)?)
    }

    pub fn list_tasks(&self) -> Vec<Task> {
        self.repo.list_all()
    }

    pub fn list_by_state(&self, state: TaskState) -> Vec<Task> {
        self.repo.list_by_state(state)
    }

    pub fn count(&self) -> usize {
        self.repo.count()
    }

    /// Saves the current collection to `path`.
    pub fn save_to(&self, path: &Path) -> ServiceResult<()> {
        Ok(save_tasks(path, &self.repo.list_all())?)
    }

    /// Replaces the collection with the tasks stored at `path`.
    ///
    /// Returns the number of loaded tasks. A missing file loads as empty.
    /// On error the current collection is left untouched.
    pub fn load_from(&mut self, path: &Path) -> ServiceResult<usize> {
        let loaded = load_tasks(path)?;
        let count = loaded.len();
        self.repo.replace_all(loaded);
        Ok(count)
    }

    /// Writes the HTML report for the current collection to `path`.
    pub fn write_report(&self, path: &Path) -> ServiceResult<()> {
        Ok(write_report(path, &self.repo.list_all())?)
    }
}
