//! HTML report renderer.
//!
//! # Responsibility
//! - Group tasks by state and order each group by priority.
//! - Render the grouped view through the embedded `report.html` template.
//!
//! # Invariants
//! - Sections always appear as Pending, In progress, Done.
//! - Within a section, tasks are stably sorted `High < Medium < Low`.
//! - Task text is HTML-escaped by the template environment.

use crate::model::task::{format_timestamp, Task, TaskState};
use chrono::{Local, NaiveDateTime};
use minijinja::Environment;
use once_cell::sync::Lazy;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const REPORT_TEMPLATE_NAME: &str = "report.html";
const REPORT_TEMPLATE: &str = include_str!("report.html");

static REPORT_ENV: Lazy<Environment<'static>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_lstrip_blocks(true);
    env.add_template(REPORT_TEMPLATE_NAME, REPORT_TEMPLATE)
        .expect("valid report template");
    env
});

pub type ReportResult<T> = Result<T, ReportError>;

/// Error for report rendering and output.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to render report: {0}")]
    Template(#[from] minijinja::Error),
    #[error("failed to write report `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct ReportContext {
    generated_at: String,
    sections: Vec<ReportSection>,
}

#[derive(Debug, Serialize)]
struct ReportSection {
    heading: &'static str,
    empty_notice: &'static str,
    entries: Vec<ReportEntry>,
}

#[derive(Debug, Serialize)]
struct ReportEntry {
    priority: &'static str,
    color: &'static str,
    title: String,
    description: String,
    created_at: String,
}

impl From<&Task> for ReportEntry {
    fn from(task: &Task) -> Self {
        Self {
            priority: task.priority().label(),
            color: task.priority().color(),
            title: task.title().to_string(),
            description: task.description().to_string(),
            created_at: format_timestamp(task.created_at()),
        }
    }
}

/// Splits `tasks` by state in report order, each group sorted by priority.
pub fn group_for_report(tasks: &[Task]) -> Vec<(TaskState, Vec<&Task>)> {
    TaskState::ALL
        .into_iter()
        .map(|state| {
            let mut group: Vec<&Task> = tasks.iter().filter(|task| task.state() == state).collect();
            group.sort_by_key(|task| task.priority());
            (state, group)
        })
        .collect()
}

/// Renders the report document for `tasks`, stamped with `generated_at`.
pub fn render_report(tasks: &[Task], generated_at: NaiveDateTime) -> ReportResult<String> {
    let sections = group_for_report(tasks)
        .into_iter()
        .map(|(state, group)| {
            let (heading, empty_notice) = section_text(state);
            ReportSection {
                heading,
                empty_notice,
                entries: group.into_iter().map(ReportEntry::from).collect(),
            }
        })
        .collect();

    let context = ReportContext {
        generated_at: format_timestamp(generated_at),
        sections,
    };

    let template = REPORT_ENV.get_template(REPORT_TEMPLATE_NAME)?;
    Ok(template.render(&context)?)
}

/// Renders the report stamped with the current local time and writes it to
/// `path`, creating missing parent directories.
pub fn write_report(path: &Path, tasks: &[Task]) -> ReportResult<()> {
    let document = render_report(tasks, Local::now().naive_local())?;

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, document).map_err(|source| ReportError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn section_text(state: TaskState) -> (&'static str, &'static str) {
    match state {
        TaskState::Pending => ("Pending Tasks", "No pending tasks."),
        TaskState::InProgress => ("Tasks In Progress", "No tasks in progress."),
        TaskState::Done => ("Completed Tasks", "No completed tasks."),
    }
}
