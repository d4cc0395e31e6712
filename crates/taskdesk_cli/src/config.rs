//! Command-line configuration.
//!
//! # Responsibility
//! - Parse shell arguments with defaults for the data, report and log paths.
//! - Resolve relative paths against the working directory.

use clap::Parser;
use std::path::{Path, PathBuf};
use taskdesk_core::default_log_level;

pub const DEFAULT_DATA_FILE: &str = "data/tasks.xml";
pub const DEFAULT_REPORT_FILE: &str = "data/report.html";
pub const DEFAULT_LOG_DIR: &str = "data/logs";

/// Interactive single-user task tracker.
#[derive(Debug, Parser)]
#[command(name = "taskdesk", version, about)]
pub struct Args {
    /// XML file used by the save and load actions.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_DATA_FILE)]
    pub data_file: PathBuf,

    /// HTML file written by the report action.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORT_FILE)]
    pub report_file: PathBuf,

    /// Log level: trace, debug, info, warn or error.
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotating log files.
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

/// Resolved shell configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub data_file: PathBuf,
    pub report_file: PathBuf,
    pub log_level: String,
    pub log_dir: PathBuf,
}

impl ShellConfig {
    /// Applies defaults and makes the log directory absolute relative to `cwd`.
    pub fn from_args(args: Args, cwd: &Path) -> Self {
        let log_dir = args
            .log_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));
        let log_dir = if log_dir.is_absolute() {
            log_dir
        } else {
            cwd.join(log_dir)
        };

        Self {
            data_file: args.data_file,
            report_file: args.report_file,
            log_level: args
                .log_level
                .unwrap_or_else(|| default_log_level().to_string()),
            log_dir,
        }
    }
}
