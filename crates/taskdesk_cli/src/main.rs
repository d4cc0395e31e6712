//! Task desk interactive entry point.
//!
//! # Responsibility
//! - Parse configuration, start logging, and run the menu on stdin/stdout.
//! - Keep all task semantics inside `taskdesk_core`.

mod config;
mod shell;

use clap::Parser;
use config::{Args, ShellConfig};
use log::error;
use shell::Shell;
use std::io;
use std::process::ExitCode;
use taskdesk_core::{init_logging, InMemoryTaskRepository, TaskService};

fn main() -> ExitCode {
    let args = Args::parse();
    let cwd = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(err) => {
            eprintln!("taskdesk: cannot resolve working directory: {err}");
            return ExitCode::FAILURE;
        }
    };
    let config = ShellConfig::from_args(args, &cwd);

    // Logging is optional for an interactive session; warn and keep going.
    if let Err(err) = init_logging(&config.log_level, &config.log_dir) {
        eprintln!("taskdesk: logging disabled: {err}");
    }

    let mut service = TaskService::new(InMemoryTaskRepository::new());
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut shell = Shell::new(&mut service, &config, stdin.lock(), stdout.lock());

    match shell.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=shell_io module=shell status=error");
            eprintln!("taskdesk: terminal i/o failed: {err}");
            ExitCode::FAILURE
        }
    }
}
