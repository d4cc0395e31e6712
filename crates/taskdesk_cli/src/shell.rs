//! Interactive text menu.
//!
//! # Responsibility
//! - Collect field values from the user and call `TaskService`.
//! - Present results and errors; the core never prints.
//!
//! # Invariants
//! - A failed action prints one `Error:` line and the loop continues.
//! - End of input behaves like the exit option.
//! - Log events carry counts and error kinds only, never task text.

use crate::config::ShellConfig;
use log::{info, warn};
use std::io::{self, BufRead, Write};
use taskdesk_core::{Priority, ServiceError, TaskRepository, TaskService, TaskState};

const RULE: &str = "==============================================";

/// Menu loop over any line-based input and output.
pub struct Shell<'a, T: TaskRepository, R: BufRead, W: Write> {
    service: &'a mut TaskService<T>,
    config: &'a ShellConfig,
    input: R,
    output: W,
}

impl<'a, T: TaskRepository, R: BufRead, W: Write> Shell<'a, T, R, W> {
    pub fn new(
        service: &'a mut TaskService<T>,
        config: &'a ShellConfig,
        input: R,
        output: W,
    ) -> Self {
        Self {
            service,
            config,
            input,
            output,
        }
    }

    /// Runs until the exit option or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "          TASK DESK {}", taskdesk_core::core_version())?;
        writeln!(self.output, "{RULE}")?;

        loop {
            self.print_menu()?;
            let Some(line) = self.read_line()? else {
                break;
            };

            match parse_choice(&line) {
                Some(1) => self.add_task()?,
                Some(2) => self.list_tasks()?,
                Some(3) => self.remove_task()?,
                Some(4) => self.change_state()?,
                Some(5) => self.save()?,
                Some(6) => self.load()?,
                Some(7) => self.report()?,
                Some(0) => break,
                _ => writeln!(self.output, "\nInvalid option. Please try again.")?,
            }
        }

        writeln!(self.output, "\nGoodbye.")?;
        info!("event=shell_exit module=shell status=ok count={}", self.service.count());
        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "                 MAIN MENU")?;
        writeln!(self.output, "{RULE}")?;
        writeln!(self.output, "1 - Add a task")?;
        writeln!(self.output, "2 - List all tasks")?;
        writeln!(self.output, "3 - Remove a task by title")?;
        writeln!(self.output, "4 - Change the state of a task")?;
        writeln!(self.output, "5 - Save tasks to {}", self.config.data_file.display())?;
        writeln!(self.output, "6 - Load tasks from {}", self.config.data_file.display())?;
        writeln!(self.output, "7 - Generate HTML report")?;
        writeln!(self.output, "0 - Exit")?;
        write!(self.output, "\nChoose an option: ")?;
        self.output.flush()
    }

    fn add_task(&mut self) -> io::Result<()> {
        let Some(title) = self.prompt_required("Title")? else {
            return Ok(());
        };
        let Some(description) = self.prompt_required("Description")? else {
            return Ok(());
        };

        writeln!(self.output, "\nPriority:")?;
        writeln!(self.output, "1 - High")?;
        writeln!(self.output, "2 - Medium")?;
        writeln!(self.output, "3 - Low")?;
        let choice = self.prompt("Choose")?.and_then(|line| parse_choice(&line));
        let priority = match choice {
            Some(1) => Priority::High,
            Some(2) => Priority::Medium,
            Some(3) => Priority::Low,
            _ => {
                writeln!(
                    self.output,
                    "Invalid priority. Defaulting to {}.",
                    Priority::Medium
                )?;
                Priority::Medium
            }
        };

        match self.service.create_task(title, description, priority) {
            Ok(()) => {
                info!(
                    "event=task_added module=shell status=ok priority={} count={}",
                    priority.label(),
                    self.service.count()
                );
                writeln!(self.output, "\nTask added.")
            }
            Err(err) => self.report_error("task_add", &err),
        }
    }

    fn list_tasks(&mut self) -> io::Result<()> {
        let tasks = self.service.list_tasks();

        writeln!(self.output, "\n{RULE}")?;
        writeln!(self.output, "                 TASKS")?;
        writeln!(self.output, "{RULE}")?;

        if tasks.is_empty() {
            return writeln!(self.output, "No tasks recorded.");
        }

        for task in &tasks {
            writeln!(self.output, "- {task}")?;
        }
        writeln!(self.output, "\nTotal: {} task(s).", tasks.len())
    }

    fn remove_task(&mut self) -> io::Result<()> {
        if self.service.count() == 0 {
            return writeln!(self.output, "\nThere are no tasks to remove.");
        }

        self.list_tasks()?;
        let Some(title) = self.prompt_required("\nExact title of the task to remove")? else {
            return Ok(());
        };

        match self.service.remove_task(&title) {
            Ok(()) => {
                info!(
                    "event=task_removed module=shell status=ok count={}",
                    self.service.count()
                );
                writeln!(self.output, "Task removed.")
            }
            Err(err) => self.report_error("task_remove", &err),
        }
    }

    fn change_state(&mut self) -> io::Result<()> {
        if self.service.count() == 0 {
            return writeln!(self.output, "\nThere are no tasks to update.");
        }

        self.list_tasks()?;
        let Some(title) = self.prompt_required("\nExact title of the task to update")? else {
            return Ok(());
        };

        writeln!(self.output, "\nNew state:")?;
        writeln!(self.output, "1 - Pending")?;
        writeln!(self.output, "2 - In progress")?;
        writeln!(self.output, "3 - Done")?;
        let choice = self.prompt("Choose")?.and_then(|line| parse_choice(&line));
        let state = match choice {
            Some(1) => TaskState::Pending,
            Some(2) => TaskState::InProgress,
            Some(3) => TaskState::Done,
            _ => {
                writeln!(
                    self.output,
                    "Invalid option. Defaulting to {}.",
                    TaskState::Pending
                )?;
                TaskState::Pending
            }
        };

        match self.service.set_state(&title, state) {
            Ok(()) => {
                info!(
                    "event=task_state_changed module=shell status=ok state={}",
                    state.label()
                );
                writeln!(self.output, "State updated.")
            }
            Err(err) => self.report_error("task_state_change", &err),
        }
    }

    fn save(&mut self) -> io::Result<()> {
        let path = self.config.data_file.clone();
        match self.service.save_to(&path) {
            Ok(()) => {
                info!(
                    "event=tasks_saved module=shell status=ok count={}",
                    self.service.count()
                );
                writeln!(self.output, "\nTasks saved to '{}'.", path.display())
            }
            Err(err) => self.report_error("tasks_save", &err),
        }
    }

    fn load(&mut self) -> io::Result<()> {
        let path = self.config.data_file.clone();
        match self.service.load_from(&path) {
            Ok(count) => {
                info!("event=tasks_loaded module=shell status=ok count={count}");
                writeln!(self.output, "\nTasks loaded. Total: {count}")
            }
            Err(err) => self.report_error("tasks_load", &err),
        }
    }

    fn report(&mut self) -> io::Result<()> {
        let path = self.config.report_file.clone();
        match self.service.write_report(&path) {
            Ok(()) => {
                info!(
                    "event=report_written module=shell status=ok count={}",
                    self.service.count()
                );
                writeln!(self.output, "\nReport written to '{}'.", path.display())
            }
            Err(err) => self.report_error("report_write", &err),
        }
    }

    fn report_error(&mut self, event: &str, err: &ServiceError) -> io::Result<()> {
        warn!(
            "event={event} module=shell status=error kind={}",
            error_kind(err)
        );
        writeln!(self.output, "\nError: {err}")
    }

    /// Prompts for a value that must not be blank.
    fn prompt_required(&mut self, label: &str) -> io::Result<Option<String>> {
        let value = self.prompt(label)?;
        match value {
            Some(value) if !value.is_empty() => Ok(Some(value)),
            Some(_) => {
                let field = label.trim().to_lowercase();
                writeln!(self.output, "The {field} must not be empty.")?;
                Ok(None)
            }
            None => Ok(None),
        }
    }

    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads one trimmed line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}

fn parse_choice(line: &str) -> Option<u32> {
    line.trim().parse().ok()
}

fn error_kind(err: &ServiceError) -> &'static str {
    match err {
        ServiceError::Repo(repo) if repo.is_validation() => "validation",
        ServiceError::Repo(_) => "not_found",
        ServiceError::Store(store) if store.is_io() => "io",
        ServiceError::Store(_) => "serialization",
        ServiceError::Report(taskdesk_core::ReportError::Io { .. }) => "io",
        ServiceError::Report(_) => "serialization",
    }
}

#[cfg(test)]
mod tests {
    use super::Shell;
    use crate::config::ShellConfig;
    use std::io::Cursor;
    use taskdesk_core::{InMemoryTaskRepository, Priority, TaskService, TaskState};

    fn config_in(dir: &std::path::Path) -> ShellConfig {
        ShellConfig {
            data_file: dir.join("data/tasks.xml"),
            report_file: dir.join("data/report.html"),
            log_level: "info".to_string(),
            log_dir: dir.join("logs"),
        }
    }

    fn run_script(
        service: &mut TaskService<InMemoryTaskRepository>,
        config: &ShellConfig,
        script: &str,
    ) -> String {
        let mut output = Vec::new();
        Shell::new(service, config, Cursor::new(script.to_string()), &mut output)
            .run()
            .unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn add_then_list_shows_task() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());

        let output = run_script(&mut service, &config, "1\nBuy milk\n2% fat\n3\n2\n0\n");

        assert!(output.contains("Task added."));
        assert!(output.contains("- Buy milk (LOW, PENDING)"));
        assert!(output.contains("Total: 1 task(s)."));
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn invalid_priority_defaults_to_medium() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());

        let output = run_script(&mut service, &config, "1\nWrite report\ndraft\n9\n0\n");

        assert!(output.contains("Defaulting to MEDIUM"));
        let task = service.find_task("write report").unwrap();
        assert_eq!(task.priority(), Priority::Medium);
    }

    #[test]
    fn blank_title_is_rejected_before_reaching_core() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());

        let output = run_script(&mut service, &config, "1\n   \n0\n");

        assert!(output.contains("The title must not be empty."));
        assert_eq!(service.count(), 0);
    }

    #[test]
    fn duplicate_title_prints_error_and_keeps_running() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());
        service.create_task("Buy milk", "2% fat", Priority::Low).unwrap();

        let output = run_script(&mut service, &config, "1\nBUY MILK\nagain\n1\n2\n0\n");

        assert!(output.contains("Error: a task titled 'BUY MILK' already exists"));
        assert!(output.contains("Total: 1 task(s)."));
    }

    #[test]
    fn change_state_and_remove_use_case_insensitive_titles() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());
        service.create_task("Fix bug", "crash on start", Priority::High).unwrap();
        service.create_task("Read book", "chapter 3", Priority::Low).unwrap();

        let output = run_script(&mut service, &config, "4\nfix BUG\n3\n3\nread book\n0\n");

        assert!(output.contains("State updated."));
        assert!(output.contains("Task removed."));
        assert_eq!(service.count(), 1);
        assert_eq!(service.find_task("Fix bug").unwrap().state(), TaskState::Done);
    }

    #[test]
    fn remove_unknown_title_reports_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());
        service.create_task("Fix bug", "crash", Priority::High).unwrap();

        let output = run_script(&mut service, &config, "3\nmissing\n0\n");

        assert!(output.contains("Error: task 'missing' was not found"));
        assert_eq!(service.count(), 1);
    }

    #[test]
    fn remove_on_empty_collection_is_refused() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());

        let output = run_script(&mut service, &config, "3\n0\n");

        assert!(output.contains("There are no tasks to remove."));
    }

    #[test]
    fn save_load_and_report_write_configured_files() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());
        service.create_task("Buy milk", "2% fat", Priority::Low).unwrap();

        let output = run_script(&mut service, &config, "5\n7\n");
        assert!(output.contains("Tasks saved to"));
        assert!(output.contains("Report written to"));
        assert!(config.data_file.exists());
        assert!(config.report_file.exists());

        let mut fresh = TaskService::new(InMemoryTaskRepository::new());
        let output = run_script(&mut fresh, &config, "6\n0\n");
        assert!(output.contains("Tasks loaded. Total: 1"));
        assert_eq!(fresh.find_task("buy milk").unwrap().title(), "Buy milk");
    }

    #[test]
    fn unknown_option_and_end_of_input_exit_cleanly() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        let mut service = TaskService::new(InMemoryTaskRepository::new());

        let output = run_script(&mut service, &config, "abc\n");

        assert!(output.contains("Invalid option. Please try again."));
        assert!(output.ends_with("Goodbye.\n"));
    }
}
