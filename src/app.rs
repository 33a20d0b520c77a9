use std::fmt;

use crate::console::Console;
use crate::error::{AppResult, InputError};
use crate::model::{NewTask, Task};
use crate::store::TaskStore;

const RULE_WIDTH: usize = 40;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum AppState {
    Display,
    Add,
    Delete,
    Toggle,
    Exit,
}

/// Outcome of one flow, shown to the user before returning to the task list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    TaskAdded(usize),
    TaskDeleted(usize),
    StatusChanged(usize),
    DeleteCancelled,
    NothingToDelete,
    NothingToToggle,
    InvalidId,
    TaskNotFound,
    InvalidOption,
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Notice::TaskAdded(_) => "Task added successfully.",
            Notice::TaskDeleted(_) => "Task deleted successfully.",
            Notice::StatusChanged(_) => "Task status changed.",
            Notice::DeleteCancelled => "Delete cancelled.",
            Notice::NothingToDelete => "No tasks available to delete.",
            Notice::NothingToToggle => "No tasks available.",
            Notice::InvalidId => "Invalid ID.",
            Notice::TaskNotFound => "Task not found.",
            Notice::InvalidOption => "Invalid option.",
        };
        write!(f, "{}", text)
    }
}

/// Parses a task id the way a user types it: surrounding blanks and a sign are allowed.
pub fn parse_task_id(input: &str) -> Result<i64, InputError> {
    input
        .trim()
        .parse::<i64>()
        .map_err(|_| InputError::MalformedId(input.to_string()))
}

pub struct App<C: Console> {
    store: TaskStore,
    console: C,
    state: AppState,
}

impl<C: Console> App<C> {
    pub fn new(store: TaskStore, console: C) -> Self {
        App {
            store,
            console,
            state: AppState::Display,
        }
    }

    #[cfg(test)]
    pub fn store(&self) -> &TaskStore {
        &self.store
    }

    #[cfg(test)]
    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn run(&mut self) -> AppResult<()> {
        loop {
            self.state = match self.state {
                AppState::Display => self.display()?,
                AppState::Add => {
                    let notice = self.add_task()?;
                    self.acknowledge(&notice)?;
                    AppState::Display
                }
                AppState::Delete => {
                    let notice = self.delete_task()?;
                    self.acknowledge(&notice)?;
                    AppState::Display
                }
                AppState::Toggle => {
                    let notice = self.toggle_task()?;
                    self.acknowledge(&notice)?;
                    AppState::Display
                }
                AppState::Exit => break,
            };
        }
        log::info!("Leaving with {} task(s) in memory", self.store.len());
        Ok(())
    }

    fn display(&mut self) -> AppResult<AppState> {
        self.console.clear()?;
        self.draw_tasks()?;

        self.console.println("")?;
        self.console.println("==== COMMANDS ====")?;
        self.console.println("1. Add Task")?;
        self.console.println("2. Delete Task")?;
        self.console.println("3. Mark/Unmark Completed")?;
        self.console.println("0. Exit")?;
        self.console.print("Select an option: ")?;

        let choice = match self.console.read_line()? {
            Some(choice) => choice,
            None => {
                log::info!("Input closed, exiting");
                return Ok(AppState::Exit);
            }
        };
        log::trace!("Menu choice {:?}", choice);

        Ok(match choice.as_str() {
            "1" => AppState::Add,
            "2" => AppState::Delete,
            "3" => AppState::Toggle,
            "0" => AppState::Exit,
            _ => {
                log::debug!("Unknown menu choice {:?}", choice);
                self.acknowledge(&Notice::InvalidOption)?;
                AppState::Display
            }
        })
    }

    fn draw_tasks(&mut self) -> AppResult<()> {
        self.console.println("==== TASKS ====")?;
        self.console.println("")?;

        if self.store.is_empty() {
            self.console.println("No tasks yet.")?;
            return Ok(());
        }

        let rule = "-".repeat(RULE_WIDTH);
        for task in self.store.list() {
            for line in task_details(task) {
                self.console.println(&line)?;
            }
            self.console.println(&rule)?;
        }
        Ok(())
    }

    fn add_task(&mut self) -> AppResult<Notice> {
        self.console.clear()?;
        self.console.println("== Add Task ==")?;

        let course_title = self.prompt("Course title (e.g., Programming Languages): ")?;
        let task_type = self.prompt("Task Type (Quiz, Project, Exam, etc.): ")?;
        let label = self.prompt("Label (short name, e.g., MP4, Quiz 1): ")?;
        let due_date = self.prompt("Due date (MM-DD-YYYY) or leave empty: ")?;

        let task = self
            .store
            .add(NewTask::new(course_title, task_type, label, due_date));
        Ok(Notice::TaskAdded(task.id))
    }

    fn delete_task(&mut self) -> AppResult<Notice> {
        self.console.clear()?;
        self.console.println("== Delete Task ==")?;

        if self.store.is_empty() {
            return Ok(Notice::NothingToDelete);
        }

        for task in self.store.list() {
            self.console
                .println(&format!("ID: {} | Label: {}", task.id, task.label))?;
        }

        let (id, label) = match self.prompt_for_task("\nEnter Task ID to delete: ")? {
            Ok(task) => (task.id, task.label.clone()),
            Err(notice) => return Ok(notice),
        };

        let answer = self.prompt(&format!(
            "Are you sure you want to delete \"{}\"? (Y/N): ",
            label
        ))?;
        if answer.trim().to_uppercase() != "Y" {
            log::debug!("Delete of task {} declined", id);
            return Ok(Notice::DeleteCancelled);
        }

        Ok(match self.store.delete(id) {
            Ok(task) => Notice::TaskDeleted(task.id),
            Err(_) => Notice::TaskNotFound,
        })
    }

    fn toggle_task(&mut self) -> AppResult<Notice> {
        self.console.clear()?;
        self.console.println("== Mark/Unmark Completed ==")?;

        if self.store.is_empty() {
            return Ok(Notice::NothingToToggle);
        }

        for task in self.store.list() {
            self.console.println(&format!(
                "ID: {} | [{}] | {}",
                task.id,
                task.status(),
                task.label
            ))?;
        }

        let id = match self.prompt_for_task("\nEnter Task ID to change status: ")? {
            Ok(task) => task.id,
            Err(notice) => return Ok(notice),
        };

        Ok(match self.store.toggle_completed(id) {
            Ok(task) => Notice::StatusChanged(task.id),
            Err(_) => Notice::TaskNotFound,
        })
    }

    /// Asks for an id and resolves it, mapping malformed and unknown ids to their notices.
    fn prompt_for_task(&mut self, text: &str) -> AppResult<Result<&Task, Notice>> {
        let input = self.prompt(text)?;
        let id = match parse_task_id(&input) {
            Ok(id) => id,
            Err(err) => {
                log::debug!("{}", err);
                return Ok(Err(Notice::InvalidId));
            }
        };

        Ok(usize::try_from(id)
            .ok()
            .and_then(|id| self.store.find_by_id(id))
            .ok_or(Notice::TaskNotFound))
    }

    fn prompt(&mut self, text: &str) -> AppResult<String> {
        self.console.print(text)?;
        Ok(self.console.read_line()?.unwrap_or_default())
    }

    fn acknowledge(&mut self, notice: &Notice) -> AppResult<()> {
        match notice {
            Notice::TaskAdded(id) => {
                log::info!("Added task {}", id);
                self.console.println("")?;
            }
            Notice::TaskDeleted(id) => log::info!("Deleted task {}", id),
            Notice::StatusChanged(id) => log::info!("Changed status of task {}", id),
            _ => {}
        }
        self.console.println(&notice.to_string())?;
        self.console.println("Press any key to continue...")?;
        self.console.wait_for_key()?;
        Ok(())
    }
}

fn task_details(task: &Task) -> Vec<String> {
    let mut lines = vec![
        format!("ID: {} [{}]", task.id, task.status()),
        format!("Course: {}", task.course_title),
        format!("Type:   {}", task.task_type),
        format!("Label:  {}", task.label),
        format!("Due:    {}", task.due_date),
    ];
    if let Some(completed_at) = task.completed_at {
        lines.push(format!("Done:   {}", completed_at.format("%Y-%m-%d %H:%M")));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::scripted::ScriptedConsole;
    use rstest::rstest;

    fn app_with(tasks: &[&str], lines: &[&str]) -> App<ScriptedConsole> {
        let mut store = TaskStore::new();
        for label in tasks {
            store.add(NewTask::new("CS101", "Quiz", *label, ""));
        }
        App::new(store, ScriptedConsole::new(lines))
    }

    fn ids(app: &App<ScriptedConsole>) -> Vec<usize> {
        app.store().list().iter().map(|task| task.id).collect()
    }

    #[rstest]
    #[case("7", Ok(7))]
    #[case("  12 ", Ok(12))]
    #[case("-3", Ok(-3))]
    #[case("abc", Err(InputError::MalformedId("abc".to_string())))]
    #[case("", Err(InputError::MalformedId("".to_string())))]
    #[case("1.5", Err(InputError::MalformedId("1.5".to_string())))]
    fn parses_task_ids(#[case] input: &str, #[case] expected: Result<i64, InputError>) {
        assert_eq!(parse_task_id(input), expected);
    }

    #[rstest]
    fn add_flow_collects_fields_in_order() {
        let mut app = app_with(&[], &["CS101", "Quiz", "Q1", ""]);

        assert_eq!(app.add_task().unwrap(), Notice::TaskAdded(1));

        let task = &app.store().list()[0];
        assert_eq!(task.course_title, "CS101");
        assert_eq!(task.task_type, "Quiz");
        assert_eq!(task.label, "Q1");
        assert_eq!(task.due_date, "N/A");
        assert!(!task.is_completed);
    }

    #[rstest]
    fn add_flow_treats_closed_input_as_empty_fields() {
        let mut app = app_with(&[], &["Physics"]);

        assert_eq!(app.add_task().unwrap(), Notice::TaskAdded(1));
        let task = &app.store().list()[0];
        assert_eq!(task.course_title, "Physics");
        assert_eq!(task.label, "");
        assert_eq!(task.due_date, "N/A");
    }

    #[rstest]
    fn delete_with_confirmation_removes_task() {
        let mut app = app_with(&["first", "second"], &["1", "Y"]);

        assert_eq!(app.delete_task().unwrap(), Notice::TaskDeleted(1));
        assert_eq!(ids(&app), vec![2]);
        assert!(app
            .console()
            .output
            .contains("Are you sure you want to delete \"first\"? (Y/N): "));
    }

    #[rstest]
    #[case(" y ")]
    #[case("Y")]
    fn delete_confirmation_is_trimmed_and_case_insensitive(#[case] answer: &str) {
        let mut app = app_with(&["only"], &["1", answer]);

        assert_eq!(app.delete_task().unwrap(), Notice::TaskDeleted(1));
        assert!(app.store().is_empty());
    }

    #[rstest]
    #[case("N")]
    #[case("yes")]
    #[case("")]
    fn declined_confirmation_keeps_task(#[case] answer: &str) {
        let mut app = app_with(&["only"], &["1", answer]);

        assert_eq!(app.delete_task().unwrap(), Notice::DeleteCancelled);
        assert_eq!(ids(&app), vec![1]);
    }

    #[rstest]
    fn delete_on_empty_store_asks_nothing() {
        let mut app = app_with(&[], &["1"]);

        assert_eq!(app.delete_task().unwrap(), Notice::NothingToDelete);
        assert!(app.store().is_empty());
        assert_eq!(app.console().remaining_input(), 1);
    }

    #[rstest]
    #[case("x", Notice::InvalidId)]
    #[case("99", Notice::TaskNotFound)]
    #[case("-1", Notice::TaskNotFound)]
    fn delete_rejects_bad_ids(#[case] input: &str, #[case] expected: Notice) {
        let mut app = app_with(&["a"], &[input, "Y"]);

        assert_eq!(app.delete_task().unwrap(), expected);
        assert_eq!(ids(&app), vec![1]);
        assert_eq!(app.console().remaining_input(), 1);
    }

    #[rstest]
    fn delete_lists_ids_and_labels() {
        let mut app = app_with(&["Q1", "MP4"], &["5"]);
        app.delete_task().unwrap();

        let output = &app.console().output;
        assert!(output.contains("ID: 1 | Label: Q1\n"));
        assert!(output.contains("ID: 2 | Label: MP4\n"));
    }

    #[rstest]
    fn toggle_flips_status_back_and_forth() {
        let mut app = app_with(&["a"], &["1", "1"]);

        assert_eq!(app.toggle_task().unwrap(), Notice::StatusChanged(1));
        assert!(app.store().list()[0].is_completed);

        assert_eq!(app.toggle_task().unwrap(), Notice::StatusChanged(1));
        assert!(!app.store().list()[0].is_completed);
        assert!(app.console().output.contains("ID: 1 | [Completed] | a"));
    }

    #[rstest]
    #[case("nope", Notice::InvalidId)]
    #[case("99", Notice::TaskNotFound)]
    fn toggle_rejects_bad_ids(#[case] input: &str, #[case] expected: Notice) {
        let mut app = app_with(&["a"], &[input]);

        assert_eq!(app.toggle_task().unwrap(), expected);
        assert!(!app.store().list()[0].is_completed);
    }

    #[rstest]
    fn toggle_on_empty_store() {
        let mut app = app_with(&[], &[]);
        assert_eq!(app.toggle_task().unwrap(), Notice::NothingToToggle);
    }

    #[rstest]
    fn run_exits_on_zero() {
        let mut app = app_with(&[], &["0", "1"]);
        app.run().unwrap();

        let console = app.console();
        assert!(console.output.contains("No tasks yet.\n"));
        assert!(console.output.contains("Select an option: "));
        assert_eq!(console.remaining_input(), 1);
        assert_eq!(console.pauses, 0);
    }

    #[rstest]
    fn run_exits_when_input_closes() {
        let mut app = app_with(&[], &[]);
        app.run().unwrap();
        assert_eq!(app.console().clears, 1);
    }

    #[rstest]
    fn invalid_option_pauses_and_redisplays() {
        let mut app = app_with(&["a"], &["7", "0"]);
        app.run().unwrap();

        let console = app.console();
        assert!(console.output.contains("Invalid option.\nPress any key to continue...\n"));
        assert_eq!(console.pauses, 1);
        assert_eq!(console.clears, 2);
        assert_eq!(ids(&app), vec![1]);
    }

    #[rstest]
    fn run_drives_a_full_session() {
        let mut app = app_with(
            &[],
            &[
                "1", "CS101", "Quiz", "Q1", "", // add id 1
                "1", "CS102", "Exam", "Final", "12-15-2025", // add id 2
                "3", "2", // toggle 2
                "2", "1", "y", // delete 1
                "0",
            ],
        );
        app.run().unwrap();

        let tasks = app.store().list();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, 2);
        assert_eq!(tasks[0].due_date, "12-15-2025");
        assert!(tasks[0].is_completed);

        let console = app.console();
        assert_eq!(console.pauses, 4);
        assert!(console.output.contains("\nTask added successfully.\n"));
        assert!(console.output.contains("Task status changed.\n"));
        assert!(console.output.contains("Task deleted successfully.\n"));
    }

    #[rstest]
    fn task_list_shows_details_and_completion_date() {
        let mut store = TaskStore::new();
        store.add(NewTask::new("CS101", "Quiz", "Q1", ""));
        let done = store.toggle_completed(1).unwrap().clone();

        let lines = task_details(&done);
        assert_eq!(lines[0], "ID: 1 [Completed]");
        assert_eq!(lines[1], "Course: CS101");
        assert_eq!(lines[2], "Type:   Quiz");
        assert_eq!(lines[3], "Label:  Q1");
        assert_eq!(lines[4], "Due:    N/A");
        assert!(lines[5].starts_with("Done:   "));

        store.toggle_completed(1).unwrap();
        assert_eq!(task_details(&store.list()[0]).len(), 5);
    }
}
