use std::time::{Duration, Instant};

use anyhow::Result;
use chrono::Utc;
use ratatui::style::{Color, Style};
use ratatui::widgets::TableState;

use super::constants::*;
use super::form::{FormIntent, TaskForm};
use crate::config::AppConfig;
use crate::core::prompt::{PromptOutcome, TaskSubmission};
use crate::countdown::parse_deadline;
use crate::manager::TaskManager;
use crate::model::{StatusBucket, Task};
use crate::store::SqliteStore;

mod input;
mod render;

#[derive(Debug, Clone)]
struct ViewTab {
    label: &'static str,
    bucket: Option<StatusBucket>,
    description: &'static str,
}

impl ViewTab {
    pub(crate) fn new(
        label: &'static str,
        bucket: Option<StatusBucket>,
        description: &'static str,
    ) -> Self {
        Self {
            label,
            bucket,
            description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum InputMode {
    Normal,
    Form,
    Inspect,
    Help,
    ConfirmDelete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmChoice {
    Yes,
    No,
}

impl ConfirmChoice {
    fn toggle(self) -> Self {
        match self {
            ConfirmChoice::Yes => ConfirmChoice::No,
            ConfirmChoice::No => ConfirmChoice::Yes,
        }
    }
}

#[derive(Debug, Clone)]
struct StatusMessage {
    text: String,
    kind: StatusKind,
    created_at: Instant,
}

impl StatusMessage {
    fn new<T: Into<String>>(text: T, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
            created_at: Instant::now(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            StatusKind::Info => Style::default().fg(Color::Cyan),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StatusKind {
    Info,
    Error,
}

pub(crate) struct App {
    config: AppConfig,
    manager: TaskManager<SqliteStore>,
    first_run: bool,
    tabs: Vec<ViewTab>,
    tab_index: usize,
    visible: Vec<usize>,
    selected: usize,
    table_state: TableState,
    input_mode: InputMode,
    form: Option<TaskForm>,
    status: Option<StatusMessage>,
    inspect_task: Option<Task>,
    confirm_task: Option<Task>,
    confirm_choice: ConfirmChoice,
    should_quit: bool,
}

impl App {
    pub(crate) fn new(config: AppConfig, store: SqliteStore, first_run: bool) -> Result<Self> {
        let tabs = vec![
            ViewTab::new("🗂 All", None, "Every task"),
            ViewTab::new("⏳ Pending", Some(StatusBucket::Pending), "Counting down"),
            ViewTab::new(
                "🔥 Expired",
                Some(StatusBucket::Expired),
                "Past their deadline",
            ),
            ViewTab::new("✅ Done", Some(StatusBucket::Done), "Completed tasks"),
        ];

        let mut app = Self {
            config,
            manager: TaskManager::new(store),
            first_run,
            tabs,
            tab_index: 0,
            visible: Vec::new(),
            selected: 0,
            table_state: TableState::default(),
            input_mode: InputMode::Normal,
            form: None,
            status: None,
            inspect_task: None,
            confirm_task: None,
            confirm_choice: ConfirmChoice::No,
            should_quit: false,
        };
        app.refresh()?;
        Ok(app)
    }

    /// Reload the collection from the store and recompute the visible rows.
    pub(crate) fn refresh(&mut self) -> Result<()> {
        self.manager.load(Utc::now())?;
        self.refresh_visible();
        if self.first_run && !self.manager.is_empty() {
            self.first_run = false;
        }
        Ok(())
    }

    /// Recompute which task indices the active tab shows and clamp the
    /// selection. Countdown ticks can move tasks between buckets, so this
    /// runs every second as well as after every mutation.
    fn refresh_visible(&mut self) {
        let bucket = self.tabs[self.tab_index].bucket;
        let manager = &self.manager;
        let visible: Vec<usize> = manager
            .tasks()
            .iter()
            .enumerate()
            .filter(|(_, task)| match bucket {
                Some(bucket) => manager
                    .board()
                    .status(&task.id)
                    .map(|status| status.bucket() == bucket)
                    .unwrap_or(false),
                None => true,
            })
            .map(|(idx, _)| idx)
            .collect();
        self.visible = visible;

        if self.visible.is_empty() {
            self.selected = 0;
            self.table_state.select(None);
        } else {
            if self.selected >= self.visible.len() {
                self.selected = self.visible.len() - 1;
            }
            self.table_state.select(Some(self.selected));
        }
    }

    pub(crate) fn on_tick(&mut self) {
        self.manager.tick(Utc::now());
        self.refresh_visible();
        if let Some(status) = &self.status {
            if status.created_at.elapsed() > Duration::from_secs(5) {
                self.status = None;
            }
        }
    }

    pub(crate) fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn current_task(&self) -> Option<&Task> {
        self.visible
            .get(self.selected)
            .and_then(|&idx| self.manager.tasks().get(idx))
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.visible.len() - 1);
        self.table_state.select(Some(self.selected));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        }
        self.table_state.select(Some(self.selected));
    }

    fn select_first(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = 0;
        self.table_state.select(Some(0));
    }

    fn select_last(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        self.selected = self.visible.len() - 1;
        self.table_state.select(Some(self.selected));
    }

    fn next_tab(&mut self) {
        self.tab_index = (self.tab_index + 1) % self.tabs.len();
        self.selected = 0;
        self.refresh_visible();
    }

    fn prev_tab(&mut self) {
        if self.tab_index == 0 {
            self.tab_index = self.tabs.len() - 1;
        } else {
            self.tab_index -= 1;
        }
        self.selected = 0;
        self.refresh_visible();
    }

    fn open_add_form(&mut self) {
        self.form = Some(TaskForm::add());
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_FORM_ADD);
    }

    fn open_edit_form(&mut self) {
        let task = match self.current_task() {
            Some(task) => task.clone(),
            None => {
                self.set_status_info("Nothing to edit");
                return;
            }
        };
        self.form = Some(TaskForm::edit(&task));
        self.input_mode = InputMode::Form;
        self.set_status_info(STATUS_FORM_EDIT);
    }

    /// Close the form with the given outcome. Validation problems keep the
    /// form open with an inline error; store failures surface in the
    /// status line.
    fn finish_form(&mut self, outcome: PromptOutcome) {
        let submission = match outcome {
            PromptOutcome::Cancelled => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.status = None;
                return;
            }
            PromptOutcome::Submitted(submission) => submission,
        };

        let normalized = match self.normalize_submission(submission) {
            Ok(normalized) => normalized,
            Err(message) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_error(message);
                }
                return;
            }
        };

        let intent = match self.form.as_ref() {
            Some(form) => form.intent().clone(),
            None => return,
        };

        let now = Utc::now();
        let result = match &intent {
            FormIntent::Add => self
                .manager
                .add(normalized, now)
                .map(|task| format!("Added '{}'", task.text)),
            FormIntent::Edit { id } => match self.manager.edit(id, normalized, now) {
                Ok(()) => {
                    let text = self
                        .manager
                        .get(id)
                        .map(|task| task.text.clone())
                        .unwrap_or_default();
                    Ok(format!("Updated '{}'", text))
                }
                Err(err) => Err(err),
            },
        };

        match result {
            Ok(message) => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.refresh_visible();
                self.set_status_info(message);
            }
            Err(err) if err.is_validation() => {
                if let Some(form) = self.form.as_mut() {
                    form.set_error(err.to_string());
                }
            }
            Err(err) => {
                self.form = None;
                self.input_mode = InputMode::Normal;
                self.refresh_visible();
                self.set_status_error(err.to_string());
            }
        }
    }

    /// Convert a parseable deadline to RFC 3339 before it is stored. Empty
    /// deadlines pass through so the collection's own validation reports
    /// them; anything else unparseable is a form error.
    fn normalize_submission(&self, submission: TaskSubmission) -> Result<TaskSubmission, String> {
        let trimmed = submission.deadline.trim();
        if trimmed.is_empty() {
            return Ok(submission);
        }
        match parse_deadline(trimmed) {
            Ok(deadline) => Ok(TaskSubmission::new(
                submission.text,
                deadline.to_rfc3339(),
            )),
            Err(err) => Err(err.to_string()),
        }
    }

    fn toggle_current(&mut self) {
        let id = match self.current_task() {
            Some(task) => task.id.clone(),
            None => {
                self.set_status_info("Nothing selected");
                return;
            }
        };
        match self.manager.toggle(&id, Utc::now()) {
            Ok(true) => self.set_status_info("Marked task as done"),
            Ok(false) => self.set_status_info("Marked task as active"),
            Err(err) => self.set_status_error(err.to_string()),
        }
        self.refresh_visible();
    }

    fn mark_done_current(&mut self) {
        let (id, already_done) = match self.current_task() {
            Some(task) => (task.id.clone(), task.completed),
            None => {
                self.set_status_info("Nothing to mark done");
                return;
            }
        };
        match self.manager.mark_complete(&id, Utc::now()) {
            Ok(()) if already_done => self.set_status_info("Task was already done"),
            Ok(()) => self.set_status_info("Marked task as done"),
            Err(err) => self.set_status_error(err.to_string()),
        }
        self.refresh_visible();
    }

    fn show_selected_details(&mut self) {
        let task = match self.current_task() {
            Some(task) => task.clone(),
            None => {
                self.set_status_info("Nothing to inspect");
                return;
            }
        };
        self.inspect_task = Some(task);
        self.input_mode = InputMode::Inspect;
        self.set_status_info(STATUS_VIEW_DETAILS);
    }

    fn show_help_overlay(&mut self) {
        self.inspect_task = None;
        self.input_mode = InputMode::Help;
        self.set_status_info(STATUS_HELP);
    }

    fn prompt_delete(&mut self) {
        let Some(task) = self.current_task() else {
            self.set_status_info("Nothing to delete");
            return;
        };
        // Pin the target so a countdown flipping buckets mid-confirmation
        // cannot retarget the deletion.
        self.confirm_task = Some(task.clone());
        self.confirm_choice = ConfirmChoice::No;
        self.input_mode = InputMode::ConfirmDelete;
        self.set_status_info(STATUS_CONFIRM_DELETE);
    }

    fn perform_delete(&mut self) {
        let id = match self.confirm_task.take() {
            Some(task) => task.id,
            None => {
                self.set_status_info("Nothing to delete");
                return;
            }
        };
        match self.manager.delete(&id, Utc::now()) {
            Ok(_) => self.set_status_info("Deleted task 🗑️"),
            Err(err) => self.set_status_error(err.to_string()),
        }
        self.refresh_visible();
    }

    pub(crate) fn set_status_info<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("ℹ️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Info));
    }

    pub(crate) fn set_status_error<T: Into<String>>(&mut self, message: T) {
        let mut text = String::from("⚠️  ");
        text.push_str(&message.into());
        self.status = Some(StatusMessage::new(text, StatusKind::Error));
    }
}
