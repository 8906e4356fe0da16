use chrono::Local;

use crate::core::prompt::TaskSubmission;
use crate::countdown::parse_deadline;
use crate::model::Task;

use super::buffer::FieldBuffer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Text,
    Deadline,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormIntent {
    Add,
    Edit { id: String },
}

/// Two-field prompt for adding or editing a task.
#[derive(Debug, Clone)]
pub struct TaskForm {
    intent: FormIntent,
    text: FieldBuffer,
    deadline: FieldBuffer,
    active: FormField,
    error: Option<String>,
}

impl TaskForm {
    pub fn add() -> Self {
        Self {
            intent: FormIntent::Add,
            text: FieldBuffer::new(),
            deadline: FieldBuffer::new(),
            active: FormField::Text,
            error: None,
        }
    }

    /// Prefill from an existing task. A parseable stored deadline comes
    /// back in the picker shape; anything else is shown raw for repair.
    pub fn edit(task: &Task) -> Self {
        let mut text = FieldBuffer::new();
        text.set(task.text.clone());

        let mut deadline = FieldBuffer::new();
        let prefill = match parse_deadline(&task.deadline) {
            Ok(dt) => dt
                .with_timezone(&Local)
                .format("%Y-%m-%dT%H:%M")
                .to_string(),
            Err(_) => task.deadline.clone(),
        };
        deadline.set(prefill);

        Self {
            intent: FormIntent::Edit {
                id: task.id.clone(),
            },
            text,
            deadline,
            active: FormField::Text,
            error: None,
        }
    }

    pub fn intent(&self) -> &FormIntent {
        &self.intent
    }

    pub fn title(&self) -> &'static str {
        match self.intent {
            FormIntent::Add => "➕ Add Task",
            FormIntent::Edit { .. } => "✏️ Edit Task",
        }
    }

    pub fn active(&self) -> FormField {
        self.active
    }

    pub fn next_field(&mut self) {
        self.active = match self.active {
            FormField::Text => FormField::Deadline,
            FormField::Deadline => FormField::Text,
        };
    }

    pub fn prev_field(&mut self) {
        self.active = match self.active {
            FormField::Text => FormField::Deadline,
            FormField::Deadline => FormField::Text,
        };
    }

    pub fn buffer(&self, field: FormField) -> &FieldBuffer {
        match field {
            FormField::Text => &self.text,
            FormField::Deadline => &self.deadline,
        }
    }

    pub fn active_buffer_mut(&mut self) -> &mut FieldBuffer {
        match self.active {
            FormField::Text => &mut self.text,
            FormField::Deadline => &mut self.deadline,
        }
    }

    pub fn submission(&self) -> TaskSubmission {
        TaskSubmission::new(self.text.as_str(), self.deadline.as_str())
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }
}
