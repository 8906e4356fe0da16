use crate::error::TaskError;

/// Result of an interactive prompt session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptOutcome {
    Cancelled,
    Submitted(TaskSubmission),
}

/// Raw field values captured from a prompt, not yet validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskSubmission {
    pub text: String,
    pub deadline: String,
}

impl TaskSubmission {
    pub fn new(text: impl Into<String>, deadline: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            deadline: deadline.into(),
        }
    }

    /// Trim and validate both fields, rejecting blank entries.
    pub fn into_fields(self) -> Result<(String, String), TaskError> {
        let text = self.text.trim().to_string();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        let deadline = self.deadline.trim().to_string();
        if deadline.is_empty() {
            return Err(TaskError::EmptyDeadline);
        }
        Ok((text, deadline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn into_fields_trims_both_values() {
        let submission = TaskSubmission::new("  Ship the report  ", " 2031-03-01T17:00 ");
        let (text, deadline) = submission.into_fields().expect("valid submission");
        assert_eq!(text, "Ship the report");
        assert_eq!(deadline, "2031-03-01T17:00");
    }

    #[test]
    fn blank_text_is_rejected_before_deadline() {
        let submission = TaskSubmission::new("   ", "");
        assert!(matches!(
            submission.into_fields(),
            Err(TaskError::EmptyText)
        ));
    }

    #[test]
    fn blank_deadline_is_rejected() {
        let submission = TaskSubmission::new("Ship the report", "   ");
        assert!(matches!(
            submission.into_fields(),
            Err(TaskError::EmptyDeadline)
        ));
    }

    #[test]
    fn outcomes_compare_by_payload() {
        let submitted = PromptOutcome::Submitted(TaskSubmission::new("a", "b"));
        assert_eq!(
            submitted,
            PromptOutcome::Submitted(TaskSubmission::new("a", "b"))
        );
        assert_ne!(submitted, PromptOutcome::Cancelled);
    }
}
