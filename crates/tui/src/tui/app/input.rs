use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::prompt::PromptOutcome;
use crate::tui::constants::STATUS_REFRESHED;

use super::{App, ConfirmChoice, InputMode};

#[derive(Debug, Clone, Copy)]
pub(crate) enum NormalAction {
    Quit,
    EnterAdd,
    EnterEdit,
    ToggleDone,
    MarkDone,
    Delete,
    ShowDetails,
    ShowHelp,
    Refresh,
    SelectNext,
    SelectPrev,
    PrevTab,
    NextTab,
    SelectFirst,
    SelectLast,
}

impl NormalAction {
    fn from_event(key: &KeyEvent) -> Option<Self> {
        if matches!(key.code, KeyCode::Char('c')) && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }

        match key.code {
            KeyCode::Char('q') => Some(Self::Quit),
            KeyCode::Char('a') => Some(Self::EnterAdd),
            KeyCode::Char('e') => Some(Self::EnterEdit),
            KeyCode::Char(' ') => Some(Self::ToggleDone),
            KeyCode::Char('d') => Some(Self::MarkDone),
            KeyCode::Char('x') | KeyCode::Delete => Some(Self::Delete),
            KeyCode::Char('h') | KeyCode::Char('?') => Some(Self::ShowHelp),
            KeyCode::Char('r') => Some(Self::Refresh),
            KeyCode::Char('j') | KeyCode::Down => Some(Self::SelectNext),
            KeyCode::Char('k') | KeyCode::Up => Some(Self::SelectPrev),
            KeyCode::Left | KeyCode::BackTab => Some(Self::PrevTab),
            KeyCode::Char('l') | KeyCode::Right | KeyCode::Tab => Some(Self::NextTab),
            KeyCode::Enter => Some(Self::ShowDetails),
            KeyCode::Home => Some(Self::SelectFirst),
            KeyCode::End => Some(Self::SelectLast),
            _ => None,
        }
    }
}

impl App {
    pub(crate) fn on_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.input_mode {
            InputMode::Normal => self.handle_normal_mode(key),
            InputMode::Form => self.handle_form_mode(key),
            InputMode::Inspect => self.handle_inspect_mode(key),
            InputMode::Help => self.handle_help_mode(key),
            InputMode::ConfirmDelete => self.handle_confirm_delete_mode(key),
        }
    }

    fn handle_normal_mode(&mut self, key: KeyEvent) -> Result<()> {
        if let Some(action) = NormalAction::from_event(&key) {
            self.execute_normal_action(action)?;
        }
        Ok(())
    }

    fn execute_normal_action(&mut self, action: NormalAction) -> Result<()> {
        match action {
            NormalAction::Quit => {
                self.should_quit = true;
            }
            NormalAction::EnterAdd => self.open_add_form(),
            NormalAction::EnterEdit => self.open_edit_form(),
            NormalAction::ToggleDone => self.toggle_current(),
            NormalAction::MarkDone => self.mark_done_current(),
            NormalAction::Delete => self.prompt_delete(),
            NormalAction::ShowDetails => self.show_selected_details(),
            NormalAction::ShowHelp => self.show_help_overlay(),
            NormalAction::Refresh => {
                self.refresh()?;
                self.set_status_info(STATUS_REFRESHED);
            }
            NormalAction::SelectNext => self.select_next(),
            NormalAction::SelectPrev => self.select_prev(),
            NormalAction::PrevTab => self.prev_tab(),
            NormalAction::NextTab => self.next_tab(),
            NormalAction::SelectFirst => self.select_first(),
            NormalAction::SelectLast => self.select_last(),
        }
        Ok(())
    }

    fn handle_form_mode(&mut self, key: KeyEvent) -> Result<()> {
        if self.form.is_none() {
            self.input_mode = InputMode::Normal;
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => self.finish_form(PromptOutcome::Cancelled),
            KeyCode::Enter => {
                let submission = self.form.as_ref().map(|form| form.submission());
                if let Some(submission) = submission {
                    self.finish_form(PromptOutcome::Submitted(submission));
                }
            }
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = self.form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = self.form.as_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().backspace();
                }
            }
            KeyCode::Delete => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().delete_char();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().insert_char(c);
                }
            }
            KeyCode::Left => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().move_left();
                }
            }
            KeyCode::Right => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().move_right();
                }
            }
            KeyCode::Home => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().move_home();
                }
            }
            KeyCode::End => {
                if let Some(form) = self.form.as_mut() {
                    form.active_buffer_mut().move_end();
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_inspect_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.inspect_task = None;
                self.input_mode = InputMode::Normal;
                self.status = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_help_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.input_mode = InputMode::Normal;
                self.status = None;
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn handle_confirm_delete_mode(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.confirm_task = None;
                self.input_mode = InputMode::Normal;
                self.set_status_info("Deletion cancelled");
                Ok(())
            }
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => {
                self.confirm_choice = self.confirm_choice.toggle();
                Ok(())
            }
            KeyCode::Enter => {
                if self.confirm_choice == ConfirmChoice::Yes {
                    self.perform_delete();
                } else {
                    self.confirm_task = None;
                    self.set_status_info("Deletion cancelled");
                }
                self.input_mode = InputMode::Normal;
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
