use std::cmp::min;

use chrono::Local;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap};
use ratatui::Frame;

use crate::countdown::TimeLeft;
use crate::model::StatusBucket;
use crate::tui::constants::APP_VERSION;
use crate::tui::form::{FormField, TaskForm};
use crate::tui::helpers::{
    accent_title, build_help_lines, centered_rect, format_deadline, format_task_detail_entries,
    inset_rect, remaining_style, short_id, text_style, BG_ACCENT, BG_BASE, BG_PANEL, FG_ACCENT,
};

use super::{App, InputMode};

impl App {
    pub(crate) fn draw(&mut self, f: &mut Frame<'_>) {
        let size = f.size();
        f.render_widget(Clear, size);
        f.render_widget(Block::default().style(Style::default().bg(BG_BASE)), size);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(2),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_tabs(f, chunks[1]);
        self.draw_tasks(f, chunks[2]);
        self.draw_footer(f, chunks[3]);

        match self.input_mode {
            InputMode::Form => self.draw_form_overlay(f, size),
            InputMode::Inspect => self.draw_detail_overlay(f, size),
            InputMode::Help => self.draw_help_overlay(f, size),
            InputMode::ConfirmDelete => self.draw_confirm_overlay(f, size),
            InputMode::Normal => {}
        }
    }

    fn draw_header(&self, f: &mut Frame<'_>, area: Rect) {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(area);

        let current = self
            .tabs
            .get(self.tab_index)
            .map(|tab| tab.description)
            .unwrap_or("Tasks");
        let left_line = Line::from(vec![
            Span::styled(
                format!(" duet v{} ⏳ ", APP_VERSION),
                Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("— {}", current)),
            Span::raw("  "),
            Span::styled(
                format!("💾 {}", self.config.db_path().display()),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        f.render_widget(
            Paragraph::new(left_line).style(Style::default().bg(BG_BASE)),
            cols[0],
        );

        let right_line = Line::from(vec![Span::styled(
            format!("🕐 {} ", Local::now().format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(
            Paragraph::new(right_line)
                .alignment(ratatui::layout::Alignment::Right)
                .style(Style::default().bg(BG_BASE)),
            cols[1],
        );
    }

    fn draw_tabs(&self, f: &mut Frame<'_>, area: Rect) {
        let titles: Vec<Line> = self.tabs.iter().map(|tab| Line::from(tab.label)).collect();
        let tabs = Tabs::new(titles)
            .select(self.tab_index)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(accent_title("Buckets"))
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(FG_ACCENT)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            );
        f.render_widget(tabs, area);
    }

    fn draw_tasks(&mut self, f: &mut Frame<'_>, area: Rect) {
        if self.visible.is_empty() {
            let lines = self.empty_state();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(BG_PANEL));
            let inner = block.inner(area);
            f.render_widget(Clear, area);
            f.render_widget(block, area);

            if inner.width == 0 || inner.height == 0 {
                return;
            }

            let width = inner.width.min(80).max(1);
            let mut height = (lines.len() as u16).saturating_add(2).min(inner.height);
            if height < 3 && inner.height >= 3 {
                height = 3;
            }
            let content_area = centered_rect(width, height, inner);
            f.render_widget(Clear, content_area);

            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(ratatui::layout::Alignment::Center)
                .style(Style::default().bg(BG_PANEL));
            f.render_widget(paragraph, content_area);
            return;
        }

        let header = Row::new(vec![
            Cell::from("#️⃣ ID"),
            Cell::from("📝 Task"),
            Cell::from("⏰ Deadline"),
            Cell::from("⏳ Remaining"),
        ])
        .style(Style::default().add_modifier(Modifier::BOLD));

        let board = self.manager.board();
        let rows: Vec<Row> = self
            .visible
            .iter()
            .filter_map(|&index| self.manager.tasks().get(index))
            .map(|task| {
                let status = board.status(&task.id).unwrap_or(TimeLeft::Invalid);
                Row::new(vec![
                    Cell::from(short_id(&task.id)),
                    Cell::from(task.text.clone()).style(text_style(&status)),
                    Cell::from(format_deadline(&task.deadline)),
                    Cell::from(status.to_string()).style(remaining_style(&status)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(8),
            Constraint::Percentage(45),
            Constraint::Length(22),
            Constraint::Min(14),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .style(Style::default().bg(BG_PANEL)),
            )
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .bg(BG_ACCENT)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▶ ");

        f.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn empty_state(&self) -> Vec<Line<'static>> {
        let bucket = self.tabs.get(self.tab_index).and_then(|tab| tab.bucket);
        let heading = match bucket {
            None => "No tasks yet ⏳",
            Some(StatusBucket::Pending) => "Nothing counting down ✨",
            Some(StatusBucket::Expired) => "Nothing overdue 🎉",
            Some(StatusBucket::Done) => "No wins yet ✅",
            Some(StatusBucket::Invalid) => "No broken deadlines 🔧",
        };

        let base_hints = [
            "Press 'a' to add a task with a deadline.",
            "Deadlines accept 2031-03-01T17:00, tomorrow, +3d, or mon.",
        ];

        let mut bucket_hints = Vec::new();
        if matches!(bucket, Some(StatusBucket::Expired)) {
            bucket_hints.push("Tasks land here the second their countdown hits zero.");
        }
        if matches!(bucket, Some(StatusBucket::Done)) {
            bucket_hints.push("Press Space or 'd' on a task to record a win.");
        }

        let mut lines: Vec<Line<'static>> = Vec::new();
        lines.push(Line::from(vec![Span::styled(
            heading,
            Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
        )]));
        lines.push(Line::default());

        for hint in base_hints {
            lines.push(Line::from(vec![Span::styled(
                hint,
                Style::default()
                    .fg(Color::Gray)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        if !bucket_hints.is_empty() {
            lines.push(Line::default());
            let hint_style = Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD);
            for hint in bucket_hints {
                lines.push(Line::from(vec![Span::styled(hint, hint_style)]));
            }
        }

        if self.first_run {
            lines.push(Line::default());
            lines.push(Line::from(vec![Span::styled(
                format!(
                    "Your duet data lives in `{}` (adjust with `--data-dir` or `DUET_DATA_DIR`).",
                    self.config.data_dir().display()
                ),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD),
            )]));
        }

        lines
    }

    fn draw_footer(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Length(1)])
            .split(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.style())])
        } else {
            Line::from(vec![Span::raw("Ready")])
        };

        f.render_widget(Paragraph::new(status_line), lines[0]);

        let mut help = match self.input_mode {
            InputMode::Normal => String::from(
                "nav: tab/shift+tab buckets | j/k move | q quit | overlays: enter details ℹ️ | h help ❔ | actions: a add ✚ | e edit ✏️ | space toggle ☑️ | d done ✅ | x delete 🗑️ | r refresh 🔄",
            ),
            InputMode::Form => String::from("Tab next field • Enter save • Esc cancel"),
            InputMode::Inspect => String::from("Enter/Esc to close ℹ️"),
            InputMode::Help => String::from("Enter/Esc to close ❔"),
            InputMode::ConfirmDelete => {
                String::from("←/→ choose • Space toggle • Enter confirm • Esc cancel")
            }
        };

        if self.input_mode == InputMode::Normal && self.first_run {
            help.push_str(" • New here? Press `a` to add your first task");
        }

        let help_line = Line::from(vec![Span::styled(
            help,
            Style::default().fg(Color::DarkGray),
        )]);
        f.render_widget(Paragraph::new(help_line), lines[1]);
    }

    fn draw_form_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(form) = self.form.as_ref() else {
            return;
        };

        let width = min(area.width.saturating_sub(10), 64);
        let popup_area = centered_rect(width, 10, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title(form.title()))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Min(1),
            ])
            .split(inner);

        self.draw_form_field(f, chunks[0], form, FormField::Text, "Task");
        self.draw_form_field(f, chunks[1], form, FormField::Deadline, "Deadline");

        let footer = if let Some(error) = form.error() {
            Paragraph::new(error)
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::Red).bg(BG_PANEL))
        } else {
            Paragraph::new("Formats: 2031-03-01T17:00 • 2031-03-01 • today • tomorrow • +3d • mon")
                .wrap(Wrap { trim: true })
                .style(Style::default().fg(Color::DarkGray).bg(BG_PANEL))
        };
        f.render_widget(footer, chunks[2]);
    }

    fn draw_form_field(
        &self,
        f: &mut Frame<'_>,
        area: Rect,
        form: &TaskForm,
        field: FormField,
        label: &str,
    ) {
        let active = form.active() == field;
        let border_style = if active {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(label)
            .border_style(border_style)
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(area);
        f.render_widget(block, area);

        let buffer = form.buffer(field);
        f.render_widget(
            Paragraph::new(buffer.as_str()).style(Style::default().bg(BG_PANEL)),
            inner,
        );

        if active && inner.width > 0 {
            let col = (buffer.cursor_col() as u16).min(inner.width.saturating_sub(1));
            f.set_cursor(inner.x + col, inner.y);
        }
    }

    fn draw_detail_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let Some(task) = self.inspect_task.as_ref() else {
            return;
        };

        let status = self
            .manager
            .board()
            .status(&task.id)
            .unwrap_or(TimeLeft::Invalid);
        let detail_entries = format_task_detail_entries(task, status);

        let width = min(area.width.saturating_sub(20), 90).max(40);
        let content_height = detail_entries.len() as u16 + 2;
        let popup_height = content_height
            .saturating_add(4)
            .min(area.height.saturating_sub(2))
            .max(6);
        let popup_area = centered_rect(width, popup_height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗒 Task Details"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let detail_area = inset_rect(inner, 1);
        f.render_widget(Clear, inner);
        let rows: Vec<Row> = detail_entries
            .into_iter()
            .map(|(key, value)| {
                Row::new(vec![
                    Cell::from(key)
                        .style(Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD)),
                    Cell::from(value),
                ])
            })
            .collect();

        let table = Table::new(rows, [Constraint::Length(14), Constraint::Min(20)])
            .block(Block::default().style(Style::default().bg(BG_PANEL)))
            .column_spacing(2);
        f.render_widget(table, detail_area);
    }

    fn draw_help_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let lines = build_help_lines();
        let width = min(area.width.saturating_sub(10), 100);
        let height = min(lines.len() as u16 + 4, area.height.saturating_sub(2)).max(10);
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("⌨️ Keyboard Reference"))
            .border_style(Style::default().fg(Color::DarkGray))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let help_lines: Vec<Line> = lines
            .into_iter()
            .map(|(combo, desc)| {
                Line::from(vec![
                    Span::styled(combo, Style::default().fg(Color::Cyan)),
                    Span::raw("  "),
                    Span::raw(desc),
                ])
            })
            .collect();

        if inner.width < 3 || inner.height < 3 {
            return;
        }

        let content = inset_rect(inner, 1);
        f.render_widget(Clear, inner);
        f.render_widget(
            Paragraph::new(help_lines)
                .wrap(Wrap { trim: true })
                .style(Style::default().bg(BG_PANEL)),
            content,
        );
    }

    fn draw_confirm_overlay(&self, f: &mut Frame<'_>, area: Rect) {
        let width = min(area.width.saturating_sub(20), 60).max(40);
        let height = 8u16;
        let popup_area = centered_rect(width, height, area);
        f.render_widget(Clear, popup_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(accent_title("🗑 Confirm Deletion"))
            .border_style(Style::default().fg(Color::Red))
            .style(Style::default().bg(BG_PANEL));
        let inner = block.inner(popup_area);
        f.render_widget(block, popup_area);

        let task_text = self
            .confirm_task
            .as_ref()
            .map(|task| task.text.as_str())
            .unwrap_or("selected task");

        let mut lines = Vec::new();
        lines.push(Line::from(vec![Span::styled(
            "This action cannot be undone.",
            Style::default().fg(Color::Red),
        )]));
        lines.push(Line::from(vec![Span::styled(
            format!("Delete '{}'?", task_text),
            Style::default().fg(Color::White),
        )]));
        lines.push(Line::default());

        let yes_style = if self.confirm_choice == super::ConfirmChoice::Yes {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Red)
        };
        let no_style = if self.confirm_choice == super::ConfirmChoice::No {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Gray)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        lines.push(Line::from(vec![
            Span::styled("  Yes  ", yes_style),
            Span::raw("    "),
            Span::styled("  No  ", no_style),
        ]));

        f.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .alignment(ratatui::layout::Alignment::Center)
                .style(Style::default().bg(BG_PANEL)),
            inset_rect(inner, 1),
        );
    }
}
