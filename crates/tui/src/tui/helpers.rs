use std::cmp::min;

use chrono::Local;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::countdown::{parse_deadline, TimeLeft};
use crate::model::Task;

pub const BG_BASE: Color = Color::Rgb(16, 18, 24);
pub const BG_PANEL: Color = Color::Rgb(24, 27, 35);
pub const BG_ACCENT: Color = Color::Rgb(36, 40, 51);
pub const FG_ACCENT: Color = Color::Rgb(255, 184, 108);

pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = min(width, area.width);
    let h = min(height, area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(w)) / 2,
        y: area.y + (area.height.saturating_sub(h)) / 2,
        width: w,
        height: h,
    }
}

pub fn inset_rect(area: Rect, padding: u16) -> Rect {
    if area.width == 0 || area.height == 0 {
        return area;
    }
    let px = padding.min(area.width / 2);
    let py = padding.min(area.height / 2);
    Rect {
        x: area.x + px,
        y: area.y + py,
        width: area.width.saturating_sub(px * 2),
        height: area.height.saturating_sub(py * 2),
    }
}

pub fn short_id(id: &str) -> String {
    if id.len() <= 6 {
        id.to_string()
    } else {
        id[..6].to_string()
    }
}

/// Render a stored deadline in a friendly local form, falling back to the
/// raw string when it cannot be parsed.
pub fn format_deadline(raw: &str) -> String {
    match parse_deadline(raw) {
        Ok(deadline) => deadline
            .with_timezone(&Local)
            .format("%a, %d %b %Y %H:%M")
            .to_string(),
        Err(_) => raw.to_string(),
    }
}

pub fn remaining_style(status: &TimeLeft) -> Style {
    match status {
        TimeLeft::Counting { .. } => Style::default().fg(Color::Yellow),
        TimeLeft::Expired => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        TimeLeft::Done => Style::default().fg(Color::Green),
        TimeLeft::Invalid => Style::default().fg(Color::Magenta),
    }
}

pub fn text_style(status: &TimeLeft) -> Style {
    match status {
        TimeLeft::Done => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::CROSSED_OUT),
        _ => Style::default(),
    }
}

pub fn format_task_detail_entries(task: &Task, status: TimeLeft) -> Vec<(String, String)> {
    vec![
        (String::from("Text"), task.text.clone()),
        (String::from("ID"), task.id.clone()),
        (String::from("Deadline"), format_deadline(&task.deadline)),
        (String::from("Stored as"), task.deadline.clone()),
        (String::from("Remaining"), status.to_string()),
        (
            String::from("Completed"),
            String::from(if task.completed { "yes" } else { "no" }),
        ),
    ]
}

pub fn build_help_lines() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Tab / Shift+Tab", "Switch buckets"),
        ("j / k or ↓ / ↑", "Move selection"),
        ("q", "Quit"),
        ("Enter", "Toggle task detail overlay"),
        ("h / ?", "Toggle this help overlay"),
        ("a", "Add a new task"),
        ("e", "Edit selected task"),
        ("Space", "Toggle done/active"),
        ("d", "Mark as done"),
        ("x / Delete", "Delete task (with confirmation)"),
        ("r", "Reload from storage"),
        ("Home / End", "Jump to first/last task"),
        ("Esc", "Cancel/close overlays"),
    ]
}

pub fn accent_title(text: &str) -> Line<'static> {
    Line::from(vec![Span::styled(
        text.to_owned(),
        Style::default().fg(FG_ACCENT).add_modifier(Modifier::BOLD),
    )])
}
