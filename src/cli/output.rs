//! Output formatting utilities for the CLI.

use comfy_table::{presets, Attribute, Cell, Color, ContentArrangement, Table};
use serde::Serialize;

use crate::domain::models::{TaskPriority, TaskStatus};

pub trait CommandOutput: Serialize {
    fn to_human(&self) -> String;

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn output<T: CommandOutput>(result: &T, json_mode: bool) {
    if json_mode {
        println!("{}", serde_json::to_string_pretty(&result.to_json()).unwrap_or_default());
    } else {
        println!("{}", result.to_human());
    }
}

/// Truncate a string to at most `max_len` characters, appending "..." if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// First eight characters of an id, for table columns.
pub fn short_id(id: &uuid::Uuid) -> String {
    id.to_string().chars().take(8).collect()
}

/// Table with the house style and bold headers.
pub fn table<const N: usize>(headers: [&str; N]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers.map(|h| Cell::new(h).add_attribute(Attribute::Bold)));
    table
}

pub fn priority_cell(priority: TaskPriority) -> Cell {
    let color = match priority {
        TaskPriority::Urgent => Color::Red,
        TaskPriority::High => Color::Yellow,
        TaskPriority::Medium => Color::Cyan,
        TaskPriority::Low => Color::DarkGrey,
    };
    Cell::new(priority.as_str()).fg(color)
}

pub fn status_cell(status: TaskStatus) -> Cell {
    let color = match status {
        TaskStatus::Pending => Color::White,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Completed => Color::Green,
        TaskStatus::Cancelled => Color::DarkGrey,
        TaskStatus::Overdue => Color::Red,
    };
    Cell::new(status.as_str()).fg(color)
}
