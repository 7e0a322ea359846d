//! Theme and styling constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Completed-task accent color.
pub const COMPLETED: Color = Color::Yellow;

/// Success alert color.
pub const SUCCESS: Color = Color::Green;

/// Error alert color.
pub const ERROR: Color = Color::Red;

/// Default text style.
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (placeholders, descriptions, timestamps).
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Style for focused panel borders.
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT)
}

/// Style for the selected task row.
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for completed task text (struck through, accent color).
pub fn completed() -> Style {
    Style::default()
        .fg(COMPLETED)
        .add_modifier(Modifier::CROSSED_OUT)
}

/// Style for a success alert.
pub fn alert_success() -> Style {
    Style::default().fg(SUCCESS).add_modifier(Modifier::BOLD)
}

/// Style for an error alert.
pub fn alert_error() -> Style {
    Style::default().fg(ERROR).add_modifier(Modifier::BOLD)
}

/// Background style for the status bar.
pub fn status_bar_bg() -> Style {
    Style::default().bg(Color::DarkGray).fg(Color::White)
}
