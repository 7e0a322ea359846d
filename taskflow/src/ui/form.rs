//! Add-form rendering (name input + description textarea).

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

use super::theme;
use crate::app::{App, Focus};

/// Render the add form: a one-line name input and a description textarea.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Length(4)])
        .split(area);

    render_field(
        frame,
        chunks[0],
        "New task",
        "Task name...",
        &app.store.draft_name,
        app,
        Focus::NameInput,
    );
    render_field(
        frame,
        chunks[1],
        "Description",
        "Task description... (optional)",
        &app.store.draft_description,
        app,
        Focus::DescInput,
    );
}

/// Render a single bordered text field with placeholder and cursor.
fn render_field(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    placeholder: &str,
    text: &str,
    app: &App,
    field: Focus,
) {
    // Edit mode steals input focus, so the form never shows a cursor then.
    let is_focused = app.editing.is_none() && app.focus == field;

    let lines: Vec<Line> = if text.is_empty() && !is_focused {
        vec![Line::from(Span::styled(
            placeholder.to_string(),
            theme::dimmed(),
        ))]
    } else {
        let display = if is_focused {
            with_cursor(text, app.cursor)
        } else {
            text.to_string()
        };
        display
            .split('\n')
            .map(|l| Line::from(Span::styled(l.to_string(), theme::normal())))
            .collect()
    };

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Insert a block cursor at the given character index.
pub(super) fn with_cursor(text: &str, cursor: usize) -> String {
    let at = text
        .char_indices()
        .map(|(i, _)| i)
        .nth(cursor)
        .unwrap_or(text.len());
    let mut display = text.to_string();
    display.insert(at, '\u{2588}');
    display
}
