//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use super::theme;
use crate::app::{AlertKind, App, Focus};

/// Render the status bar at the bottom of the screen.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let help_text = if app.editing.is_some() {
        "Enter: save | Esc: cancel | Tab: switch field"
    } else {
        match app.focus {
            Focus::NameInput | Focus::DescInput => "Enter: add task | Tab: switch | Esc: quit",
            Focus::TaskList => {
                "Space: toggle | e: edit | d: delete | r: refresh | \u{2191}\u{2193}/jk: navigate | Esc: quit"
            }
        }
    };

    let mut spans = vec![Span::styled("TaskFlow", theme::bold()), Span::raw(" | ")];

    if !app.store.is_empty() {
        spans.push(Span::raw(format!(
            "{} of {} tasks completed",
            app.store.completed_count(),
            app.store.len()
        )));
        spans.push(Span::raw(" | "));
    }

    spans.push(Span::styled(help_text, theme::dimmed()));

    if let Some(alert) = &app.alert {
        let style = match alert.kind {
            AlertKind::Success => theme::alert_success(),
            AlertKind::Error => theme::alert_error(),
        };
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(alert.text.clone(), style));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
