//! Terminal UI rendering.

pub mod form;
pub mod status_bar;
pub mod task_list;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    text::Line,
    widgets::Paragraph,
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // The initial fetch gates the whole view.
    if app.store.is_loading() {
        render_loading(frame);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Add form (name + description)
            Constraint::Min(3),    // Task list
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    form::render(frame, chunks[0], app);
    task_list::render(frame, chunks[1], app);
    status_bar::render(frame, chunks[2], app);
}

/// Full-screen loading gate shown while the initial fetch is outstanding.
fn render_loading(frame: &mut Frame) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(1),
            Constraint::Percentage(45),
        ])
        .split(area);

    let line = Line::from("Loading tasks\u{2026}").centered();
    frame.render_widget(Paragraph::new(line).style(theme::dimmed()), chunks[1]);
}
