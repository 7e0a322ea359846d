//! Task list rendering: rows with checkbox, name, description, and the
//! per-row updating indicator; inline edit view; empty state.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::{form::with_cursor, theme};
use crate::app::{App, EditField, Focus};
use crate::store::Task;

/// Render the task list panel.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == Focus::TaskList;

    let block = Block::default()
        .title("Tasks")
        .borders(Borders::ALL)
        .border_style(if is_focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    if app.store.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No tasks yet. Add one to get started!",
            theme::dimmed(),
        )))
        .centered()
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = app
        .store
        .tasks()
        .iter()
        .map(|task| render_row(task, app))
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(if is_focused {
            theme::selected()
        } else {
            theme::normal()
        })
        .highlight_symbol("> ");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Render one task row, switching to the inline editor when active.
fn render_row<'a>(task: &'a Task, app: &'a App) -> ListItem<'a> {
    if let Some(draft) = &app.editing
        && draft.id == task.id
    {
        return render_edit_row(draft, app.cursor);
    }

    let text_style = if task.completed {
        theme::completed()
    } else {
        theme::normal()
    };
    let checkbox = if task.completed { "[\u{2713}]" } else { "[ ]" };

    let mut first = vec![
        Span::styled(checkbox, theme::normal()),
        Span::raw(" "),
        Span::styled(&task.name, text_style),
    ];
    if app.store.is_updating(&task.id) {
        first.push(Span::raw(" "));
        first.push(Span::styled("\u{2026}", theme::dimmed()));
    }
    first.push(Span::raw("  "));
    first.push(Span::styled(
        task.created_at.format(&app.timestamp_format).to_string(),
        theme::dimmed(),
    ));

    let mut lines = vec![Line::from(first)];
    if !task.description.is_empty() {
        let desc_style = if task.completed {
            theme::completed()
        } else {
            theme::dimmed()
        };
        // First line only; the row view is a summary, not a document.
        let preview = task.description.lines().next().unwrap_or_default();
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(preview.to_string(), desc_style),
        ]));
    }

    ListItem::new(lines)
}

/// Render the inline editor for a row: both buffers, active one cursored.
fn render_edit_row(draft: &crate::app::EditDraft, cursor: usize) -> ListItem<'static> {
    let name_active = draft.field == EditField::Name;

    let name_display = if name_active {
        with_cursor(&draft.name, cursor)
    } else {
        draft.name.clone()
    };
    let desc_display = if name_active {
        draft.description.clone()
    } else {
        with_cursor(&draft.description, cursor)
    };

    let field_style = |active: bool| {
        if active {
            theme::highlighted()
        } else {
            theme::normal()
        }
    };

    let lines = vec![
        Line::from(vec![
            Span::styled("edit name: ", theme::dimmed()),
            Span::styled(name_display, field_style(name_active)),
        ]),
        Line::from(vec![
            Span::styled("edit desc: ", theme::dimmed()),
            Span::styled(desc_display, field_style(!name_active)),
        ]),
        Line::from(Span::styled(
            "Enter: save | Esc: cancel | Tab: switch field",
            theme::dimmed(),
        )),
    ];

    ListItem::new(lines)
}
