//! Shared rendering of labelled form rows.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    Frame,
};
use tui_input::Input;
use unicode_width::UnicodeWidthStr;

use crate::tui::{
    app::{App, Field},
    theme::Theme,
};

/// Width reserved for labels so values line up
pub const LABEL_WIDTH: usize = 24;

pub fn label_span(field: Field, app: &App, theme: &Theme) -> Span<'static> {
    let label = field.label();
    let padding = LABEL_WIDTH.saturating_sub(label.width() + 2);
    let style = if app.focus == field {
        Style::default().fg(theme.focus).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.muted)
    };
    Span::styled(format!("{}: {}", label, " ".repeat(padding)), style)
}

/// `Label: value` row for a text input, with the field error appended
pub fn input_line(field: Field, input: &Input, app: &App, theme: &Theme) -> Line<'static> {
    let mut spans = vec![
        label_span(field, app, theme),
        Span::styled(input.value().to_string(), Style::default().fg(theme.foreground)),
    ];
    if let Some(error) = app.field_error(field) {
        spans.push(Span::styled(format!("  ⚠ {}", error), Style::default().fg(theme.error)));
    }
    Line::from(spans)
}

/// `( Ja ) / ( Nein )` toggle row
pub fn toggle_line(field: Field, value: bool, app: &App, theme: &Theme) -> Line<'static> {
    let option = |text: &str, selected: bool| {
        if selected {
            Span::styled(
                format!("(•) {}", text),
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!("( ) {}", text), Style::default().fg(theme.muted))
        }
    };
    Line::from(vec![
        label_span(field, app, theme),
        option("Ja", value),
        Span::raw("   "),
        option("Nein", !value),
    ])
}

/// `[ Label ]` button row
pub fn button_line(field: Field, app: &App, theme: &Theme, enabled: bool) -> Line<'static> {
    let style = if app.focus == field {
        Style::default()
            .fg(theme.focus)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else if enabled {
        Style::default().fg(theme.primary)
    } else {
        Style::default().fg(theme.border)
    };
    Line::from(Span::styled(format!("[ {} ]", field.label()), style))
}

/// Place the terminal cursor inside the focused text input.
///
/// `origin` is the cell where the row starts; `column_offset` is where the
/// value begins within that row.
pub fn place_cursor(frame: &mut Frame, origin: Rect, column_offset: u16, input: &Input) {
    let max_width = origin.width.saturating_sub(column_offset + 1) as usize;
    let scroll = input.visual_scroll(max_width);
    let cursor = input.visual_cursor().saturating_sub(scroll) as u16;
    frame.set_cursor(origin.x + column_offset + cursor, origin.y);
}
