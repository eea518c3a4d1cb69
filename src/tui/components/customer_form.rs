use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::{
    app::{App, Field},
    components::form,
    theme::Theme,
};

/// Two columns like the paper form: name/address left, surname/meter right
const GRID: [[Field; 2]; 2] = [
    [Field::FirstName, Field::LastName],
    [Field::Address, Field::MeterId],
];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = Theme::default();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("📇 Kundendaten erfassen")
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(inner);

    for (row, fields) in rows.iter().zip(GRID) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(*row);

        for (cell, field) in columns.iter().zip(fields) {
            let Some(input) = app.input(field) else {
                continue;
            };
            frame.render_widget(Paragraph::new(form::input_line(field, input, app, &theme)), *cell);
            if app.focus == field {
                form::place_cursor(frame, *cell, form::LABEL_WIDTH as u16, input);
            }
        }
    }

    let mut save = form::button_line(Field::Save, app, &theme, true);
    if let Some(customer) = app.session.customer() {
        save.spans.push(Span::styled(
            format!(
                "  ✓ gespeichert für {}, Zähler: {}",
                customer.display_name(),
                customer.meter_id
            ),
            Style::default().fg(theme.success),
        ));
    }
    frame.render_widget(Paragraph::new(save), rows[2]);
}
