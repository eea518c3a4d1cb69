use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::tui::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let case_label = match app.session.customer() {
        Some(customer) if !customer.meter_id.is_empty() => format!("Zähler {}", customer.meter_id),
        Some(_) => "Kundendaten gespeichert".to_string(),
        None => "Neuer Fall".to_string(),
    };

    let title = vec![
        Span::styled("🔌 ", Style::default().fg(Color::Yellow)),
        Span::styled(
            "§14a Imsys-Einbauprüfung",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" | "),
        Span::styled(case_label, Style::default().fg(Color::Green)),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let paragraph = Paragraph::new(Line::from(title))
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
