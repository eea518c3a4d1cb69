use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::tui::app::{App, Screen};

const ENTRIES: [(Screen, &str, &str); 2] = [
    (Screen::Check, "F1", "Einzelfallprüfung"),
    (Screen::Guide, "F2", "Anleitung"),
];

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = ENTRIES
        .iter()
        .map(|(screen, key, label)| {
            let active = *screen == app.current_screen;
            let style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:3}", key), Style::default().fg(Color::Yellow)),
                Span::styled(format!(" {}", label), style),
            ]))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📂 Navigation")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}
