use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::tui::app::{App, LogLevel};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let items: Vec<ListItem> = app
        .logs
        .iter()
        .rev()
        .take(area.height.saturating_sub(2) as usize)
        .map(|log| {
            let (icon, color) = match log.level {
                LogLevel::Info => ("ℹ", Color::Blue),
                LogLevel::Success => ("✓", Color::Green),
                LogLevel::Warning => ("⚠", Color::Yellow),
                LogLevel::Error => ("✗", Color::Red),
            };

            let mut content = vec![
                Span::styled(format!("{} ", icon), Style::default().fg(color)),
                Span::styled(
                    log.timestamp.format("[%H:%M:%S]").to_string(),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(log.message.as_str(), Style::default().fg(color)),
            ];
            if let Some(rule_id) = log.rule_id {
                content.push(Span::styled(
                    format!("  Regel {}", rule_id),
                    Style::default().fg(Color::Magenta),
                ));
            }

            ListItem::new(Line::from(content))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("📝 Protokoll")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}
