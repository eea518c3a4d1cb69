use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::{guide, tui::app::App, tui::components};

pub fn render(frame: &mut Frame, area: Rect, _app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(12), Constraint::Length(12)])
        .split(area);

    let mut lines = vec![
        Line::from(Span::raw(guide::INTRO)),
        Line::default(),
        Line::from(Span::styled(
            "So funktioniert es:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];
    lines.extend(guide::STEPS.iter().map(|step| {
        Line::from(vec![
            Span::styled("  • ", Style::default().fg(Color::Cyan)),
            Span::raw(*step),
        ])
    }));
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(
        guide::OUTLOOK,
        Style::default()
            .fg(Color::Gray)
            .add_modifier(Modifier::ITALIC),
    )));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("📘 {}", guide::TITLE))
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(paragraph, chunks[0]);
    components::help::render(frame, chunks[1]);
}
