use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders},
    Frame,
};

use crate::{
    case::{SiteDraft, READING_LABELS},
    tui::app::App,
};

/// Bar chart of the three yearly readings, shown once all are entered
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .title(Span::styled(
            "📊 Verbrauchsentwicklung",
            Style::default().fg(Color::Cyan),
        ))
        .borders(Borders::ALL);

    let readings = match app.session.site() {
        SiteDraft::Consumption(draft) if app.assessment().is_some() => draft.entries,
        _ => {
            frame.render_widget(block, area);
            return;
        }
    };

    let bars: Vec<Bar> = READING_LABELS
        .iter()
        .zip(readings)
        .map(|(label, kwh)| {
            let kwh = kwh.unwrap_or(0);
            Bar::default()
                .label(Line::from(*label))
                .value(kwh)
                .text_value(format!("{} kWh", kwh))
                .style(Style::default().fg(Color::Cyan))
                .value_style(
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let bar_width = (area.width.saturating_sub(2) / 3).saturating_sub(2).clamp(3, 20);
    let chart = BarChart::default()
        .block(block)
        .data(BarGroup::default().bars(&bars))
        .bar_width(bar_width)
        .bar_gap(2);

    frame.render_widget(chart, area);
}
