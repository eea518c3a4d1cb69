use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::{
    app::{App, Field},
    components::form,
    theme::Theme,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = Theme::default();
    let assessment = app.assessment();

    let mut lines = Vec::new();
    match &assessment {
        Some(assessment) => {
            let color = theme.severity(assessment.severity);
            lines.push(Line::from(vec![
                Span::raw("Ergebnis: "),
                Span::styled(
                    assessment.verdict.label(),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));
            lines.push(Line::from(Span::styled(
                assessment.explanation.clone(),
                Style::default().fg(color),
            )));
        }
        None => {
            lines.push(Line::from(Span::styled(
                "Noch kein Ergebnis – Pflichtangaben ergänzen.",
                Style::default().fg(theme.muted),
            )));
        }
    }

    lines.push(Line::default());
    let exportable = assessment.is_some() && app.session.is_submitted();
    let mut export = form::button_line(Field::Export, app, &theme, exportable);
    export.spans.push(Span::styled(
        format!(" ({})", app.config.export.format),
        Style::default().fg(theme.muted),
    ));
    lines.push(export);

    if !app.session.is_submitted() {
        lines.push(Line::from(Span::styled(
            "Export erst nach \"Daten speichern\" möglich.",
            Style::default().fg(theme.muted),
        )));
    }
    if let Some(path) = &app.last_export {
        lines.push(Line::from(Span::styled(
            format!("📥 {}", path.display()),
            Style::default().fg(theme.success),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Ergebnis")
                .border_style(Style::default().fg(theme.primary)),
        );

    frame.render_widget(paragraph, area);
}
