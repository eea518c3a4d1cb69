use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::{
    case::{InstallationType, SiteDraft},
    tui::{
        app::{App, Field},
        components::form,
        theme::Theme,
    },
    utils,
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let theme = Theme::default();
    let title = match app.session.site() {
        SiteDraft::Installation(_) => "⚙️ Anlagenauswahl & technische Eckdaten",
        SiteDraft::Consumption(_) => "🔢 Manuelle Eingabe der Jahresverbräuche",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(theme.primary));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![form::toggle_line(
        Field::HasInstallation,
        app.session.has_installation(),
        app,
        &theme,
    )];
    // Text fields and the row they are rendered on, for cursor placement
    let mut text_rows: Vec<(Field, u16)> = Vec::new();

    match app.session.site() {
        SiteDraft::Installation(draft) => {
            let mut types = vec![form::label_span(Field::InstallationTypes, app, &theme)];
            for (index, installation_type) in InstallationType::ALL.iter().enumerate() {
                let selected = draft.types.contains(installation_type);
                let marker = if selected { "[x]" } else { "[ ]" };
                let mut style = if selected {
                    Style::default().fg(theme.primary)
                } else {
                    Style::default().fg(theme.muted)
                };
                if app.focus == Field::InstallationTypes && app.type_cursor == index {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                types.push(Span::styled(
                    format!("{} {}", marker, installation_type.label()),
                    style,
                ));
                types.push(Span::raw("  "));
            }
            lines.push(Line::from(types));

            if !draft.types.is_empty() {
                text_rows.push((Field::Power, lines.len() as u16));
                lines.push(form::input_line(Field::Power, &app.power, app, &theme));
                lines.push(form::toggle_line(Field::Controllable, draft.controllable, app, &theme));
                text_rows.push((Field::Commissioning, lines.len() as u16));
                lines.push(form::input_line(
                    Field::Commissioning,
                    &app.commissioning,
                    app,
                    &theme,
                ));
            } else {
                lines.push(Line::from(Span::styled(
                    "Mindestens eine Anlage auswählen (←/→, Leertaste)",
                    Style::default().fg(theme.muted),
                )));
            }
        }
        SiteDraft::Consumption(_) => {
            for (index, input) in app.readings.iter().enumerate() {
                let field = Field::Reading(index);
                text_rows.push((field, lines.len() as u16));
                let mut line = form::input_line(field, input, app, &theme);
                line.spans.insert(2, Span::styled(" kWh", Style::default().fg(theme.muted)));
                lines.push(line);
            }
        }
    }

    if let Some(assessment) = app.assessment() {
        if let Some(deadline) = assessment.cls_deadline {
            lines.push(Line::from(vec![
                Span::raw("📅 Frist für Bereitstellung des CLS-Moduls durch MSB: "),
                Span::styled(
                    utils::format_date(&deadline),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
        if let Some(average) = assessment.average_kwh {
            lines.push(Line::from(vec![
                Span::raw("🔎 Durchschnittsverbrauch: "),
                Span::styled(
                    utils::format_kwh(average),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]));
        }
    }

    frame.render_widget(Paragraph::new(lines), inner);

    for (field, row) in text_rows {
        if app.focus != field || row >= inner.height {
            continue;
        }
        if let Some(input) = app.input(field) {
            let origin = Rect::new(inner.x, inner.y + row, inner.width, 1);
            form::place_cursor(frame, origin, form::LABEL_WIDTH as u16, input);
        }
    }
}
