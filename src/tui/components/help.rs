use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

pub fn render(frame: &mut Frame, area: Rect) {
    let keybindings = [
        ("F1 / F2", "Einzelfallprüfung / Anleitung"),
        ("Tab / ↓", "Nächstes Feld"),
        ("Shift+Tab / ↑", "Vorheriges Feld"),
        ("Leertaste", "Auswahl umschalten / Knopf auslösen"),
        ("← / →", "Anlagentyp wählen, Ja/Nein umschalten"),
        ("Enter", "Bestätigen / weiter"),
        ("Strg+S", "Kundendaten speichern"),
        ("Strg+E", "Ergebnis exportieren"),
        ("Strg+N", "Neuer Fall"),
        ("Esc / Strg+C", "Beenden"),
    ];

    let items: Vec<ListItem> = keybindings
        .iter()
        .map(|(key, desc)| {
            let content = vec![
                Span::styled(
                    format!("{:15}", key),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(" - "),
                Span::styled(*desc, Style::default().fg(Color::White)),
            ];
            ListItem::new(Line::from(content))
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Tastenbelegung")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    frame.render_widget(list, area);
}
