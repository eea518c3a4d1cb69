use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::{io, time::Duration};
use tracing::info;

use crate::{
    config::Config,
    error::Result,
    tui::{
        app::{App, Screen},
        components,
        event::{Event, EventHandler},
        screens,
    },
};

/// Run the interactive form until the operator quits
pub async fn run_tui(config: Config) -> Result<()> {
    let tick_rate = Duration::from_millis(config.ui.tick_rate_ms);
    let mut app = App::new(config);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;

    let mut events = EventHandler::new(tick_rate);
    let result = event_loop(&mut terminal, &mut app, &mut events).await;

    // Stop reading input before the terminal leaves raw mode
    events.shutdown().await;

    // Always hand the terminal back, even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    info!("Form closed");
    result
}

async fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| render_ui(frame, app))?;

        match events.next().await {
            Some(Event::Key(key)) => app.handle_key(key),
            Some(Event::Tick) | Some(Event::Resize(_, _)) => {}
            None => break,
        }
    }
    Ok(())
}

pub fn render_ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content
            Constraint::Length(3), // Status bar
        ])
        .split(frame.size());

    components::header::render(frame, chunks[0], app);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(24), Constraint::Min(0)])
        .split(chunks[1]);

    components::sidebar::render(frame, body[0], app);

    match app.current_screen {
        Screen::Check => screens::check::render(frame, body[1], app),
        Screen::Guide => screens::guide::render(frame, body[1], app),
    }

    render_status_bar(frame, chunks[2], app);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let screen_indicator = match app.current_screen {
        Screen::Check => "Einzelfallprüfung",
        Screen::Guide => "Anleitung",
    };

    let text = Line::from(vec![
        Span::styled(
            format!(" {} ", screen_indicator),
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(app.status_message.clone(), Style::default().fg(Color::Gray)),
        Span::raw(" | "),
        Span::styled("Tab: Nächstes Feld", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled("Strg+E: Export", Style::default().fg(Color::Yellow)),
        Span::raw(" | "),
        Span::styled("Esc: Beenden", Style::default().fg(Color::Red)),
    ]);

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));

    frame.render_widget(paragraph, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::Field;
    use chrono::NaiveDate;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use ratatui::backend::TestBackend;

    fn screen_text(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 44)).unwrap();
        terminal.draw(|frame| render_ui(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn app() -> App {
        App::with_date(Config::default(), NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
    }

    #[test]
    fn test_renders_check_screen() {
        let text = screen_text(&app());
        assert!(text.contains("Imsys-Einbauprüfung"));
        assert!(text.contains("Kundendaten"));
        assert!(text.contains("Daten speichern"));
        assert!(text.contains("Anleitung"));
    }

    #[test]
    fn test_log_shows_rule_behind_verdict() {
        let mut app = app();
        app.focus = Field::InstallationTypes;
        app.handle_key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE));

        let text = screen_text(&app);
        assert!(text.contains("Ergebnis: 30 EUR Rechnung"));
        assert!(text.contains("Regel low-power"));
    }

    #[test]
    fn test_renders_guide_screen() {
        let mut app = app();
        app.show_screen(Screen::Guide);
        let text = screen_text(&app);
        assert!(text.contains("§14a EnWG"));
        assert!(text.contains("Massendatenprüfung"));
    }
}
