use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::{
    case::SiteDraft,
    tui::{app::App, components},
};

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Customer
            Constraint::Length(8), // Installation or readings
            Constraint::Min(7),    // Result
            Constraint::Length(6), // Log
        ])
        .split(area);

    components::customer_form::render(frame, chunks[0], app);
    components::site_form::render(frame, chunks[1], app);

    match app.session.site() {
        SiteDraft::Consumption(_) if app.assessment().is_some() => {
            let row = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[2]);
            components::result::render(frame, row[0], app);
            components::chart::render(frame, row[1], app);
        }
        _ => components::result::render(frame, chunks[2], app),
    }

    components::logs::render(frame, chunks[3], app);
}
