use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{collections::HashMap, path::PathBuf};
use tracing::{info, warn};
use tui_input::{backend::crossterm::EventHandler as InputHandler, Input};

use crate::{
    assessment::{Assessment, EligibilityEvaluator, Severity},
    case::{CaseSession, CustomerCase, InstallationType, SiteDraft},
    config::Config,
    export::Exporter,
    utils,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Check,
    Guide,
}

/// Focusable elements of the check form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    FirstName,
    LastName,
    Address,
    MeterId,
    Save,
    HasInstallation,
    InstallationTypes,
    Power,
    Controllable,
    Commissioning,
    Reading(usize),
    Export,
}

impl Field {
    pub fn label(&self) -> &'static str {
        match self {
            Field::FirstName => "Vorname",
            Field::LastName => "Nachname",
            Field::Address => "Adresse",
            Field::MeterId => "Zählernummer",
            Field::Save => "Daten speichern",
            Field::HasInstallation => "Steuerbare Anlage vorhanden?",
            Field::InstallationTypes => "Anlagen",
            Field::Power => "Gesamtleistung (kW)",
            Field::Controllable => "Steuerbar (Steuerbox)?",
            Field::Commissioning => "Inbetriebnahme",
            Field::Reading(index) => crate::case::READING_LABELS[*index],
            Field::Export => "Ergebnis exportieren",
        }
    }

    fn is_text(&self) -> bool {
        matches!(
            self,
            Field::FirstName
                | Field::LastName
                | Field::Address
                | Field::MeterId
                | Field::Power
                | Field::Commissioning
                | Field::Reading(_)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub level: LogLevel,
    pub message: String,
    /// Decision-table rule behind a verdict entry
    pub rule_id: Option<&'static str>,
}

pub struct App {
    // UI State
    pub current_screen: Screen,
    pub should_quit: bool,
    pub focus: Field,
    pub type_cursor: usize,
    pub status_message: String,
    pub logs: Vec<LogEntry>,
    pub field_errors: HashMap<Field, String>,
    pub last_export: Option<PathBuf>,
    last_rule: Option<&'static str>,

    // Text inputs
    pub first_name: Input,
    pub last_name: Input,
    pub address: Input,
    pub meter_id: Input,
    pub power: Input,
    pub commissioning: Input,
    pub readings: [Input; 3],

    // Case
    pub config: Config,
    pub session: CaseSession,
    evaluator: EligibilityEvaluator,
    exporter: Exporter,
    today: NaiveDate,
}

impl App {
    pub fn new(config: Config) -> Self {
        Self::with_date(config, Local::now().date_naive())
    }

    /// Build the app with a fixed "today", the commissioning default
    pub fn with_date(config: Config, today: NaiveDate) -> Self {
        let evaluator = EligibilityEvaluator::new(config.thresholds());
        let exporter = Exporter::new(&config.export);
        let session = CaseSession::new(today, config.rules.zero_reading_is_unset);

        let mut app = Self {
            current_screen: Screen::Check,
            should_quit: false,
            focus: Field::FirstName,
            type_cursor: 0,
            status_message: "Bereit".to_string(),
            logs: Vec::new(),
            field_errors: HashMap::new(),
            last_export: None,
            last_rule: None,
            first_name: Input::default(),
            last_name: Input::default(),
            address: Input::default(),
            meter_id: Input::default(),
            power: Input::default(),
            commissioning: Input::default(),
            readings: Default::default(),
            config,
            session,
            evaluator,
            exporter,
            today,
        };
        app.reset_branch_inputs();
        app
    }

    pub fn assessment(&self) -> Option<Assessment> {
        self.session.assess(&self.evaluator)
    }

    pub fn field_error(&self, field: Field) -> Option<&str> {
        self.field_errors.get(&field).map(String::as_str)
    }

    /// Fields currently shown, in tab order
    pub fn visible_fields(&self) -> Vec<Field> {
        let mut fields = vec![
            Field::FirstName,
            Field::LastName,
            Field::Address,
            Field::MeterId,
            Field::Save,
            Field::HasInstallation,
        ];
        match self.session.site() {
            SiteDraft::Installation(draft) => {
                fields.push(Field::InstallationTypes);
                if !draft.types.is_empty() {
                    fields.extend([Field::Power, Field::Controllable, Field::Commissioning]);
                }
            }
            SiteDraft::Consumption(_) => {
                fields.extend([Field::Reading(0), Field::Reading(1), Field::Reading(2)]);
            }
        }
        fields.push(Field::Export);
        fields
    }

    pub fn input(&self, field: Field) -> Option<&Input> {
        match field {
            Field::FirstName => Some(&self.first_name),
            Field::LastName => Some(&self.last_name),
            Field::Address => Some(&self.address),
            Field::MeterId => Some(&self.meter_id),
            Field::Power => Some(&self.power),
            Field::Commissioning => Some(&self.commissioning),
            Field::Reading(index) => self.readings.get(index),
            _ => None,
        }
    }

    fn input_mut(&mut self, field: Field) -> Option<&mut Input> {
        match field {
            Field::FirstName => Some(&mut self.first_name),
            Field::LastName => Some(&mut self.last_name),
            Field::Address => Some(&mut self.address),
            Field::MeterId => Some(&mut self.meter_id),
            Field::Power => Some(&mut self.power),
            Field::Commissioning => Some(&mut self.commissioning),
            Field::Reading(index) => self.readings.get_mut(index),
            _ => None,
        }
    }

    // Navigation
    pub fn show_screen(&mut self, screen: Screen) {
        self.current_screen = screen;
    }

    pub fn next_field(&mut self) {
        let fields = self.visible_fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + 1) % fields.len()];
    }

    pub fn previous_field(&mut self) {
        let fields = self.visible_fields();
        let index = fields.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = fields[(index + fields.len() - 1) % fields.len()];
    }

    fn ensure_focus_visible(&mut self) {
        if !self.visible_fields().contains(&self.focus) {
            self.focus = Field::HasInstallation;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => {
                self.should_quit = true;
                return;
            }
            KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            KeyCode::F(1) => {
                self.show_screen(Screen::Check);
                return;
            }
            KeyCode::F(2) => {
                self.show_screen(Screen::Guide);
                return;
            }
            _ => {}
        }

        match self.current_screen {
            Screen::Guide => self.handle_guide_key(key),
            Screen::Check => {
                self.handle_check_key(key, ctrl);
                self.track_assessment();
            }
        }
    }

    /// Log the verdict whenever a different rule starts to apply
    fn track_assessment(&mut self) {
        let assessment = self.assessment();
        let rule_id = assessment.as_ref().map(|a| a.rule_id);
        if rule_id == self.last_rule {
            return;
        }
        self.last_rule = rule_id;

        let Some(assessment) = assessment else {
            return;
        };
        let level = match assessment.severity {
            Severity::Success => LogLevel::Success,
            Severity::Warning => LogLevel::Warning,
            Severity::Error => LogLevel::Error,
        };
        self.push_log(
            level,
            format!("Ergebnis: {}", assessment.verdict.label()),
            Some(assessment.rule_id),
        );
    }

    fn handle_guide_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Tab | KeyCode::BackTab => self.show_screen(Screen::Check),
            _ => {}
        }
    }

    fn handle_check_key(&mut self, key: KeyEvent, ctrl: bool) {
        match key.code {
            KeyCode::Char('s') if ctrl => return self.save_customer(),
            KeyCode::Char('e') if ctrl => return self.export(),
            KeyCode::Char('n') if ctrl => return self.new_case(),
            KeyCode::Tab | KeyCode::Down => return self.next_field(),
            KeyCode::BackTab | KeyCode::Up => return self.previous_field(),
            _ => {}
        }

        match self.focus {
            Field::Save => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.save_customer();
                }
            }
            Field::Export => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.export();
                }
            }
            Field::HasInstallation => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    let has_installation = !self.session.has_installation();
                    self.set_has_installation(has_installation);
                }
                KeyCode::Char('j') => self.set_has_installation(true),
                KeyCode::Char('n') => self.set_has_installation(false),
                _ => {}
            },
            Field::InstallationTypes => match key.code {
                KeyCode::Left => {
                    let len = InstallationType::ALL.len();
                    self.type_cursor = (self.type_cursor + len - 1) % len;
                }
                KeyCode::Right => {
                    self.type_cursor = (self.type_cursor + 1) % InstallationType::ALL.len();
                }
                KeyCode::Char(' ') => self.toggle_type_at_cursor(),
                KeyCode::Enter => self.next_field(),
                _ => {}
            },
            Field::Controllable => match key.code {
                KeyCode::Char(' ') | KeyCode::Enter | KeyCode::Left | KeyCode::Right => {
                    if let Some(draft) = self.session.installation_mut() {
                        draft.controllable = !draft.controllable;
                    }
                }
                _ => {}
            },
            field if field.is_text() => {
                if key.code == KeyCode::Enter {
                    self.next_field();
                    return;
                }
                if let Some(input) = self.input_mut(field) {
                    input.handle_event(&CrosstermEvent::Key(key));
                }
                self.sync_field(field);
            }
            _ => {}
        }
    }

    fn set_has_installation(&mut self, has_installation: bool) {
        if has_installation == self.session.has_installation() {
            return;
        }
        self.session.set_has_installation(has_installation);
        self.reset_branch_inputs();
        self.add_log(
            LogLevel::Info,
            if has_installation {
                "Steuerbare Anlage vorhanden: Ja"
            } else {
                "Steuerbare Anlage vorhanden: Nein"
            },
        );
    }

    fn toggle_type_at_cursor(&mut self) {
        let installation_type = InstallationType::ALL[self.type_cursor];
        if let Some(draft) = self.session.installation_mut() {
            let selected = draft.toggle_type(installation_type);
            let verb = if selected { "ausgewählt" } else { "abgewählt" };
            self.status_message = format!("{} {}", installation_type.label(), verb);
        }
        self.ensure_focus_visible();
    }

    /// Push the text of a branch input into the case draft
    fn sync_field(&mut self, field: Field) {
        let Some(value) = self.input(field).map(|input| input.value().to_string()) else {
            return;
        };

        let result = match field {
            Field::Power => utils::parse_power("Gesamtleistung", &value).map(|kw| {
                if let Some(draft) = self.session.installation_mut() {
                    draft.rated_power_kw = Some(kw);
                }
            }),
            Field::Commissioning => utils::parse_date("Inbetriebnahme", &value).map(|date| {
                if let Some(draft) = self.session.installation_mut() {
                    draft.commissioning = Some(date);
                }
            }),
            Field::Reading(index) => utils::parse_reading(field.label(), &value).map(|kwh| {
                if let Some(draft) = self.session.consumption_mut() {
                    draft.entries[index] = kwh;
                }
            }),
            // Customer fields are committed on save
            _ => return,
        };

        match result {
            Ok(()) => {
                self.field_errors.remove(&field);
            }
            Err(e) => {
                match field {
                    Field::Power => {
                        if let Some(draft) = self.session.installation_mut() {
                            draft.rated_power_kw = None;
                        }
                    }
                    Field::Commissioning => {
                        if let Some(draft) = self.session.installation_mut() {
                            draft.commissioning = None;
                        }
                    }
                    Field::Reading(index) => {
                        if let Some(draft) = self.session.consumption_mut() {
                            draft.entries[index] = None;
                        }
                    }
                    _ => {}
                }
                self.field_errors.insert(field, e.to_string());
            }
        }
    }

    /// Reset the branch inputs to the form defaults of the active branch
    fn reset_branch_inputs(&mut self) {
        self.power = Input::new("0".to_string());
        self.commissioning = Input::new(self.today.format("%Y-%m-%d").to_string());
        self.readings = Default::default();
        self.type_cursor = 0;
        self.field_errors
            .retain(|field, _| !matches!(field, Field::Power | Field::Commissioning | Field::Reading(_)));
    }

    // Actions
    pub fn save_customer(&mut self) {
        let customer = CustomerCase::new(
            self.first_name.value().trim(),
            self.last_name.value().trim(),
            self.address.value().trim(),
            self.meter_id.value().trim(),
        );
        let message = format!(
            "Kundendaten gespeichert für {}, Zähler: {}",
            customer.display_name(),
            customer.meter_id
        );
        self.session.submit_customer(customer);
        self.status_message = format!("✓ {}", message);
        self.add_log(LogLevel::Success, &message);
    }

    pub fn export(&mut self) {
        let Some(record) = self.session.export_record(&self.evaluator) else {
            let reason = if !self.session.is_submitted() {
                "Bitte zuerst die Kundendaten speichern"
            } else {
                "Kein Ergebnis – Pflichtangaben fehlen"
            };
            warn!("Export refused: {}", reason);
            self.status_message = reason.to_string();
            self.add_log(LogLevel::Warning, reason);
            return;
        };

        match self.exporter.write(&record) {
            Ok(path) => {
                let message = format!("Ergebnis exportiert: {}", path.display());
                self.status_message = format!("✓ {}", message);
                self.add_log(LogLevel::Success, &message);
                self.last_export = Some(path);
            }
            Err(e) => {
                let message = format!("Export fehlgeschlagen: {}", e);
                self.status_message = message.clone();
                self.add_log(LogLevel::Error, &message);
            }
        }
    }

    /// Discard the case and clear the form
    pub fn new_case(&mut self) {
        self.session.reset();
        self.first_name.reset();
        self.last_name.reset();
        self.address.reset();
        self.meter_id.reset();
        self.reset_branch_inputs();
        self.field_errors.clear();
        self.last_export = None;
        self.focus = Field::FirstName;
        self.status_message = "Neuer Fall".to_string();
        info!("Started a new case");
        self.add_log(LogLevel::Info, "Neuer Fall begonnen");
    }

    pub fn add_log(&mut self, level: LogLevel, message: &str) {
        self.push_log(level, message.to_string(), None);
    }

    fn push_log(&mut self, level: LogLevel, message: String, rule_id: Option<&'static str>) {
        self.logs.push(LogEntry {
            timestamp: Local::now(),
            level,
            message,
            rule_id,
        });
        if self.logs.len() > 100 {
            self.logs.remove(0);
        }
    }
}
