use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{
    assessment::Thresholds,
    error::{CheckError, Result},
    export::ExportFormat,
};

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "IMSYS";

/// Characters Excel refuses in worksheet names.
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub export: ExportConfig,
    #[serde(default)]
    pub ui: UiConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// Rated power (kW) up to which the administrative fee always applies
    pub fee_max_kw: f64,
    /// Rated power (kW) up to which a controllable installation is exempt
    pub controllable_max_kw: f64,
    /// Mean yearly consumption (kWh) from which no installation is required
    pub consumption_min_kwh: f64,
    /// Days after commissioning until the CLS module must be provisioned
    pub cls_deadline_days: u32,
    /// Treat an entered reading of 0 kWh as "not entered"
    pub zero_reading_is_unset: bool,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            fee_max_kw: 4.2,
            controllable_max_kw: 30.0,
            consumption_min_kwh: 6000.0,
            cls_deadline_days: 730,
            zero_reading_is_unset: true,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct ExportConfig {
    pub directory: String,
    pub file_prefix: String,
    pub sheet_name: String,
    pub format: ExportFormat,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
            file_prefix: "Imsys_Ergebnis".to_string(),
            sheet_name: "Ergebnis".to_string(),
            format: ExportFormat::Xlsx,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct UiConfig {
    pub tick_rate_ms: u64,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self { tick_rate_ms: 250 }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    pub filter: String,
    /// Log file used while the terminal UI owns the screen
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "imsys_check=info".to_string(),
            file: "imsys-check.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file, environment and `.env`.
    ///
    /// Without an explicit path the default file is optional and every key
    /// falls back to its built-in default.
    pub fn load(path: Option<&str>) -> Result<Self> {
        dotenv::dotenv().ok();

        let file = match path {
            Some(p) => config::File::with_name(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_PATH).required(false),
        };

        let settings = config::Config::builder()
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let rules = &self.rules;
        for (name, value) in [
            ("rules.fee_max_kw", rules.fee_max_kw),
            ("rules.controllable_max_kw", rules.controllable_max_kw),
            ("rules.consumption_min_kwh", rules.consumption_min_kwh),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CheckError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if rules.fee_max_kw > rules.controllable_max_kw {
            return Err(CheckError::Config(format!(
                "rules.fee_max_kw ({}) exceeds rules.controllable_max_kw ({})",
                rules.fee_max_kw, rules.controllable_max_kw
            )));
        }

        let sheet = self.export.sheet_name.trim();
        if sheet.is_empty() || sheet.chars().count() > 31 {
            return Err(CheckError::Config(
                "export.sheet_name must be 1 to 31 characters".to_string(),
            ));
        }
        if sheet.contains(INVALID_SHEET_CHARS) {
            return Err(CheckError::Config(format!(
                "export.sheet_name contains an invalid character: {}",
                sheet
            )));
        }

        if self.export.file_prefix.trim().is_empty() {
            return Err(CheckError::Config(
                "export.file_prefix must not be empty".to_string(),
            ));
        }

        if self.ui.tick_rate_ms == 0 {
            return Err(CheckError::Config(
                "ui.tick_rate_ms must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds::from(&self.rules)
    }

    /// Write this configuration as TOML, refusing to overwrite an existing file.
    pub fn write_default_file(&self, path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(true)
    }
}
