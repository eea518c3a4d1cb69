pub mod csv_file;
pub mod record;
pub mod xlsx;

pub use record::{ExportRecord, HEADERS};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use crate::{config::ExportConfig, error::Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Xlsx,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Xlsx => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Writes the single-case result file
#[derive(Debug, Clone)]
pub struct Exporter {
    directory: PathBuf,
    file_prefix: String,
    sheet_name: String,
    format: ExportFormat,
}

impl Exporter {
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            directory: PathBuf::from(&config.directory),
            file_prefix: config.file_prefix.clone(),
            sheet_name: config.sheet_name.clone(),
            format: config.format,
        }
    }

    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.directory = directory.into();
        self
    }

    pub fn with_format(mut self, format: ExportFormat) -> Self {
        self.format = format;
        self
    }

    /// `Imsys_Ergebnis_<meter id>.<ext>`
    pub fn file_name(&self, meter_id: &str) -> String {
        format!(
            "{}_{}.{}",
            self.file_prefix,
            sanitize_file_component(meter_id),
            self.format.extension()
        )
    }

    pub fn target_path(&self, record: &ExportRecord) -> PathBuf {
        self.directory.join(self.file_name(&record.meter_id))
    }

    /// Serialize without touching the filesystem
    pub fn render(&self, record: &ExportRecord) -> Result<Vec<u8>> {
        match self.format {
            ExportFormat::Xlsx => xlsx::to_xlsx_bytes(record, &self.sheet_name),
            ExportFormat::Csv => csv_file::to_csv_bytes(record),
        }
    }

    /// Render and write the file, replacing an existing one
    pub fn write(&self, record: &ExportRecord) -> Result<PathBuf> {
        let bytes = self.render(record)?;
        let path = self.target_path(record);

        std::fs::create_dir_all(&self.directory)?;
        std::fs::write(&path, &bytes)?;

        info!(
            "Exported result for meter {} to {} ({} bytes)",
            record.meter_id,
            path.display(),
            bytes.len()
        );
        Ok(path)
    }
}

/// Replace characters that are unsafe in file names
pub fn sanitize_file_component(value: &str) -> String {
    let cleaned: String = value
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "unbekannt".to_string()
    } else {
        cleaned.to_string()
    }
}
