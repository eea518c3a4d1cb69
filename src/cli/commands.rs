use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use imsys_check::{
    case::{ConsumptionProfile, CustomerCase, InstallationProfile, InstallationType, SiteProfile},
    error::{CheckError, Result},
    export::ExportFormat,
    utils,
};

#[derive(Parser)]
#[command(name = "imsys-check")]
#[command(about = "§14a EnWG single-case check for smart-meter installation and the 30 EUR fee")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to configuration file (default: config/default.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive form (default)
    Tui,

    /// Evaluate one case from command-line arguments
    Check(CheckArgs),

    /// Show the decision table with the configured thresholds
    Rules,

    /// Show usage instructions
    Guide,

    /// Write the default configuration file and show effective settings
    Init,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Customer first name (Vorname)
    #[arg(long)]
    pub first_name: Option<String>,

    /// Customer last name (Nachname)
    #[arg(long)]
    pub last_name: Option<String>,

    /// Customer address (Adresse)
    #[arg(long)]
    pub address: Option<String>,

    /// Meter identifier (Zählernummer)
    #[arg(long)]
    pub meter_id: Option<String>,

    /// A controllable installation is present
    #[arg(long)]
    pub installation: bool,

    /// Installation types, comma separated: pv, wallbox, storage, pv-storage, heat-pump
    #[arg(long, value_delimiter = ',')]
    pub types: Vec<String>,

    /// Total rated power in kW
    #[arg(long)]
    pub power: Option<String>,

    /// Installation is controllable via steering box (default: true)
    #[arg(long)]
    pub controllable: Option<bool>,

    /// Planned commissioning date, YYYY-MM-DD or DD.MM.YYYY (default: today)
    #[arg(long)]
    pub commissioning: Option<String>,

    /// Yearly consumption in kWh for the last three years, oldest first
    #[arg(long, value_delimiter = ',')]
    pub consumption: Vec<String>,

    /// Write the result file into this directory
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export file format (default from configuration)
    #[arg(long, value_enum)]
    pub format: Option<ExportFormat>,

    /// Overwrite an existing export file without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Print the assessment as JSON
    #[arg(long)]
    pub json: bool,
}

impl CheckArgs {
    /// Customer data counts as submitted as soon as any field is given
    pub fn customer(&self) -> Option<CustomerCase> {
        let fields = [&self.first_name, &self.last_name, &self.address, &self.meter_id];
        if fields.iter().all(|f| f.is_none()) {
            return None;
        }
        let value = |f: &Option<String>| f.clone().unwrap_or_default();
        Some(CustomerCase::new(
            value(&self.first_name),
            value(&self.last_name),
            value(&self.address),
            value(&self.meter_id),
        ))
    }

    /// Build the profile of the selected branch.
    ///
    /// Missing required values are not an error: they leave the profile
    /// without a verdict, or yield `None` when no rated power was given.
    /// Values that are present but malformed are rejected.
    pub fn site_profile(
        &self,
        today: NaiveDate,
        zero_reading_is_unset: bool,
    ) -> Result<Option<SiteProfile>> {
        if self.installation {
            if !self.consumption.is_empty() {
                return Err(CheckError::invalid_input(
                    "consumption",
                    "readings are only used when no installation is present",
                ));
            }
            Ok(self
                .installation_profile(today)?
                .map(SiteProfile::Installation))
        } else {
            if !self.types.is_empty()
                || self.power.is_some()
                || self.controllable.is_some()
                || self.commissioning.is_some()
            {
                return Err(CheckError::invalid_input(
                    "installation",
                    "installation fields require --installation",
                ));
            }
            self.consumption_profile(zero_reading_is_unset)
                .map(|profile| Some(SiteProfile::Consumption(profile)))
        }
    }

    /// An empty type selection is kept; the evaluator gives it no verdict
    fn installation_profile(&self, today: NaiveDate) -> Result<Option<InstallationProfile>> {
        let types = self
            .types
            .iter()
            .filter(|t| !t.trim().is_empty())
            .map(|t| t.parse::<InstallationType>())
            .collect::<Result<Vec<_>>>()?;

        let rated_power_kw = match self.power.as_deref().map(str::trim) {
            Some(power) if !power.is_empty() => utils::parse_power("power", power)?,
            _ => return Ok(None),
        };

        let commissioning = match &self.commissioning {
            Some(date) => utils::parse_date("commissioning", date)?,
            None => today,
        };

        InstallationProfile::new(
            types,
            rated_power_kw,
            self.controllable.unwrap_or(true),
            commissioning,
        )
        .map(Some)
    }

    fn consumption_profile(&self, zero_reading_is_unset: bool) -> Result<ConsumptionProfile> {
        if self.consumption.len() > 3 {
            return Err(CheckError::invalid_input(
                "consumption",
                format!(
                    "at most three yearly readings (r1,r2,r3), got {}",
                    self.consumption.len()
                ),
            ));
        }

        // Readings not given count as not entered

        let mut entries = [None; 3];
        for (slot, raw) in entries.iter_mut().zip(&self.consumption) {
            *slot = utils::parse_reading("consumption", raw)?;
        }
        Ok(ConsumptionProfile::from_entries(entries, zero_reading_is_unset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imsys_check::{EligibilityEvaluator, Verdict};

    fn parse(args: &[&str]) -> CheckArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => args,
            _ => panic!("expected check command"),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn test_no_subcommand_defaults_to_form() {
        let cli = Cli::try_parse_from(["imsys-check"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_installation_arguments() {
        let args = parse(&[
            "imsys-check",
            "check",
            "--installation",
            "--types",
            "pv,wallbox",
            "--power",
            "11,5",
            "--controllable",
            "false",
            "--commissioning",
            "01.01.2024",
        ]);

        match args.site_profile(today(), true).unwrap() {
            Some(SiteProfile::Installation(profile)) => {
                assert_eq!(profile.types.len(), 2);
                assert_eq!(profile.rated_power_kw, 11.5);
                assert!(!profile.controllable);
                assert_eq!(profile.commissioning, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
            }
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn test_installation_defaults() {
        let args = parse(&["imsys-check", "check", "--installation", "--types", "heat-pump", "--power", "9"]);
        match args.site_profile(today(), true).unwrap() {
            Some(SiteProfile::Installation(profile)) => {
                assert!(profile.controllable);
                assert_eq!(profile.commissioning, today());
            }
            other => panic!("unexpected profile {:?}", other),
        }
    }

    fn verdict_for(args: &[&str]) -> Option<Verdict> {
        parse(args)
            .site_profile(today(), true)
            .unwrap()
            .and_then(|profile| EligibilityEvaluator::default().evaluate(&profile))
            .map(|assessment| assessment.verdict)
    }

    #[test]
    fn test_installation_without_types_has_no_verdict() {
        let args = parse(&["imsys-check", "check", "--installation", "--power", "9"]);
        match args.site_profile(today(), true).unwrap() {
            Some(SiteProfile::Installation(profile)) => assert!(profile.types.is_empty()),
            other => panic!("unexpected profile {:?}", other),
        }
        assert_eq!(verdict_for(&["imsys-check", "check", "--installation", "--power", "9"]), None);
    }

    #[test]
    fn test_installation_without_power_has_no_profile() {
        let args = parse(&["imsys-check", "check", "--installation", "--types", "pv"]);
        assert_eq!(args.site_profile(today(), true).unwrap(), None);

        let blank = parse(&["imsys-check", "check", "--installation", "--types", "pv", "--power", " "]);
        assert_eq!(blank.site_profile(today(), true).unwrap(), None);
    }

    #[test]
    fn test_malformed_power_is_rejected() {
        let args = parse(&["imsys-check", "check", "--installation", "--types", "pv", "--power", "abc"]);
        assert!(matches!(
            args.site_profile(today(), true),
            Err(CheckError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_consumption_arguments() {
        let args = parse(&["imsys-check", "check", "--consumption", "5000,6000,7000"]);
        match args.site_profile(today(), true).unwrap() {
            Some(SiteProfile::Consumption(profile)) => {
                assert_eq!(profile.complete_readings(), Some([5000, 6000, 7000]));
            }
            other => panic!("unexpected profile {:?}", other),
        }
    }

    #[test]
    fn test_missing_readings_have_no_verdict() {
        for readings in ["7000,0,7000", "7000,,7000", "7000,7000"] {
            let args = ["imsys-check", "check", "--consumption", readings];
            assert_eq!(verdict_for(&args), None, "readings {}", readings);
        }

        let args = parse(&["imsys-check", "check", "--consumption", "7000,7000"]);
        match args.site_profile(today(), true).unwrap() {
            Some(SiteProfile::Consumption(profile)) => {
                assert_eq!(profile.readings(), [Some(7000), Some(7000), None]);
            }
            other => panic!("unexpected profile {:?}", other),
        }

        assert_eq!(
            verdict_for(&["imsys-check", "check", "--consumption", "7000,7000,7000"]),
            Some(Verdict::NoInstallationRequired)
        );
    }

    #[test]
    fn test_more_than_three_readings_are_rejected() {
        let args = parse(&["imsys-check", "check", "--consumption", "1,2,3,4"]);
        assert!(matches!(
            args.site_profile(today(), true),
            Err(CheckError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_mixed_branches_are_rejected() {
        let args = parse(&["imsys-check", "check", "--power", "5", "--consumption", "1,2,3"]);
        assert!(args.site_profile(today(), true).is_err());

        let args = parse(&[
            "imsys-check", "check", "--installation", "--types", "pv", "--power", "5",
            "--consumption", "1,2,3",
        ]);
        assert!(args.site_profile(today(), true).is_err());
    }

    #[test]
    fn test_customer_from_arguments() {
        let args = parse(&["imsys-check", "check", "--meter-id", "123456", "--consumption", "1,2,3"]);
        let customer = args.customer().unwrap();
        assert_eq!(customer.meter_id, "123456");
        assert_eq!(customer.first_name, "");

        let anonymous = parse(&["imsys-check", "check", "--consumption", "1,2,3"]);
        assert!(anonymous.customer().is_none());
    }

    #[test]
    fn test_export_format_flag() {
        let args = parse(&[
            "imsys-check", "check", "--consumption", "1,2,3", "--export", "out", "--format", "csv",
        ]);
        assert_eq!(args.format, Some(ExportFormat::Csv));
        assert_eq!(args.export, Some(PathBuf::from("out")));
    }
}
