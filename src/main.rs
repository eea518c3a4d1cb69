mod cli;

use chrono::Local;
use clap::Parser;
use cli::{CheckArgs, Cli, Commands};
use colored::*;
use serde::Serialize;
use std::{fs::OpenOptions, path::Path, sync::Arc};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use imsys_check::{
    assessment::{Assessment, Severity, CONSUMPTION_RULES, INSTALLATION_RULES},
    case::{CustomerCase, SiteProfile, READING_LABELS},
    config::{Config, DEFAULT_CONFIG_PATH},
    error::{self, CheckError},
    export::{ExportRecord, Exporter},
    guide, tui, utils, EligibilityEvaluator,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match Config::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}", format!("Failed to load configuration: {}", e).red());
            std::process::exit(1);
        }
    };

    let interactive = matches!(cli.command, None | Some(Commands::Tui));
    init_tracing(&config, interactive);

    let result = match cli.command {
        None | Some(Commands::Tui) => {
            info!("Starting interactive form");
            tui::run_tui(config).await
        }

        Some(Commands::Check(args)) => check_case(&config, &args),

        Some(Commands::Rules) => {
            show_rules(&config);
            Ok(())
        }

        Some(Commands::Guide) => {
            show_guide();
            Ok(())
        }

        Some(Commands::Init) => initialize(&config, cli.config.as_deref()),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("{}", format!("Error: {}", e).red());
        std::process::exit(1);
    }
}

/// CLI commands log to stderr; the form logs to a file so the screen stays clean
fn init_tracing(config: &Config, to_file: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));

    if to_file {
        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&config.logging.file)
        {
            Ok(file) => {
                tracing_subscriber::fmt()
                    .with_env_filter(filter)
                    .with_ansi(false)
                    .with_writer(Arc::new(file))
                    .init();
            }
            Err(e) => {
                eprintln!(
                    "{}",
                    format!("Logging disabled, cannot open {}: {}", config.logging.file, e).yellow()
                );
            }
        }
        return;
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[derive(Serialize)]
struct CheckReport<'a> {
    customer: Option<&'a CustomerCase>,
    profile: Option<&'a SiteProfile>,
    assessment: Option<&'a Assessment>,
    result: Option<&'static str>,
    export_path: Option<String>,
}

fn check_case(config: &Config, args: &CheckArgs) -> error::Result<()> {
    let today = Local::now().date_naive();
    let evaluator = EligibilityEvaluator::new(config.thresholds());

    let customer = args.customer();
    let profile = args.site_profile(today, config.rules.zero_reading_is_unset)?;
    let assessment = profile
        .as_ref()
        .and_then(|profile| evaluator.evaluate(profile));

    let export_path = match &args.export {
        Some(directory) => {
            let customer = customer.as_ref().ok_or_else(|| {
                CheckError::Incomplete("customer data required for export".to_string())
            })?;
            let assessment = assessment.as_ref().ok_or_else(|| {
                CheckError::Incomplete("no result to export, a required field is missing".to_string())
            })?;

            let exporter = Exporter::new(&config.export)
                .with_directory(directory)
                .with_format(args.format.unwrap_or(config.export.format));
            export_result(&exporter, &ExportRecord::new(customer, assessment.verdict), args)?
        }
        None => None,
    };

    if args.json {
        let report = CheckReport {
            customer: customer.as_ref(),
            profile: profile.as_ref(),
            assessment: assessment.as_ref(),
            result: assessment.as_ref().map(|a| a.verdict.label()),
            export_path: export_path.as_ref().map(|p| p.display().to_string()),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print_case(customer.as_ref(), profile.as_ref(), assessment.as_ref());
    if let Some(path) = export_path {
        println!("\n{} {}", "✓ Ergebnis exportiert:".green(), path.display());
    }
    Ok(())
}

fn export_result(
    exporter: &Exporter,
    record: &ExportRecord,
    args: &CheckArgs,
) -> error::Result<Option<std::path::PathBuf>> {
    let path = exporter.target_path(record);
    if path.exists() && !args.yes {
        if args.json {
            return Err(CheckError::invalid_input(
                "export",
                format!("{} exists, pass --yes to overwrite", path.display()),
            ));
        }
        if !utils::confirm_action(&format!("{} exists. Overwrite?", path.display()))? {
            println!("Export cancelled");
            return Ok(None);
        }
    }
    exporter.write(record).map(Some)
}

fn print_case(
    customer: Option<&CustomerCase>,
    profile: Option<&SiteProfile>,
    assessment: Option<&Assessment>,
) {
    println!("{}", "=== §14a Imsys-Einbauprüfung ===".cyan().bold());

    if let Some(customer) = customer {
        println!("Kunde:          {}", customer.display_name());
        println!("Adresse:        {}", customer.address);
        println!("Zählernummer:   {}", customer.meter_id);
    }

    match profile {
        None => println!("Leistung:       -"),
        Some(SiteProfile::Installation(installation)) => {
            let types: Vec<_> = installation.types.iter().map(|t| t.label()).collect();
            if types.is_empty() {
                println!("Anlagen:        -");
            } else {
                println!("Anlagen:        {}", types.join(", "));
            }
            println!(
                "Leistung:       {} kW ({})",
                utils::format_decimal(installation.rated_power_kw),
                if installation.controllable { "steuerbar" } else { "nicht steuerbar" }
            );
            println!(
                "Inbetriebnahme: {}",
                utils::format_date(&installation.commissioning)
            );
        }
        Some(SiteProfile::Consumption(consumption)) => {
            for (label, reading) in READING_LABELS.iter().zip(consumption.readings()) {
                let value = reading.map_or_else(|| "-".to_string(), |kwh| format!("{} kWh", kwh));
                println!("{:<15} {}", format!("{}:", label), value);
            }
        }
    }

    let Some(assessment) = assessment else {
        println!(
            "\n{}",
            "Kein Ergebnis: Pflichtangaben fehlen (Anlagentyp, Leistung oder drei Jahresverbräuche; 0 kWh gilt als nicht erfasst).".yellow()
        );
        return;
    };

    if let Some(deadline) = assessment.cls_deadline {
        println!(
            "\nFrist für Bereitstellung des CLS-Moduls durch MSB: {}",
            utils::format_date(&deadline).bold()
        );
    }
    if let Some(average) = assessment.average_kwh {
        println!("\nDurchschnittsverbrauch: {}", utils::format_kwh(average).bold());
    }

    let verdict = assessment.verdict.label();
    let verdict = match assessment.severity {
        Severity::Success => verdict.green().bold(),
        Severity::Warning => verdict.yellow().bold(),
        Severity::Error => verdict.red().bold(),
    };
    println!("\nErgebnis:       {}", verdict);
    println!("                {}", assessment.explanation);
}

fn show_rules(config: &Config) {
    let thresholds = config.thresholds();
    let widths = [26, 40, 40];

    println!("{}", "=== Entscheidungstabelle (erste passende Regel gilt) ===".cyan().bold());

    println!("\n{}", "Steuerbare Anlage vorhanden:".yellow());
    utils::print_table_border(110);
    utils::print_table_row(&["Regel", "Bedingung", "Ergebnis"], &widths);
    utils::print_table_border(110);
    for rule in INSTALLATION_RULES {
        let criterion = (rule.criterion)(&thresholds);
        utils::print_table_row(&[rule.id, criterion.as_str(), rule.verdict.label()], &widths);
    }
    utils::print_table_border(110);
    println!(
        "CLS-Frist: Inbetriebnahme + {} Tage",
        thresholds.cls_deadline_days
    );

    println!("\n{}", "Keine Anlage (Durchschnitt der letzten drei Jahre):".yellow());
    utils::print_table_border(110);
    utils::print_table_row(&["Regel", "Bedingung", "Ergebnis"], &widths);
    utils::print_table_border(110);
    for rule in CONSUMPTION_RULES {
        let criterion = (rule.criterion)(&thresholds);
        utils::print_table_row(&[rule.id, criterion.as_str(), rule.verdict.label()], &widths);
    }
    utils::print_table_border(110);
    println!(
        "Verbrauch von 0 kWh gilt als nicht erfasst: {}",
        if config.rules.zero_reading_is_unset { "ja" } else { "nein" }
    );
}

fn show_guide() {
    println!("{}", guide::TITLE.cyan().bold());
    println!("\n{}", guide::INTRO);
    println!("\n{}", "So funktioniert es:".bold());
    for step in guide::STEPS {
        println!("  - {}", step);
    }
    println!("\n{}", guide::OUTLOOK.italic());
}

fn initialize(config: &Config, path: Option<&str>) -> error::Result<()> {
    let path = Path::new(path.unwrap_or(DEFAULT_CONFIG_PATH));

    if config.write_default_file(path)? {
        println!("{} {}", "✓ Configuration written to".green(), path.display());
    } else {
        println!("{} {}", "✓ Configuration exists at".green(), path.display());
    }

    println!("\n{}", "Configuration:".cyan());
    println!("  Fee up to:          {} kW", utils::format_decimal(config.rules.fee_max_kw));
    println!("  Controllable up to: {} kW", utils::format_decimal(config.rules.controllable_max_kw));
    println!("  Consumption from:   {} kWh", utils::format_decimal(config.rules.consumption_min_kwh));
    println!("  CLS deadline:       {} days", config.rules.cls_deadline_days);
    println!("  Zero is unset:      {}", config.rules.zero_reading_is_unset);
    println!("  Export directory:   {}", config.export.directory);
    println!("  Export format:      {}", config.export.format);
    println!("  Log file:           {}", config.logging.file);

    println!("\n{}", "Ready to use! Try running:".cyan());
    println!("  {} to open the form", "imsys-check".yellow());
    println!(
        "  {} for a scripted check",
        "imsys-check check --consumption 5000,6000,7000".yellow()
    );
    println!("  {} to audit the thresholds", "imsys-check rules".yellow());
    Ok(())
}
