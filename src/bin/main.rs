//! Heron CLI - Compute KPI reports from CSV extracts
//!
//! Usage:
//!   heron list
//!   heron report <kpi> [--format text|json]
//!   heron all [--format text|json]
//!
//! Examples:
//!   heron --data-dir ./northwind report key-customers
//!   heron report "Sales Trends" --format json
//!   heron --top-n 10 report key-cities

use clap::{Parser, Subcommand, ValueEnum};
use heron::config::Settings;
use heron::report::{self, render, Kpi, ReportOutput};
use heron::store::TableStore;
use heron::telemetry;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "heron")]
#[command(about = "Heron - KPI reports over relational CSV extracts")]
#[command(version)]
struct Cli {
    /// Path to a heron.toml config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory containing the CSV extracts (overrides config)
    #[arg(short, long, global = true)]
    data_dir: Option<String>,

    /// Rows kept by top-N rankings (overrides config)
    #[arg(long, global = true)]
    top_n: Option<usize>,

    /// Revenue threshold for key customers (overrides config)
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the available KPIs
    List,

    /// Compute one KPI
    Report {
        /// KPI name or slug (e.g. "Key Customers", key-customers)
        kpi: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Compute every KPI in menu order
    All {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Aligned text tables
    Text,
    /// Pretty-printed JSON
    Json,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match load_settings(&cli) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let level = if cli.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    telemetry::init(level);

    match cli.command {
        Commands::List => cmd_list(),
        Commands::Report { kpi, format } => cmd_report(&settings, &kpi, format),
        Commands::All { format } => cmd_all(&settings, format),
    }
}

fn load_settings(cli: &Cli) -> Result<Settings, heron::config::SettingsError> {
    let mut settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    if let Some(dir) = &cli.data_dir {
        settings.data.dir = dir.clone();
    }
    if let Some(top_n) = cli.top_n {
        settings.reports.top_n = top_n;
    }
    if let Some(threshold) = cli.threshold {
        settings.reports.key_customer_threshold = threshold;
    }
    settings.validate()?;
    Ok(settings)
}

fn cmd_list() -> ExitCode {
    println!("KPIs:");
    for kpi in Kpi::ALL {
        println!("  - {} ({})", kpi.label(), kpi.slug());
    }
    ExitCode::SUCCESS
}

fn load_store(settings: &Settings) -> Option<TableStore> {
    match TableStore::load(&settings.data) {
        Ok(store) => Some(store),
        Err(e) => {
            eprintln!("error: {}", e);
            None
        }
    }
}

fn print_output(output: &ReportOutput, format: &OutputFormat) -> bool {
    match format {
        OutputFormat::Text => {
            println!("{}", render::render_text(output));
            true
        }
        OutputFormat::Json => match render::render_json(output) {
            Ok(json) => {
                println!("{}", json);
                true
            }
            Err(e) => {
                eprintln!("error: failed to serialize report: {}", e);
                false
            }
        },
    }
}

fn cmd_report(settings: &Settings, name: &str, format: OutputFormat) -> ExitCode {
    let kpi = match Kpi::from_name(name) {
        Ok(kpi) => kpi,
        Err(e) => {
            eprintln!("error: {}", e);
            eprintln!("Run `heron list` to see available KPIs.");
            return ExitCode::FAILURE;
        }
    };

    let Some(store) = load_store(settings) else {
        return ExitCode::FAILURE;
    };

    match kpi.run(&store, &settings.reports) {
        Ok(output) if print_output(&output, &format) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_all(settings: &Settings, format: OutputFormat) -> ExitCode {
    let Some(store) = load_store(settings) else {
        return ExitCode::FAILURE;
    };

    let outputs = match report::run_all(&store, &settings.reports) {
        Ok(outputs) => outputs,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match format {
        OutputFormat::Text => {
            for output in &outputs {
                println!("{}", render::render_text(output));
            }
            ExitCode::SUCCESS
        }
        OutputFormat::Json => match serde_json::to_string_pretty(&outputs) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("error: failed to serialize reports: {}", e);
                ExitCode::FAILURE
            }
        },
    }
}
