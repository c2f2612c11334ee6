use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;

use climate_readiness::chart;
use climate_readiness::config::{self, ConfigSource};
use climate_readiness::output;
use climate_readiness::scoring::{self, DriverScores, EvaluationMode};

const EXIT_SUCCESS: i32 = 0;
const EXIT_RUNTIME: i32 = 1;
const EXIT_CONFIG: i32 = 2;
const EXIT_USAGE: i32 = 3;

// Off-screen size for `compute --chart`
const TEXT_CHART_WIDTH: u16 = 72;
const TEXT_CHART_HEIGHT: u16 = 24;

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq)]
enum OutputFormat {
    /// Aligned two-column table
    #[default]
    Table,
    /// Tab-separated outcome and score, no header
    Tsv,
    /// Drivers, outcomes and per-factor breakdown
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Interactive simulator with sliders (default if no subcommand)
    Tui,
    /// Compute outcome scores once and print them
    Compute {
        /// Override a driver score, e.g. --set "Market Demand=2" (repeatable)
        #[arg(short, long = "set", value_name = "NAME=SCORE")]
        set: Vec<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Print the radar chart below the table (table format only)
        #[arg(long)]
        chart: bool,
    },
    /// List drivers, outcomes and factor weights
    Catalog,
}

#[derive(Parser, Debug)]
#[command(name = "climate-readiness")]
#[command(about = "Climate tech readiness simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/climate-readiness/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// How factors naming other outcomes are resolved (overrides config)
    #[arg(long, value_enum, global = true)]
    mode: Option<EvaluationMode>,

    /// Never draw the radar chart
    #[arg(long, global = true)]
    no_chart: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::Tui);
    let start_time = Instant::now();

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let (config, source) = match config::load_config(config_path) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if cli.verbose {
        match &source {
            ConfigSource::File(path) => eprintln!("Loaded config from {}", path.display()),
            ConfigSource::BuiltIn => eprintln!("No config file found, using built-in catalog"),
        }
    }

    let mode = cli.mode.unwrap_or_else(|| config.evaluation_mode());
    let chart_enabled = config.chart_enabled() && !cli.no_chart;
    let catalog = config.effective_catalog();

    // Validate catalog at startup
    if let Err(errors) = scoring::validate_catalog(&catalog, mode) {
        eprintln!("Catalog config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    if cli.verbose {
        eprintln!(
            "Catalog: {} drivers, {} outcomes ({} evaluation, chart {})",
            catalog.drivers.len(),
            catalog.outcomes.len(),
            mode.label(),
            if chart_enabled { "enabled" } else { "disabled" }
        );
    }

    match command {
        Commands::Tui => {
            let app = climate_readiness::tui::App::new(catalog, mode, chart_enabled, cli.verbose);
            if let Err(e) = climate_readiness::tui::run_tui(app).await {
                eprintln!("Terminal error: {:#}", e);
                std::process::exit(EXIT_RUNTIME);
            }
        }
        Commands::Compute { set, format, chart } => {
            if chart && format != OutputFormat::Table {
                eprintln!("--chart can only be used with --format table");
                std::process::exit(EXIT_USAGE);
            }

            let mut scores = DriverScores::from_catalog(&catalog);

            let mut overrides = Vec::with_capacity(set.len());
            for raw in &set {
                match scoring::parse_override(raw) {
                    Ok(o) => overrides.push(o),
                    Err(e) => {
                        eprintln!("Invalid --set: {:#}", e);
                        std::process::exit(EXIT_USAGE);
                    }
                }
            }

            match scores.apply_overrides(&overrides) {
                Ok(clamped) => {
                    if cli.verbose {
                        for c in clamped {
                            eprintln!(
                                "Clamped {}: {} -> {}",
                                c.name, c.requested, c.applied
                            );
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Invalid --set: {:#}", e);
                    std::process::exit(EXIT_USAGE);
                }
            }

            let outcomes = scoring::calculate_outcomes(&scores, &catalog, mode);
            let use_colors = output::should_use_colors();

            if cli.verbose {
                for outcome in &outcomes {
                    eprintln!("{}", output::format_breakdown(outcome, false));
                }
            }

            match format {
                OutputFormat::Table => {
                    println!("{}", output::format_outcome_table(&outcomes, use_colors));
                    if chart {
                        println!();
                        println!(
                            "{}",
                            chart::text_chart(
                                &outcomes,
                                chart_enabled,
                                TEXT_CHART_WIDTH,
                                TEXT_CHART_HEIGHT
                            )
                        );
                    }
                }
                OutputFormat::Tsv => println!("{}", output::format_tsv(&outcomes)),
                OutputFormat::Json => match output::format_json(&scores, &outcomes, mode) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Failed to serialize report: {}", e);
                        std::process::exit(EXIT_RUNTIME);
                    }
                },
            }

            if cli.verbose {
                eprintln!();
                eprintln!(
                    "Computed {} outcomes in {:?}",
                    outcomes.len(),
                    start_time.elapsed()
                );
            }
        }
        Commands::Catalog => {
            let use_colors = output::should_use_colors();
            println!("{}", output::format_catalog(&catalog, mode, use_colors));
        }
    }

    std::process::exit(EXIT_SUCCESS);
}
