//! Salesdash - synthetic sales analysis dashboard
//!
//! A CLI tool that generates a reproducible one-year sales dataset,
//! aggregates revenue by month, product and region, renders a
//! three-panel chart and prints summary statistics.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (invalid arguments or config, chart write failure, etc.)

mod analysis;
mod chart;
mod cli;
mod config;
mod generator;
mod models;
mod report;

use anyhow::{Context, Result};
use chart::{ChartOptions, DashboardData};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::{ChartConfig, Config, CONFIG_FILE_NAME};
use generator::GeneratorConfig;
use indicatif::{ProgressBar, ProgressStyle};
use models::{ReportMetadata, SalesReport};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Salesdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(&args) {
        error!("Analysis failed: {:#}", e);
        eprintln!("\nError: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salesdash.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "{} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to change the seed, date range, catalog, chart or report.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so that stdout carries only the report.
fn init_logging(args: &Args) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the pipeline: generate, aggregate, plot, print.
fn run(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;

    // Step 1: Generate the dataset
    let generator_config = GeneratorConfig::from(&config.generator);
    info!(
        "Generating sales from {} to {} (seed {})",
        generator_config.start, generator_config.end, generator_config.seed
    );

    let records = generator::generate_sales(generator_config.clone(), &config.catalog)
        .context("Invalid generator settings")?;
    info!("Generated {} sale records", records.len());

    // Step 2: Aggregate
    let metadata = ReportMetadata {
        generated_at: Utc::now(),
        seed: generator_config.seed,
        start: generator_config.start,
        end: generator_config.end,
        chart_path: None,
        duration_seconds: 0.0,
    };
    let mut report = report::build_report(&records, &config.report, metadata);
    debug!(
        "Aggregated {} months, {} products, {} regions",
        report.monthly.len(),
        report.by_product.len(),
        report.by_region.len()
    );

    // Step 3: Plot
    if args.no_chart {
        info!("Skipping chart rendering");
    } else {
        let path = render_chart(&report, &config.chart, args.show_progress())?;
        report.metadata.chart_path = Some(path.display().to_string());
    }

    report.metadata.duration_seconds = start_time.elapsed().as_secs_f64();

    // Step 4: Print
    match args.format {
        OutputFormat::Text => print!("{}", report::generate_text_report(&report)),
        OutputFormat::Json => println!("{}", report::generate_json_report(&report)?),
    }

    info!("Done in {:.2}s", report.metadata.duration_seconds);
    Ok(())
}

/// Render the dashboard image, with a spinner while it is drawn.
fn render_chart(report: &SalesReport, chart: &ChartConfig, show_progress: bool) -> Result<PathBuf> {
    let options = ChartOptions::from(chart);
    info!("Rendering dashboard to {}", options.output.display());

    let spinner = show_progress.then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Rendering charts...");
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let data = DashboardData {
        monthly: &report.monthly,
        by_product: &report.by_product,
        by_region: &report.by_region,
    };
    let result = chart::render_dashboard(&data, &options);

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result.with_context(|| format!("Failed to render chart to {}", options.output.display()))
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
