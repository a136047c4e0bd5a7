//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every flag is optional: with none given the
//! run uses the configuration file, then the built-in defaults.

use crate::chart::ChartFormat;
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

/// Salesdash - synthetic sales dataset with an analysis dashboard
///
/// Generates one year of randomized sales, aggregates revenue by month,
/// product and region, renders a three-panel chart and prints summary
/// statistics.
///
/// Examples:
///   salesdash
///   salesdash --seed 7 --output dashboard.svg
///   salesdash --start 2024-01-01 --end 2024-06-30 --top 5
///   salesdash --format json --no-chart
///   salesdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Random seed for the generated dataset
    ///
    /// The same seed always produces the same dataset. Default: 42.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// First day of generated sales (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub start: Option<NaiveDate>,

    /// Last day of generated sales (YYYY-MM-DD, inclusive)
    #[arg(long, value_name = "DATE")]
    pub end: Option<NaiveDate>,

    /// Output path for the chart image (.png or .svg)
    ///
    /// Default: sales_analysis_dashboard.png
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Font file used for chart text
    ///
    /// If not specified, common system font locations are searched
    #[arg(long, value_name = "FILE")]
    pub font: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salesdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Summary output format (text, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Number of products and regions listed in the summary
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Number of records shown in the data preview
    #[arg(long, value_name = "COUNT")]
    pub preview_rows: Option<usize>,

    /// Skip rendering the chart
    #[arg(long)]
    pub no_chart: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salesdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let (Some(start), Some(end)) = (self.start, self.end) {
            if start > end {
                return Err(format!("--start ({}) is after --end ({})", start, end));
            }
        }

        if let Some(ref output) = self.output {
            if ChartFormat::from_path(output).is_none() {
                return Err(format!(
                    "Output must end in .png or .svg: {}",
                    output.display()
                ));
            }
        }

        if let Some(ref font) = self.font {
            if !font.is_file() {
                return Err(format!("Font file does not exist: {}", font.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Whether progress spinners should be drawn.
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.format == OutputFormat::Text
    }
}

#[cfg(test)]
impl Args {
    /// Arguments as if the binary were run with no flags.
    pub fn default_for_test() -> Self {
        Args {
            seed: None,
            start: None,
            end: None,
            output: None,
            font: None,
            config: None,
            format: OutputFormat::Text,
            top: None,
            preview_rows: None,
            no_chart: false,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_is_valid() {
        let args = Args::try_parse_from(["salesdash"]).unwrap();
        assert!(args.validate().is_ok());
        assert_eq!(args.format, OutputFormat::Text);
        assert!(args.output.is_none());
        assert!(args.top.is_none());
    }

    #[test]
    fn test_seed_comes_only_from_flag() {
        let args = Args::try_parse_from(["salesdash"]).unwrap();
        assert_eq!(args.seed, None);

        let args = Args::try_parse_from(["salesdash", "--seed", "7"]).unwrap();
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "salesdash",
            "--seed",
            "7",
            "--start",
            "2024-01-01",
            "--end",
            "2024-03-31",
            "-o",
            "dash.svg",
            "--format",
            "json",
            "--top",
            "5",
            "--no-chart",
        ])
        .unwrap();

        assert_eq!(args.seed, Some(7));
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(args.end, NaiveDate::from_ymd_opt(2024, 3, 31));
        assert_eq!(args.output, Some(PathBuf::from("dash.svg")));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.top, Some(5));
        assert!(args.no_chart);
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_invalid_date_rejected_by_parser() {
        assert!(Args::try_parse_from(["salesdash", "--start", "2023-13-01"]).is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = Args::default_for_test();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_reversed_dates() {
        let mut args = Args::default_for_test();
        args.start = NaiveDate::from_ymd_opt(2023, 6, 1);
        args.end = NaiveDate::from_ymd_opt(2023, 5, 1);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_output_extension() {
        let mut args = Args::default_for_test();
        args.output = Some(PathBuf::from("chart.gif"));
        assert!(args.validate().is_err());

        args.output = Some(PathBuf::from("chart.PNG"));
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_validation_zero_top() {
        let mut args = Args::default_for_test();
        args.top = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default_for_test();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
        assert!(!args.show_progress());
    }
}
