//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salesdash.toml` files. Every field has a default, and the defaults
//! reproduce the fixed one-year dataset exactly.

use crate::chart::ChartFormat;
use crate::models::Catalog;
use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".salesdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset generation settings.
    #[serde(default)]
    pub generator: GeneratorSettings,

    /// Products, prices and regions.
    #[serde(default)]
    pub catalog: Catalog,

    /// Chart rendering settings.
    #[serde(default)]
    pub chart: ChartConfig,

    /// Console report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Dataset generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratorSettings {
    /// RNG seed.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// First day of sales, `YYYY-MM-DD`.
    #[serde(default = "default_start")]
    pub start: NaiveDate,

    /// Last day of sales, `YYYY-MM-DD`.
    #[serde(default = "default_end")]
    pub end: NaiveDate,

    /// Fewest records per day.
    #[serde(default = "default_min_records")]
    pub min_records_per_day: u32,

    /// Most records per day.
    #[serde(default = "default_max_records")]
    pub max_records_per_day: u32,

    /// Largest quantity on a single sale.
    #[serde(default = "default_max_quantity")]
    pub max_quantity: u32,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            start: default_start(),
            end: default_end(),
            min_records_per_day: default_min_records(),
            max_records_per_day: default_max_records(),
            max_quantity: default_max_quantity(),
        }
    }
}

fn default_seed() -> u64 {
    42
}

fn default_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap_or_default()
}

fn default_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 12, 31).unwrap_or_default()
}

fn default_min_records() -> u32 {
    5
}

fn default_max_records() -> u32 {
    14
}

fn default_max_quantity() -> u32 {
    9
}

/// Chart rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Output image path. The extension selects PNG or SVG.
    #[serde(default = "default_chart_output")]
    pub output: PathBuf,

    /// Image width in pixels.
    #[serde(default = "default_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_height")]
    pub height: u32,

    /// TrueType/OpenType font used for all chart text.
    /// If unset, common system font locations are searched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<PathBuf>,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            output: default_chart_output(),
            width: default_width(),
            height: default_height(),
            font: None,
        }
    }
}

fn default_chart_output() -> PathBuf {
    PathBuf::from("sales_analysis_dashboard.png")
}

fn default_width() -> u32 {
    4200 // 14in at 300dpi
}

fn default_height() -> u32 {
    1500 // 5in at 300dpi
}

/// Console report settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// How many products/regions the summary lists.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// How many records the data preview shows.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_top_n() -> usize {
    3
}

fn default_preview_rows() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.salesdash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(seed) = args.seed {
            self.generator.seed = seed;
        }
        if let Some(start) = args.start {
            self.generator.start = start;
        }
        if let Some(end) = args.end {
            self.generator.end = end;
        }

        if let Some(ref output) = args.output {
            self.chart.output = output.clone();
        }
        if let Some(ref font) = args.font {
            self.chart.font = Some(font.clone());
        }

        if let Some(top) = args.top {
            self.report.top_n = top;
        }
        if let Some(rows) = args.preview_rows {
            self.report.preview_rows = rows;
        }
    }

    /// Check settings that can only be judged after merging.
    ///
    /// Generator and catalog consistency is checked by the generator itself.
    pub fn validate(&self) -> Result<()> {
        if self.report.top_n == 0 {
            bail!("report.top_n must be at least 1");
        }

        if self.chart.width == 0 || self.chart.height == 0 {
            bail!(
                "chart size must be non-zero (got {}x{})",
                self.chart.width,
                self.chart.height
            );
        }

        if ChartFormat::from_path(&self.chart.output).is_none() {
            bail!(
                "Unsupported chart format for {} (use .png or .svg)",
                self.chart.output.display()
            );
        }

        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
