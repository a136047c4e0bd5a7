//! Dashboard chart rendering.
//!
//! The dashboard is one image split into three panels: the monthly
//! revenue trend, revenue per product, and revenue per region.

pub mod fonts;
pub mod palette;
pub mod renderer;

pub use renderer::{render_dashboard, DashboardData};

use plotters::drawing::DrawingAreaErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while rendering the dashboard.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("unsupported chart format for {} (use .png or .svg)", .0.display())]
    UnsupportedFormat(PathBuf),

    #[error("no usable font found; set chart.font in .salesdash.toml or pass --font")]
    FontNotFound,

    #[error("invalid font {}: {reason}", .path.display())]
    InvalidFont { path: PathBuf, reason: String },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("drawing failed: {0}")]
    Draw(String),
}

impl RenderError {
    /// Flatten a plotters drawing error, whose type depends on the backend.
    pub fn draw<E: std::error::Error + Send + Sync>(err: DrawingAreaErrorKind<E>) -> Self {
        RenderError::Draw(err.to_string())
    }
}

/// Image format, chosen from the output file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartFormat {
    Png,
    Svg,
}

impl ChartFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "png" => Some(ChartFormat::Png),
            "svg" => Some(ChartFormat::Svg),
            _ => None,
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    /// Where the image is written.
    pub output: PathBuf,
    /// Image size in pixels.
    pub size: (u32, u32),
    /// Font file overriding system font discovery.
    pub font: Option<PathBuf>,
}

impl From<&crate::config::ChartConfig> for ChartOptions {
    fn from(config: &crate::config::ChartConfig) -> Self {
        Self {
            output: config.output.clone(),
            size: (config.width, config.height),
            font: config.font.clone(),
        }
    }
}
