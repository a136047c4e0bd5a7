//! Font discovery and registration.
//!
//! Chart text is rasterized with the pure-Rust `ab_glyph` backend, which
//! needs font bytes registered up front. We look for a regular/bold pair
//! in the usual system locations unless a font file is configured.

use super::RenderError;
use plotters::style::{register_font, FontStyle};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::{debug, info};

/// Family name every chart element asks for.
pub const FAMILY: &str = "sans-serif";

/// Well-known (regular, bold) font locations, in order of preference.
const CANDIDATES: &[(&str, &str)] = &[
    (
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
        "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
        "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
        "/usr/share/fonts/liberation-sans/LiberationSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/truetype/noto/NotoSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/noto/NotoSans-Regular.ttf",
        "/usr/share/fonts/noto/NotoSans-Bold.ttf",
    ),
    (
        "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
        "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    ),
    (
        "/System/Library/Fonts/Supplemental/Arial.ttf",
        "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    ),
    ("/Library/Fonts/Arial.ttf", "/Library/Fonts/Arial Bold.ttf"),
    ("C:\\Windows\\Fonts\\arial.ttf", "C:\\Windows\\Fonts\\arialbd.ttf"),
];

/// Font files chosen for the chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontFaces {
    pub regular: PathBuf,
    /// Bold face, if one was found next to the regular face.
    pub bold: Option<PathBuf>,
}

/// Find the font files to use.
///
/// An explicit path wins and is used for both faces; otherwise the first
/// candidate whose regular face exists is picked.
pub fn discover(explicit: Option<&Path>) -> Option<FontFaces> {
    if let Some(path) = explicit {
        return path.is_file().then(|| FontFaces {
            regular: path.to_path_buf(),
            bold: None,
        });
    }

    CANDIDATES.iter().find_map(|(regular, bold)| {
        let regular = Path::new(regular);
        let bold = Path::new(bold);

        regular.is_file().then(|| FontFaces {
            regular: regular.to_path_buf(),
            bold: bold.is_file().then(|| bold.to_path_buf()),
        })
    })
}

static INSTALLED: OnceLock<FontFaces> = OnceLock::new();

/// Register the chart font with plotters. Only the first call does any work.
pub fn install(explicit: Option<&Path>) -> Result<&'static FontFaces, RenderError> {
    if let Some(faces) = INSTALLED.get() {
        return Ok(faces);
    }

    let faces = discover(explicit).ok_or(RenderError::FontNotFound)?;
    debug!("Using chart font: {}", faces.regular.display());

    let regular = read_font(&faces.regular)?;
    let bold = match faces.bold {
        Some(ref path) => read_font(path)?,
        None => regular,
    };

    let invalid = |path: &Path| RenderError::InvalidFont {
        path: path.to_path_buf(),
        reason: "not a TrueType/OpenType font".to_string(),
    };

    register_font(FAMILY, FontStyle::Normal, regular).map_err(|_| invalid(&faces.regular))?;
    register_font(FAMILY, FontStyle::Bold, bold)
        .map_err(|_| invalid(faces.bold.as_deref().unwrap_or(&faces.regular)))?;

    info!("Registered chart font {}", faces.regular.display());
    Ok(INSTALLED.get_or_init(|| faces))
}

/// Read a font file into memory for the rest of the process.
fn read_font(path: &Path) -> Result<&'static [u8], RenderError> {
    let bytes = std::fs::read(path).map_err(|source| RenderError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    // Registered fonts must outlive every chart drawn in this process.
    Ok(Box::leak(bytes.into_boxed_slice()))
}
