//! Three-panel dashboard drawing.
//!
//! Drawing is generic over the plotters backend so the same code writes
//! PNG and SVG files.

use super::fonts::{self, FAMILY};
use super::palette::{self, PLASMA, VIRIDIS};
use super::{ChartFormat, ChartOptions, RenderError};
use crate::models::{Aggregate, YearMonth};
use crate::report::format::dollars;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::PathBuf;
use tracing::{debug, info};

const TREND_COLOR: RGBColor = RGBColor(0x2E, 0x86, 0xAB);

const MONTHLY_TITLE: &str = "Monthly Sales Trend";
const PRODUCT_TITLE: &str = "Top-Selling Products";
const REGION_TITLE: &str = "Regional Sales Performance";

/// The three aggregates the dashboard plots.
#[derive(Debug, Clone, Copy)]
pub struct DashboardData<'a> {
    /// Revenue per month, in calendar order.
    pub monthly: &'a [Aggregate<YearMonth>],
    /// Revenue per product, highest first.
    pub by_product: &'a [Aggregate],
    /// Revenue per region, highest first.
    pub by_region: &'a [Aggregate],
}

/// Render the dashboard to `options.output`, overwriting any existing file.
pub fn render_dashboard(
    data: &DashboardData<'_>,
    options: &ChartOptions,
) -> Result<PathBuf, RenderError> {
    let format = ChartFormat::from_path(&options.output)
        .ok_or_else(|| RenderError::UnsupportedFormat(options.output.clone()))?;

    fonts::install(options.font.as_deref())?;

    if let Some(parent) = options.output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|source| RenderError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    debug!(
        "Rendering {:?} dashboard at {}x{}",
        format, options.size.0, options.size.1
    );

    match format {
        ChartFormat::Png => {
            let root = BitMapBackend::new(&options.output, options.size).into_drawing_area();
            draw_dashboard(&root, data)?;
            root.present().map_err(RenderError::draw)?;
        }
        ChartFormat::Svg => {
            let root = SVGBackend::new(&options.output, options.size).into_drawing_area();
            draw_dashboard(&root, data)?;
            root.present().map_err(RenderError::draw)?;
        }
    }

    info!("Dashboard written to {}", options.output.display());
    Ok(options.output.clone())
}

/// Draw all three panels side by side.
pub fn draw_dashboard<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    data: &DashboardData<'_>,
) -> Result<(), RenderError> {
    root.fill(&WHITE).map_err(RenderError::draw)?;

    let panels = root.split_evenly((1, 3));
    draw_monthly_trend(&panels[0], data.monthly)?;
    draw_product_bars(&panels[1], data.by_product)?;
    draw_region_bars(&panels[2], data.by_region)?;

    Ok(())
}

/// Pixel sizes scaled to the panel height. Base values are for a 500px panel.
struct Sizes {
    title: f64,
    axis_desc: f64,
    tick: f64,
    value_label: f64,
    margin: u32,
    x_label_area: u32,
    y_label_area: u32,
    line_width: u32,
    marker: u32,
    bar_gap: u32,
}

impl Sizes {
    fn for_area<DB: DrawingBackend>(area: &DrawingArea<DB, Shift>) -> Self {
        let (_, height) = area.dim_in_pixel();
        let scale = height as f64 / 500.0;
        let px = |base: f64| (base * scale).round().max(1.0) as u32;

        Self {
            title: 18.0 * scale,
            axis_desc: 13.0 * scale,
            tick: 11.0 * scale,
            value_label: 10.0 * scale,
            margin: px(12.0),
            x_label_area: px(45.0),
            y_label_area: px(85.0),
            line_width: px(2.0),
            marker: px(4.0),
            bar_gap: px(6.0),
        }
    }

    fn title_font(&self) -> TextStyle<'static> {
        (FAMILY, self.title).into_font().style(FontStyle::Bold).color(&BLACK)
    }

    fn axis_font(&self) -> TextStyle<'static> {
        (FAMILY, self.axis_desc).into_font().style(FontStyle::Bold).color(&BLACK)
    }

    fn tick_font(&self) -> TextStyle<'static> {
        (FAMILY, self.tick).into_font().color(&BLACK)
    }

    fn value_font(&self, pos: Pos) -> TextStyle<'static> {
        (FAMILY, self.value_label)
            .into_font()
            .style(FontStyle::Bold)
            .color(&BLACK)
            .pos(pos)
    }
}

/// Axis label for a category segment; blank outside the category list.
fn segment_label<T: AsRef<str>>(value: &SegmentValue<u32>, labels: &[T]) -> String {
    match value {
        SegmentValue::CenterOf(i) | SegmentValue::Exact(i) => labels
            .get(*i as usize)
            .map(|label| label.as_ref().to_string())
            .unwrap_or_default(),
        SegmentValue::Last => String::new(),
    }
}

/// Month tick labels as `YYYY-MM` period strings.
fn month_labels(monthly: &[Aggregate<YearMonth>]) -> Vec<String> {
    monthly.iter().map(|m| m.key.to_string()).collect()
}

/// Product of each bar row, bottom row first. Row `i` holds rank `i`,
/// so the top seller sits on the bottom row.
fn product_rows(by_product: &[Aggregate]) -> Vec<&str> {
    by_product.iter().map(|a| a.key.as_str()).collect()
}

/// Upper bound of a revenue axis with `headroom` above the tallest value.
fn axis_max<K>(aggregates: &[Aggregate<K>], headroom: f64) -> f64 {
    let max = aggregates.iter().map(|a| a.revenue).max().unwrap_or(0);
    if max == 0 {
        1.0
    } else {
        max as f64 * headroom
    }
}

fn draw_placeholder<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    title: &str,
    sizes: &Sizes,
) -> Result<(), RenderError> {
    let (width, height) = area.dim_in_pixel();
    let style = sizes.title_font().pos(Pos::new(HPos::Center, VPos::Center));

    area.draw(&Text::new(
        format!("{}: no data", title),
        ((width / 2) as i32, (height / 2) as i32),
        style,
    ))
    .map_err(RenderError::draw)
}

fn draw_monthly_trend<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    monthly: &[Aggregate<YearMonth>],
) -> Result<(), RenderError> {
    let sizes = Sizes::for_area(area);
    if monthly.is_empty() {
        return draw_placeholder(area, MONTHLY_TITLE, &sizes);
    }

    let labels = month_labels(monthly);
    let last = monthly.len() as u32 - 1;

    let mut chart = ChartBuilder::on(area)
        .caption(MONTHLY_TITLE, sizes.title_font())
        .margin(sizes.margin)
        .x_label_area_size(sizes.x_label_area)
        .y_label_area_size(sizes.y_label_area)
        .build_cartesian_2d((0..last).into_segmented(), 0f64..axis_max(monthly, 1.1))
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(monthly.len().min(24))
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_labels(8)
        .y_label_formatter(&|v| dollars(v.max(0.0).round() as u64))
        .x_desc("Month")
        .y_desc("Revenue ($)")
        .axis_desc_style(sizes.axis_font())
        .label_style(sizes.tick_font())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .draw()
        .map_err(RenderError::draw)?;

    let points: Vec<(SegmentValue<u32>, f64)> = monthly
        .iter()
        .enumerate()
        .map(|(i, m)| (SegmentValue::CenterOf(i as u32), m.revenue as f64))
        .collect();

    chart
        .draw_series(LineSeries::new(
            points.clone(),
            TREND_COLOR.stroke_width(sizes.line_width),
        ))
        .map_err(RenderError::draw)?;

    chart
        .draw_series(
            points
                .into_iter()
                .map(|point| Circle::new(point, sizes.marker, TREND_COLOR.filled())),
        )
        .map_err(RenderError::draw)?;

    Ok(())
}

fn draw_product_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    by_product: &[Aggregate],
) -> Result<(), RenderError> {
    let sizes = Sizes::for_area(area);
    if by_product.is_empty() {
        return draw_placeholder(area, PRODUCT_TITLE, &sizes);
    }

    let n = by_product.len() as u32;
    let x_max = axis_max(by_product, 1.3);

    let row_labels = product_rows(by_product);

    let mut chart = ChartBuilder::on(area)
        .caption(PRODUCT_TITLE, sizes.title_font())
        .margin(sizes.margin)
        .x_label_area_size(sizes.x_label_area)
        .y_label_area_size(sizes.y_label_area)
        .build_cartesian_2d(0f64..x_max, (0..n - 1).into_segmented())
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_labels(5)
        .x_label_formatter(&|v| dollars(v.max(0.0).round() as u64))
        .y_labels(by_product.len())
        .y_label_formatter(&|v| segment_label(v, &row_labels))
        .x_desc("Revenue ($)")
        .y_desc("Product")
        .axis_desc_style(sizes.axis_font())
        .label_style(sizes.tick_font())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .draw()
        .map_err(RenderError::draw)?;

    let colors = palette::spread(VIRIDIS, by_product.len());

    chart
        .draw_series(by_product.iter().zip(&colors).enumerate().map(
            |(rank, (agg, color))| {
                let row = rank as u32;
                let mut bar = Rectangle::new(
                    [
                        (0.0, SegmentValue::Exact(row)),
                        (agg.revenue as f64, SegmentValue::Exact(row + 1)),
                    ],
                    color.filled(),
                );
                bar.set_margin(sizes.bar_gap, sizes.bar_gap, 0, 0);
                bar
            },
        ))
        .map_err(RenderError::draw)?;

    let nudge = x_max * 0.01;
    chart
        .draw_series(by_product.iter().enumerate().map(|(rank, agg)| {
            Text::new(
                dollars(agg.revenue),
                (agg.revenue as f64 + nudge, SegmentValue::CenterOf(rank as u32)),
                sizes.value_font(Pos::new(HPos::Left, VPos::Center)),
            )
        }))
        .map_err(RenderError::draw)?;

    Ok(())
}

fn draw_region_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    by_region: &[Aggregate],
) -> Result<(), RenderError> {
    let sizes = Sizes::for_area(area);
    if by_region.is_empty() {
        return draw_placeholder(area, REGION_TITLE, &sizes);
    }

    let n = by_region.len() as u32;
    let y_max = axis_max(by_region, 1.15);
    let labels: Vec<&str> = by_region.iter().map(|a| a.key.as_str()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption(REGION_TITLE, sizes.title_font())
        .margin(sizes.margin)
        .x_label_area_size(sizes.x_label_area)
        .y_label_area_size(sizes.y_label_area)
        .build_cartesian_2d((0..n - 1).into_segmented(), 0f64..y_max)
        .map_err(RenderError::draw)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(by_region.len())
        .x_label_formatter(&|v| segment_label(v, &labels))
        .y_labels(8)
        .y_label_formatter(&|v| dollars(v.max(0.0).round() as u64))
        .x_desc("Region")
        .y_desc("Revenue ($)")
        .axis_desc_style(sizes.axis_font())
        .label_style(sizes.tick_font())
        .bold_line_style(BLACK.mix(0.15))
        .light_line_style(WHITE)
        .draw()
        .map_err(RenderError::draw)?;

    let colors = palette::spread(PLASMA, by_region.len());
    let (width, _) = area.dim_in_pixel();
    // Bars fill about 60% of their slot.
    let side_gap = (width / (5 * n.max(1))).max(1);

    chart
        .draw_series(by_region.iter().zip(&colors).enumerate().map(
            |(i, (agg, color))| {
                let i = i as u32;
                let mut bar = Rectangle::new(
                    [
                        (SegmentValue::Exact(i), 0.0),
                        (SegmentValue::Exact(i + 1), agg.revenue as f64),
                    ],
                    color.filled(),
                );
                bar.set_margin(0, 0, side_gap, side_gap);
                bar
            },
        ))
        .map_err(RenderError::draw)?;

    let nudge = y_max * 0.01;
    chart
        .draw_series(by_region.iter().enumerate().map(|(i, agg)| {
            Text::new(
                dollars(agg.revenue),
                (SegmentValue::CenterOf(i as u32), agg.revenue as f64 + nudge),
                sizes.value_font(Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))
        .map_err(RenderError::draw)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{revenue_by_month, revenue_by_product, revenue_by_region};
    use crate::generator::{generate_sales, GeneratorConfig};
    use crate::models::Catalog;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth { year, month }
    }

    #[test]
    fn test_segment_label() {
        let labels = vec!["North", "South"];
        assert_eq!(segment_label(&SegmentValue::CenterOf(0), &labels), "North");
        assert_eq!(segment_label(&SegmentValue::Exact(1), &labels), "South");
        assert_eq!(segment_label(&SegmentValue::CenterOf(2), &labels), "");
        assert_eq!(segment_label(&SegmentValue::Last, &labels), "");
    }

    #[test]
    fn test_month_labels_are_periods() {
        let monthly = vec![
            Aggregate::new(ym(2023, 1), 1),
            Aggregate::new(ym(2023, 12), 1),
            Aggregate::new(ym(2024, 2), 1),
        ];
        assert_eq!(month_labels(&monthly), vec!["2023-01", "2023-12", "2024-02"]);
    }

    #[test]
    fn test_top_product_on_bottom_row() {
        let by_product = vec![
            Aggregate::new("Laptop".to_string(), 900),
            Aggregate::new("Tablet".to_string(), 400),
            Aggregate::new("Mouse".to_string(), 50),
        ];

        let rows = product_rows(&by_product);
        assert_eq!(rows[0], "Laptop");
        assert_eq!(rows, vec!["Laptop", "Tablet", "Mouse"]);
        assert_eq!(segment_label(&SegmentValue::CenterOf(0), &rows), "Laptop");
    }

    #[test]
    fn test_axis_max() {
        let empty: Vec<Aggregate> = Vec::new();
        assert_eq!(axis_max(&empty, 1.1), 1.0);

        let values = vec![
            Aggregate::new("a".to_string(), 100),
            Aggregate::new("b".to_string(), 40),
        ];
        assert!((axis_max(&values, 1.5) - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_unsupported_format() {
        let options = ChartOptions {
            output: PathBuf::from("chart.bmp"),
            size: (300, 100),
            font: None,
        };
        let data = DashboardData {
            monthly: &[],
            by_product: &[],
            by_region: &[],
        };

        assert!(matches!(
            render_dashboard(&data, &options),
            Err(RenderError::UnsupportedFormat(_))
        ));
    }

    fn render_default_dataset(file_name: &str) -> Option<(tempfile::TempDir, PathBuf)> {
        if fonts::discover(None).is_none() {
            eprintln!("skipping: no system font available");
            return None;
        }

        let records = generate_sales(GeneratorConfig::default(), &Catalog::default()).unwrap();
        let monthly = revenue_by_month(&records);
        let by_product = revenue_by_product(&records);
        let by_region = revenue_by_region(&records);
        let data = DashboardData {
            monthly: &monthly,
            by_product: &by_product,
            by_region: &by_region,
        };

        let dir = tempfile::tempdir().unwrap();
        let options = ChartOptions {
            output: dir.path().join("nested").join(file_name),
            size: (1200, 400),
            font: None,
        };

        let written = render_dashboard(&data, &options).unwrap();
        Some((dir, written))
    }

    #[test]
    fn test_render_png() {
        let Some((_dir, path)) = render_default_dataset("dashboard.png") else {
            return;
        };

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn test_render_svg_contains_titles() {
        let Some((_dir, path)) = render_default_dataset("dashboard.svg") else {
            return;
        };

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains(MONTHLY_TITLE));
        assert!(svg.contains(PRODUCT_TITLE));
        assert!(svg.contains(REGION_TITLE));
        assert!(svg.contains("Laptop"));
    }

    #[test]
    fn test_render_empty_data_draws_placeholders() {
        if fonts::discover(None).is_none() {
            return;
        }

        let dir = tempfile::tempdir().unwrap();
        let options = ChartOptions {
            output: dir.path().join("empty.svg"),
            size: (900, 300),
            font: None,
        };
        let data = DashboardData {
            monthly: &[],
            by_product: &[],
            by_region: &[],
        };

        render_dashboard(&data, &options).unwrap();
        let svg = std::fs::read_to_string(&options.output).unwrap();
        assert!(svg.contains("no data"));
    }
}
