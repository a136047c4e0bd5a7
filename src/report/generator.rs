//! Console report generation.
//!
//! This module assembles the [`SalesReport`] for a dataset and renders it
//! either as the plain-text summary printed to the terminal or as JSON.

use super::format::{amount_cents, dollars_cents};
use crate::analysis::{
    monthly_stats, overview, revenue_by_month, revenue_by_product, revenue_by_region, top_n,
    units_by_product,
};
use crate::config::ReportConfig;
use crate::models::{
    Aggregate, DatasetOverview, MonthlyStats, ReportMetadata, SaleRecord, SalesReport,
};
use anyhow::Result;

const RULE_WIDTH: usize = 60;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Aggregate a dataset into a complete report.
pub fn build_report(
    records: &[SaleRecord],
    settings: &ReportConfig,
    metadata: ReportMetadata,
) -> SalesReport {
    let monthly = revenue_by_month(records);
    let by_product = revenue_by_product(records);
    let by_region = revenue_by_region(records);

    SalesReport {
        metadata,
        overview: overview(records),
        monthly_stats: monthly_stats(&monthly),
        top_products: top_n(&by_product, settings.top_n),
        top_regions: top_n(&by_region, settings.top_n),
        units_by_product: units_by_product(records),
        preview: records.iter().take(settings.preview_rows).cloned().collect(),
        monthly,
        by_product,
        by_region,
    }
}

/// Generate the complete plain-text report.
pub fn generate_text_report(report: &SalesReport) -> String {
    let mut output = String::new();

    output.push_str(&generate_overview_section(&report.overview));
    output.push_str(&generate_preview_section(&report.preview));
    output.push_str(&generate_chart_section(report.metadata.chart_path.as_deref()));
    output.push_str(&generate_summary_section(report));
    output.push_str(&generate_footer());

    output
}

/// Generate the dataset overview section.
fn generate_overview_section(overview: &DatasetOverview) -> String {
    let mut section = String::new();

    section.push_str("Sales Data Analysis\n");
    section.push_str(&rule());
    section.push('\n');

    section.push_str("\nDataset Overview:\n");
    section.push_str(&format!("Total Records: {}\n", overview.total_records));

    match (overview.first_date, overview.last_date) {
        (Some(first), Some(last)) => {
            section.push_str(&format!("Date Range: {} to {}\n", first, last));
        }
        _ => section.push_str("Date Range: n/a\n"),
    }

    section.push_str(&format!(
        "Total Revenue: {}\n",
        dollars_cents(overview.total_revenue)
    ));

    section
}

/// Generate the data preview table.
fn generate_preview_section(preview: &[SaleRecord]) -> String {
    if preview.is_empty() {
        return String::new();
    }

    let mut section = String::new();
    section.push_str("\nFirst few records:\n");
    section.push_str(&generate_preview_table(preview));
    section
}

/// Right-aligned table of records, one row per record with a leading index.
fn generate_preview_table(records: &[SaleRecord]) -> String {
    const HEADERS: [&str; 8] = [
        "", "Date", "Product", "Region", "Quantity", "Price", "Revenue", "Month",
    ];

    let rows: Vec<[String; 8]> = records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            [
                i.to_string(),
                r.date().to_string(),
                r.product().to_string(),
                r.region().to_string(),
                r.quantity().to_string(),
                r.unit_price().to_string(),
                r.revenue().to_string(),
                r.month().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.len());
        }
    }

    let format_row = |cells: &[&str]| -> String {
        let line: Vec<String> = cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!("{:>width$}", cell, width = *width))
            .collect();
        format!("{}\n", line.join("  "))
    };

    let mut table = format_row(&HEADERS[..]);
    for row in &rows {
        let cells: Vec<&str> = row.iter().map(String::as_str).collect();
        table.push_str(&format_row(&cells));
    }

    table
}

/// Generate the line naming the chart file.
fn generate_chart_section(chart_path: Option<&str>) -> String {
    let mut section = String::new();

    section.push('\n');
    section.push_str(&rule());
    section.push('\n');
    match chart_path {
        Some(path) => section.push_str(&format!("Visualizations saved as '{}'\n", path)),
        None => section.push_str("Chart rendering skipped\n"),
    }
    section.push_str(&rule());
    section.push('\n');

    section
}

/// Generate the summary statistics section.
fn generate_summary_section(report: &SalesReport) -> String {
    let mut section = String::new();

    section.push('\n');
    section.push_str(&rule());
    section.push_str("\nSALES ANALYSIS SUMMARY\n");
    section.push_str(&rule());
    section.push('\n');

    section.push_str(&generate_ranking(
        &format!("Top {} Products by Revenue", report.top_products.len()),
        &report.top_products,
    ));
    section.push_str(&generate_ranking(
        &format!("Top {} Regions by Revenue", report.top_regions.len()),
        &report.top_regions,
    ));
    section.push_str(&generate_monthly_section(report.monthly_stats.as_ref()));

    section
}

/// Numbered list of aggregates.
fn generate_ranking(title: &str, aggregates: &[Aggregate]) -> String {
    let mut section = format!("\n{}:\n", title);

    for (i, agg) in aggregates.iter().enumerate() {
        section.push_str(&format!(
            "{}. {}: {}\n",
            i + 1,
            agg.key,
            dollars_cents(agg.revenue)
        ));
    }

    section
}

fn generate_monthly_section(stats: Option<&MonthlyStats>) -> String {
    let mut section = String::from("\nMonthly Statistics:\n");

    let Some(stats) = stats else {
        section.push_str("No monthly data\n");
        return section;
    };

    section.push_str(&format!(
        "Average Monthly Revenue: {}\n",
        amount_cents(stats.average)
    ));
    section.push_str(&format!(
        "Best Month: {} ({})\n",
        stats.best.key,
        dollars_cents(stats.best.revenue)
    ));
    section.push_str(&format!(
        "Worst Month: {} ({})\n",
        stats.worst.key,
        dollars_cents(stats.worst.revenue)
    ));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    format!("\n{}\nAnalysis Complete!\n{}\n", rule(), rule())
}

/// Generate a JSON report.
pub fn generate_json_report(report: &SalesReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
