//! Data models for the sales dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing sale records, aggregates, and reports.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// Whole US dollars. All money in the dataset is integral, so sums are exact.
pub type Dollars = u64;

/// A calendar month, used as the grouping key for the time axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A product with its fixed unit price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Display name, unique within a catalog.
    pub name: String,
    /// Unit price in dollars.
    pub price: Dollars,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Dollars) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

/// The products and regions sales are drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Sales regions.
    #[serde(default = "default_regions")]
    pub regions: Vec<String>,

    /// Products with their fixed prices.
    #[serde(default = "default_products")]
    pub products: Vec<Product>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self {
            regions: default_regions(),
            products: default_products(),
        }
    }
}

fn default_products() -> Vec<Product> {
    vec![
        Product::new("Laptop", 899),
        Product::new("Smartphone", 699),
        Product::new("Tablet", 399),
        Product::new("Headphones", 149),
        Product::new("Smartwatch", 299),
        Product::new("Camera", 799),
        Product::new("Speaker", 199),
        Product::new("Monitor", 349),
        Product::new("Keyboard", 79),
        Product::new("Mouse", 49),
    ]
}

fn default_regions() -> Vec<String> {
    vec!["North", "South", "East", "West", "Central"]
        .into_iter()
        .map(String::from)
        .collect()
}

#[cfg(test)]
impl Catalog {
    /// Look up the fixed price of a product by name.
    pub fn price_of(&self, product: &str) -> Option<Dollars> {
        self.products
            .iter()
            .find(|p| p.name == product)
            .map(|p| p.price)
    }
}

/// A single synthetic sale.
///
/// Fields are private so that `revenue` always equals
/// `quantity * unit_price`; construct through [`SaleRecord::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaleRecord {
    date: NaiveDate,
    product: String,
    region: String,
    quantity: u32,
    unit_price: Dollars,
    revenue: Dollars,
}

impl SaleRecord {
    /// Creates a record, deriving revenue from the product's fixed price.
    pub fn new(date: NaiveDate, product: &Product, region: &str, quantity: u32) -> Self {
        Self {
            date,
            product: product.name.clone(),
            region: region.to_string(),
            quantity,
            unit_price: product.price,
            revenue: u64::from(quantity) * product.price,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn product(&self) -> &str {
        &self.product
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn unit_price(&self) -> Dollars {
        self.unit_price
    }

    pub fn revenue(&self) -> Dollars {
        self.revenue
    }

    /// The month this sale is grouped under.
    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }
}

/// Total revenue for one grouping key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Aggregate<K = String> {
    pub key: K,
    pub revenue: Dollars,
}

impl<K> Aggregate<K> {
    pub fn new(key: K, revenue: Dollars) -> Self {
        Self { key, revenue }
    }
}

/// Units sold for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitsSold {
    pub product: String,
    pub quantity: u64,
}

/// Mean, best and worst month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyStats {
    /// Mean revenue over the months present in the data.
    pub average: f64,
    pub best: Aggregate<YearMonth>,
    pub worst: Aggregate<YearMonth>,
}

/// Headline numbers for the generated dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetOverview {
    pub total_records: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_revenue: Dollars,
}

/// Metadata about a run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Seed the dataset was generated from.
    pub seed: u64,
    /// First day of the generated range.
    pub start: NaiveDate,
    /// Last day of the generated range.
    pub end: NaiveDate,
    /// Where the chart was written, if it was rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<String>,
    /// Wall-clock duration of the run in seconds.
    pub duration_seconds: f64,
}

/// The complete analysis of one generated dataset.
#[derive(Debug, Clone, Serialize)]
pub struct SalesReport {
    pub metadata: ReportMetadata,
    pub overview: DatasetOverview,
    /// Revenue per month, in calendar order.
    pub monthly: Vec<Aggregate<YearMonth>>,
    /// Revenue per product, highest first.
    pub by_product: Vec<Aggregate>,
    /// Revenue per region, highest first.
    pub by_region: Vec<Aggregate>,
    /// Units sold per product, highest revenue first.
    pub units_by_product: Vec<UnitsSold>,
    pub top_products: Vec<Aggregate>,
    pub top_regions: Vec<Aggregate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_stats: Option<MonthlyStats>,
    /// The first few records of the dataset.
    pub preview: Vec<SaleRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_revenue_is_quantity_times_price() {
        let laptop = Product::new("Laptop", 899);
        let record = SaleRecord::new(day(2023, 3, 14), &laptop, "North", 7);

        assert_eq!(record.unit_price(), 899);
        assert_eq!(record.revenue(), 7 * 899);
        assert_eq!(record.product(), "Laptop");
        assert_eq!(record.region(), "North");
    }

    #[test]
    fn test_year_month_display_and_ordering() {
        let jan = YearMonth::of(day(2023, 1, 31));
        let feb = YearMonth::of(day(2023, 2, 1));
        let dec_prev = YearMonth::of(day(2022, 12, 31));

        assert_eq!(jan.to_string(), "2023-01");
        assert!(dec_prev < jan);
        assert!(jan < feb);
    }

    #[test]
    fn test_year_month_serializes_as_string() {
        let json = serde_json::to_string(&YearMonth::of(day(2023, 9, 5))).unwrap();
        assert_eq!(json, "\"2023-09\"");
    }

    #[test]
    fn test_default_catalog_prices() {
        let catalog = Catalog::default();

        assert_eq!(catalog.products.len(), 10);
        assert_eq!(catalog.regions.len(), 5);
        assert_eq!(catalog.price_of("Laptop"), Some(899));
        assert_eq!(catalog.price_of("Mouse"), Some(49));
        assert_eq!(catalog.price_of("Toaster"), None);
    }

    #[test]
    fn test_sale_record_month() {
        let mouse = Product::new("Mouse", 49);
        let record = SaleRecord::new(day(2023, 11, 30), &mouse, "West", 1);
        assert_eq!(record.month(), YearMonth { year: 2023, month: 11 });
    }
}
