//! Synthetic sales generator.
//!
//! Produces one year (or any inclusive date range) of randomized sale
//! records from a seeded RNG, so the same seed always yields the same
//! dataset.

use crate::models::{Catalog, SaleRecord};
use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors raised when a generator configuration cannot produce a dataset.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GeneratorError {
    #[error("start date {start} is after end date {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("records per day must satisfy 1 <= min <= max (got {min}..={max})")]
    InvalidRecordsPerDay { min: u32, max: u32 },

    #[error("maximum quantity must be at least 1")]
    InvalidQuantity,

    #[error("catalog has no products")]
    EmptyCatalog,

    #[error("catalog has no regions")]
    NoRegions,

    #[error("product '{0}' has a price of zero")]
    ZeroPrice(String),

    #[error("product '{0}' is listed more than once")]
    DuplicateProduct(String),

    #[error("price of product '{0}' is too large for the configured date range and quantities")]
    PriceTooLarge(String),
}

/// Configuration for the sales generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// RNG seed.
    pub seed: u64,
    /// First day of sales (inclusive).
    pub start: NaiveDate,
    /// Last day of sales (inclusive).
    pub end: NaiveDate,
    /// Fewest records generated for a single day.
    pub min_records_per_day: u32,
    /// Most records generated for a single day.
    pub max_records_per_day: u32,
    /// Largest quantity on a single record. The smallest is always 1.
    pub max_quantity: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::from(&crate::config::GeneratorSettings::default())
    }
}

impl From<&crate::config::GeneratorSettings> for GeneratorConfig {
    fn from(settings: &crate::config::GeneratorSettings) -> Self {
        Self {
            seed: settings.seed,
            start: settings.start,
            end: settings.end,
            min_records_per_day: settings.min_records_per_day,
            max_records_per_day: settings.max_records_per_day,
            max_quantity: settings.max_quantity,
        }
    }
}

impl GeneratorConfig {
    /// Check the configuration against a catalog.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), GeneratorError> {
        if self.start > self.end {
            return Err(GeneratorError::InvalidDateRange {
                start: self.start,
                end: self.end,
            });
        }

        if self.min_records_per_day == 0 || self.min_records_per_day > self.max_records_per_day {
            return Err(GeneratorError::InvalidRecordsPerDay {
                min: self.min_records_per_day,
                max: self.max_records_per_day,
            });
        }

        if self.max_quantity == 0 {
            return Err(GeneratorError::InvalidQuantity);
        }

        if catalog.products.is_empty() {
            return Err(GeneratorError::EmptyCatalog);
        }

        if catalog.regions.is_empty() {
            return Err(GeneratorError::NoRegions);
        }

        // Worst case: every record sells max_quantity of the priciest product.
        let max_units = (self.day_count() as u64)
            .checked_mul(u64::from(self.max_records_per_day))
            .and_then(|records| records.checked_mul(u64::from(self.max_quantity)));

        let mut seen = HashSet::new();
        for product in &catalog.products {
            if product.price == 0 {
                return Err(GeneratorError::ZeroPrice(product.name.clone()));
            }
            if max_units
                .and_then(|units| units.checked_mul(product.price))
                .is_none()
            {
                return Err(GeneratorError::PriceTooLarge(product.name.clone()));
            }
            if !seen.insert(product.name.as_str()) {
                return Err(GeneratorError::DuplicateProduct(product.name.clone()));
            }
        }

        Ok(())
    }

    /// Number of days in the range, inclusive of both ends.
    pub fn day_count(&self) -> usize {
        if self.start > self.end {
            return 0;
        }
        (self.end - self.start).num_days() as usize + 1
    }

    /// Smallest and largest number of records this configuration can produce.
    pub fn record_bounds(&self) -> (usize, usize) {
        let days = self.day_count();
        (
            days * self.min_records_per_day as usize,
            days * self.max_records_per_day as usize,
        )
    }

    /// Midpoint of [`record_bounds`](Self::record_bounds), used to size the output.
    pub fn expected_record_count(&self) -> usize {
        let (lower, upper) = self.record_bounds();
        lower / 2 + upper / 2
    }
}

/// Seeded generator of sale records.
pub struct SalesGenerator<'a> {
    config: GeneratorConfig,
    catalog: &'a Catalog,
    rng: StdRng,
}

impl<'a> SalesGenerator<'a> {
    /// Create a generator, rejecting configurations that cannot produce data.
    pub fn new(config: GeneratorConfig, catalog: &'a Catalog) -> Result<Self, GeneratorError> {
        config.validate(catalog)?;

        Ok(Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            catalog,
        })
    }

    /// Generate every record for the configured date range, in date order.
    pub fn generate(&mut self) -> Vec<SaleRecord> {
        let catalog = self.catalog;
        let mut records = Vec::with_capacity(self.config.expected_record_count());

        let end = self.config.end;
        let (min_per_day, max_per_day) = (
            self.config.min_records_per_day,
            self.config.max_records_per_day,
        );
        let max_quantity = self.config.max_quantity;

        for date in self.config.start.iter_days().take_while(|day| *day <= end) {
            let count = self.rng.gen_range(min_per_day..=max_per_day);

            for _ in 0..count {
                let product = &catalog.products[self.rng.gen_range(0..catalog.products.len())];
                let region = &catalog.regions[self.rng.gen_range(0..catalog.regions.len())];
                let quantity = self.rng.gen_range(1..=max_quantity);

                records.push(SaleRecord::new(date, product, region, quantity));
            }
        }

        debug!(
            "Generated {} records over {} days (seed {})",
            records.len(),
            self.config.day_count(),
            self.config.seed
        );

        records
    }
}

/// Generate a dataset in one call.
pub fn generate_sales(
    config: GeneratorConfig,
    catalog: &Catalog,
) -> Result<Vec<SaleRecord>, GeneratorError> {
    Ok(SalesGenerator::new(config, catalog)?.generate())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Product;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_config_matches_fixed_constants() {
        let config = GeneratorConfig::default();
        assert_eq!(config.seed, 42);
        assert_eq!(config.start, day(2023, 1, 1));
        assert_eq!(config.end, day(2023, 12, 31));
        assert_eq!(config.min_records_per_day, 5);
        assert_eq!(config.max_records_per_day, 14);
        assert_eq!(config.max_quantity, 9);
        assert_eq!(config.day_count(), 365);
        assert_eq!(config.record_bounds(), (1825, 5110));
        assert_eq!(config.expected_record_count(), 3467);
    }

    #[test]
    fn test_output_sized_for_average_not_maximum() {
        let config = GeneratorConfig {
            start: day(2000, 1, 1),
            end: day(2099, 12, 31),
            min_records_per_day: 1,
            max_records_per_day: 1_000,
            ..GeneratorConfig::default()
        };
        let (lower, upper) = config.record_bounds();

        assert!(config.expected_record_count() >= lower);
        assert!(config.expected_record_count() <= (lower + upper) / 2);
        assert!(config.expected_record_count() < upper);
    }

    #[test]
    fn test_record_count_within_bounds() {
        let catalog = Catalog::default();
        let records = generate_sales(GeneratorConfig::default(), &catalog).unwrap();

        assert!(records.len() >= 1825, "too few records: {}", records.len());
        assert!(records.len() <= 5110, "too many records: {}", records.len());
    }

    #[test]
    fn test_revenue_matches_catalog_price() {
        let catalog = Catalog::default();
        let records = generate_sales(GeneratorConfig::default(), &catalog).unwrap();

        for record in &records {
            let price = catalog.price_of(record.product()).unwrap();
            assert_eq!(record.unit_price(), price);
            assert_eq!(record.revenue(), u64::from(record.quantity()) * price);
        }
    }

    #[test]
    fn test_values_within_ranges() {
        let catalog = Catalog::default();
        let config = GeneratorConfig::default();
        let records = generate_sales(config.clone(), &catalog).unwrap();

        for record in &records {
            assert!((1..=9).contains(&record.quantity()));
            assert!(record.date() >= config.start && record.date() <= config.end);
            assert!(catalog.regions.iter().any(|r| r == record.region()));
        }
    }

    #[test]
    fn test_every_day_has_records_in_range() {
        let catalog = Catalog::default();
        let records = generate_sales(GeneratorConfig::default(), &catalog).unwrap();

        let mut per_day = std::collections::BTreeMap::new();
        for record in &records {
            *per_day.entry(record.date()).or_insert(0u32) += 1;
        }

        assert_eq!(per_day.len(), 365);
        assert!(per_day.values().all(|count| (5..=14).contains(count)));
    }

    #[test]
    fn test_records_in_date_order() {
        let catalog = Catalog::default();
        let records = generate_sales(GeneratorConfig::default(), &catalog).unwrap();
        assert!(records.windows(2).all(|w| w[0].date() <= w[1].date()));
    }

    #[test]
    fn test_same_seed_same_dataset() {
        let catalog = Catalog::default();
        let first = generate_sales(GeneratorConfig::default(), &catalog).unwrap();
        let second = generate_sales(GeneratorConfig::default(), &catalog).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_different_seed_different_dataset() {
        let catalog = Catalog::default();
        let first = generate_sales(GeneratorConfig::default(), &catalog).unwrap();
        let second = generate_sales(
            GeneratorConfig {
                seed: 7,
                ..GeneratorConfig::default()
            },
            &catalog,
        )
        .unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_single_day_range() {
        let catalog = Catalog::default();
        let config = GeneratorConfig {
            start: day(2024, 2, 29),
            end: day(2024, 2, 29),
            ..GeneratorConfig::default()
        };
        let records = generate_sales(config, &catalog).unwrap();

        assert!((5..=14).contains(&records.len()));
        assert!(records.iter().all(|r| r.date() == day(2024, 2, 29)));
    }

    #[test]
    fn test_invalid_date_range() {
        let config = GeneratorConfig {
            start: day(2023, 12, 31),
            end: day(2023, 1, 1),
            ..GeneratorConfig::default()
        };
        let catalog = Catalog::default();
        let result = SalesGenerator::new(config, &catalog);
        assert!(matches!(result, Err(GeneratorError::InvalidDateRange { .. })));
    }

    #[test]
    fn test_invalid_records_per_day() {
        let catalog = Catalog::default();

        let zero_min = GeneratorConfig {
            min_records_per_day: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            zero_min.validate(&catalog),
            Err(GeneratorError::InvalidRecordsPerDay { min: 0, max: 14 })
        );

        let inverted = GeneratorConfig {
            min_records_per_day: 10,
            max_records_per_day: 3,
            ..GeneratorConfig::default()
        };
        assert!(inverted.validate(&catalog).is_err());
    }

    #[test]
    fn test_invalid_catalogs() {
        let config = GeneratorConfig::default();

        let no_products = Catalog {
            products: vec![],
            ..Catalog::default()
        };
        assert_eq!(config.validate(&no_products), Err(GeneratorError::EmptyCatalog));

        let no_regions = Catalog {
            regions: vec![],
            ..Catalog::default()
        };
        assert_eq!(config.validate(&no_regions), Err(GeneratorError::NoRegions));

        let free = Catalog {
            products: vec![Product::new("Sticker", 0)],
            ..Catalog::default()
        };
        assert_eq!(
            config.validate(&free),
            Err(GeneratorError::ZeroPrice("Sticker".to_string()))
        );

        let duplicated = Catalog {
            products: vec![Product::new("Mouse", 49), Product::new("Mouse", 59)],
            ..Catalog::default()
        };
        assert_eq!(
            config.validate(&duplicated),
            Err(GeneratorError::DuplicateProduct("Mouse".to_string()))
        );
    }

    #[test]
    fn test_price_that_could_overflow_totals_rejected() {
        let config = GeneratorConfig::default();
        let catalog = Catalog {
            products: vec![
                Product::new("Mouse", 49),
                Product::new("Yacht", i64::MAX as u64),
            ],
            ..Catalog::default()
        };

        assert_eq!(
            config.validate(&catalog),
            Err(GeneratorError::PriceTooLarge("Yacht".to_string()))
        );
    }

    #[test]
    fn test_large_price_accepted_when_totals_fit() {
        let config = GeneratorConfig::default();
        let catalog = Catalog {
            products: vec![Product::new("Jet", 1_000_000_000)],
            ..Catalog::default()
        };

        assert!(config.validate(&catalog).is_ok());
        let records = generate_sales(config, &catalog).unwrap();
        let total: u64 = records.iter().map(|r| r.revenue()).sum();
        assert!(total > 0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let config = GeneratorConfig {
            max_quantity: 0,
            ..GeneratorConfig::default()
        };
        assert_eq!(
            config.validate(&Catalog::default()),
            Err(GeneratorError::InvalidQuantity)
        );
    }
}
