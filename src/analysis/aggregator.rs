//! Revenue aggregation and statistics.
//!
//! This module reduces the flat record list into the three groupings the
//! dashboard shows (month, product, region) and derives the summary
//! statistics printed at the end of a run.

use crate::models::{
    Aggregate, DatasetOverview, Dollars, MonthlyStats, SaleRecord, UnitsSold, YearMonth,
};
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};

/// Sum of revenue over all records.
pub fn total_revenue(records: &[SaleRecord]) -> Dollars {
    records.iter().map(SaleRecord::revenue).sum()
}

/// First and last sale date, or `None` for an empty dataset.
pub fn date_range(records: &[SaleRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = records.iter().map(SaleRecord::date).min()?;
    let last = records.iter().map(SaleRecord::date).max()?;
    Some((first, last))
}

/// Headline numbers for a dataset.
pub fn overview(records: &[SaleRecord]) -> DatasetOverview {
    let range = date_range(records);

    DatasetOverview {
        total_records: records.len(),
        first_date: range.map(|(first, _)| first),
        last_date: range.map(|(_, last)| last),
        total_revenue: total_revenue(records),
    }
}

/// Revenue per month, in calendar order.
pub fn revenue_by_month(records: &[SaleRecord]) -> Vec<Aggregate<YearMonth>> {
    let mut grouped: BTreeMap<YearMonth, Dollars> = BTreeMap::new();

    for record in records {
        *grouped.entry(record.month()).or_default() += record.revenue();
    }

    grouped
        .into_iter()
        .map(|(month, revenue)| Aggregate::new(month, revenue))
        .collect()
}

/// Revenue per product, highest first.
pub fn revenue_by_product(records: &[SaleRecord]) -> Vec<Aggregate> {
    group_revenue(records, SaleRecord::product)
}

/// Revenue per region, highest first.
pub fn revenue_by_region(records: &[SaleRecord]) -> Vec<Aggregate> {
    group_revenue(records, SaleRecord::region)
}

fn group_revenue<F>(records: &[SaleRecord], key: F) -> Vec<Aggregate>
where
    F: Fn(&SaleRecord) -> &str,
{
    let mut grouped: HashMap<&str, Dollars> = HashMap::new();

    for record in records {
        *grouped.entry(key(record)).or_default() += record.revenue();
    }

    let mut aggregates: Vec<Aggregate> = grouped
        .into_iter()
        .map(|(name, revenue)| Aggregate::new(name.to_string(), revenue))
        .collect();

    sort_by_revenue(&mut aggregates);
    aggregates
}

/// Sort aggregates by revenue (highest first), ties by key.
pub fn sort_by_revenue(aggregates: &mut [Aggregate]) {
    aggregates.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.key.cmp(&b.key)));
}

/// Units sold per product, in the same order as [`revenue_by_product`].
pub fn units_by_product(records: &[SaleRecord]) -> Vec<UnitsSold> {
    let mut units: HashMap<&str, u64> = HashMap::new();

    for record in records {
        *units.entry(record.product()).or_default() += u64::from(record.quantity());
    }

    revenue_by_product(records)
        .into_iter()
        .map(|agg| UnitsSold {
            quantity: units.get(agg.key.as_str()).copied().unwrap_or_default(),
            product: agg.key,
        })
        .collect()
}

/// The first `n` entries of a sorted aggregate.
pub fn top_n<K: Clone>(aggregates: &[Aggregate<K>], n: usize) -> Vec<Aggregate<K>> {
    aggregates.iter().take(n).cloned().collect()
}

/// Mean, best and worst month. Ties resolve to the earliest month.
pub fn monthly_stats(monthly: &[Aggregate<YearMonth>]) -> Option<MonthlyStats> {
    let first = monthly.first()?;

    let mut best = first;
    let mut worst = first;
    for agg in &monthly[1..] {
        if agg.revenue > best.revenue {
            best = agg;
        }
        if agg.revenue < worst.revenue {
            worst = agg;
        }
    }

    let sum: Dollars = monthly.iter().map(|m| m.revenue).sum();

    Some(MonthlyStats {
        average: sum as f64 / monthly.len() as f64,
        best: best.clone(),
        worst: worst.clone(),
    })
}
