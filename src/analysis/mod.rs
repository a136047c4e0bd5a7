//! Analysis modules.
//!
//! Grouping and summary statistics over generated sale records.

pub mod aggregator;

pub use aggregator::*;
