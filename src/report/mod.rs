//! Report building and console output.

pub mod format;
pub mod generator;

pub use generator::*;
