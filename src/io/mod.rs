//! Persistence.
//!
//! - CSV file sinks with backup-before-rewrite (`csv_sink`)
//! - DuckDB warehouse, schema `bronze` (`warehouse`)

pub mod csv_sink;
pub mod warehouse;

pub use csv_sink::*;
pub use warehouse::*;
