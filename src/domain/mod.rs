//! Domain types used throughout the pipelines.
//!
//! This module defines:
//!
//! - the dated observation model (`TimeSeriesRecord`, `FieldValue`)
//! - typed series and raw scraped batches (`Series`, `RawBatch`)
//! - analysis inputs (`AnalysisRow`, `AnalysisConfig`)

pub mod types;

pub use types::*;
