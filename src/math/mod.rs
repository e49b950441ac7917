//! Mathematical utilities: least-squares regression and summary statistics.

pub mod ols;
pub mod stats;

pub use ols::*;
pub use stats::*;
