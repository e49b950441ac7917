//! Incremental time-series synchronization.
//!
//! The one pattern shared by every job in this crate:
//!
//! fetch -> normalize -> (gap fill) -> merge-by-date -> persist
//!
//! - `normalize`: raw scraped text to typed, dated records
//! - `gapfill`: sparse change events to a dense business-day series
//! - `merge`: append only unseen dates, keep canonical order
//!
//! All three are pure over in-memory series so they stay testable without a
//! network or a warehouse.

pub mod gapfill;
pub mod merge;
pub mod normalize;

pub use gapfill::*;
pub use merge::*;
pub use normalize::*;
