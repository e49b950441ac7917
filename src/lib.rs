//! `fuel-sync` library crate.
//!
//! The binary (`fuelsync`) is a thin wrapper around this library so that:
//!
//! - core logic (normalization, gap filling, merging) is testable without
//!   network access or a warehouse
//! - modules are reusable (e.g., future schedulers, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
pub mod sync;
