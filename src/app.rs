//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and parses CLI arguments
//! - resolves per-job configuration (flag > env > default)
//! - dispatches to the job pipelines

use std::path::PathBuf;

use clap::Parser;

use crate::cli::{AnalyzeArgs, BrentArgs, Command, GulfArgs, LoadBrentArgs, RatesArgs};
use crate::config::{self, JobConfig, WarehouseConfig};
use crate::domain::AnalysisConfig;
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `fuelsync` binary.
pub fn run() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    let cli = crate::cli::Cli::parse();

    match cli.command {
        Command::Gulf(args) => pipeline::run_gulf(&gulf_config(&args)),
        Command::Brent(args) => pipeline::run_brent(&brent_config(&args)),
        Command::Rates(args) => pipeline::run_rates(&rates_config(&args)),
        Command::LoadBrent(args) => pipeline::run_load_brent(&load_brent_config(&args)),
        Command::Analyze(args) => {
            pipeline::run_analyze(&analyze_job_config(&args), &analysis_config_from_args(&args))
        }
    }
}

fn warehouse_config(flag: &Option<PathBuf>) -> WarehouseConfig {
    WarehouseConfig {
        database: flag.clone().unwrap_or_else(|| {
            config::env_path_or("FUELSYNC_WAREHOUSE", config::DEFAULT_WAREHOUSE)
        }),
    }
}

fn gulf_config(args: &GulfArgs) -> JobConfig {
    let warehouse = warehouse_config(&args.database);
    JobConfig {
        source_endpoint: args.endpoint.clone().unwrap_or_else(|| {
            config::env_or("FUELSYNC_GULF_URL", config::DEFAULT_GULF_ENDPOINT)
        }),
        // The warehouse table is this job's only sink.
        sink_location: warehouse.database.clone(),
        warehouse,
    }
}

fn brent_sink(flag: &Option<PathBuf>) -> PathBuf {
    flag.clone()
        .unwrap_or_else(|| config::env_path_or("FUELSYNC_BRENT_CSV", config::DEFAULT_BRENT_SINK))
}

fn brent_config(args: &BrentArgs) -> JobConfig {
    JobConfig {
        source_endpoint: args.endpoint.clone().unwrap_or_else(|| {
            config::env_or("FUELSYNC_BRENT_URL", config::DEFAULT_BRENT_ENDPOINT)
        }),
        sink_location: brent_sink(&args.sink),
        warehouse: warehouse_config(&None),
    }
}

fn rates_config(args: &RatesArgs) -> JobConfig {
    JobConfig {
        source_endpoint: args.endpoint.clone().unwrap_or_else(|| {
            config::env_or("FUELSYNC_NBG_URL", config::DEFAULT_NBG_ENDPOINT)
        }),
        sink_location: args.sheet.clone().unwrap_or_else(|| {
            config::env_path_or("FUELSYNC_RATES_SHEET", config::DEFAULT_RATES_SINK)
        }),
        warehouse: warehouse_config(&args.database),
    }
}

fn load_brent_config(args: &LoadBrentArgs) -> JobConfig {
    JobConfig {
        source_endpoint: String::new(),
        sink_location: brent_sink(&args.sink),
        warehouse: warehouse_config(&args.database),
    }
}

fn analyze_job_config(args: &AnalyzeArgs) -> JobConfig {
    let warehouse = warehouse_config(&args.database);
    JobConfig {
        source_endpoint: String::new(),
        sink_location: warehouse.database.clone(),
        warehouse,
    }
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> AnalysisConfig {
    AnalysisConfig {
        scenario_oil: args.oil,
        scenario_rate: args.rate,
        plot: !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
    }
}
