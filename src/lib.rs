pub mod cli;
pub mod core;
pub mod providers;

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::SupplyTracker;
use crate::core::config::AppConfig;

pub enum AppCommand {
    /// One acquisition cycle, then print the dashboard
    Status { json: bool },
    /// Poll on the configured interval and redraw until interrupted
    Watch,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Bitcoin supply tracker starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let acquirer = providers::build_acquirer(&config)?;
    let tracker = Arc::new(SupplyTracker::new(acquirer, config.polling.interval()));

    match command {
        AppCommand::Status { json } => cli::status::run(&tracker, &config.chart, json).await,
        AppCommand::Watch => cli::watch::run(tracker, &config.chart).await,
    }
}
