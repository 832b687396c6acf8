use std::env;
use chrono::Local;
use log::{error, info};
use anyhow::Result;
use crate::config::{load_api_key, load_config};
use crate::logging::setup_logger;

mod config;
mod errors;
mod logging;
mod manager_cwa;
mod models;
mod series;
mod chart;
mod report;
mod worker;

fn main() -> Result<()> {
    let config_path = env::var("CONFIG_FILE").unwrap_or("config.toml".to_string());
    let config = load_config(&config_path)?;
    let _handle = setup_logger(&config.general)?;

    info!("weather_diary version: {}", env!("CARGO_PKG_VERSION"));

    let api_key = load_api_key().inspect_err(|e| error!("{}", e))?;

    // Run date
    let date = Local::now().date_naive();

    match worker::run(&config, &api_key, date) {
        Ok(rows) => {
            info!("Report {} written with {} charts", config.files.report_file, rows);
            Ok(())
        }
        Err(e) => {
            error!("{}", e);
            Err(e.into())
        }
    }
}
