mod chart;
mod config;
mod controller;
mod error;
mod models;
mod source;
mod ui;
mod utils;

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::AppConfig;
use crate::models::Period;
use crate::source::YahooChartSource;

#[derive(Parser)]
#[command(
    name = "stock-chart-viewer",
    about = "Fetch daily stock prices and chart them in a desktop window",
    version
)]
struct Cli {
    /// Lookback window, e.g. "1y" or "6 months" (overrides config)
    #[arg(short, long, env = "STOCKCHART_PERIOD")]
    period: Option<String>,

    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "stock_chart_viewer=info,warn",
        1 => "stock_chart_viewer=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false))
        .with(EnvFilter::new(filter))
        .init();

    let mut config = AppConfig::load()?;
    if let Some(period) = cli.period {
        config.chart.period = period;
    }

    let period = config.chart.period.parse::<Period>().unwrap_or_else(|e| {
        warn!("{}; falling back to {}", e, Period::default());
        Period::default()
    });

    let source = Arc::new(
        YahooChartSource::new(&config.provider).context("Failed to build market data source")?,
    );
    info!("Provider: {}", config.provider.base_url);

    ui::run(&config, source, period)
}
