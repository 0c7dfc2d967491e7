//! TourLens: interactive EDA dashboard for travel package purchase data
//!
//! Loads the dataset once, logs the headline metrics, then serves the dashboard over HTTP.

use anyhow::{Context, Result};
use clap::Parser;
use std::io;
use std::time::Instant;
use tourlens::{serve, Args, Dataset, KpiAggregator};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let start_time = Instant::now();
    let dataset = Dataset::load(&args.input)
        .with_context(|| format!("failed to load dataset from {}", args.input.display()))?;
    info!(
        path = %args.input.display(),
        rows = dataset.height(),
        columns = dataset.width(),
        elapsed_ms = start_time.elapsed().as_millis() as u64,
        "dataset loaded"
    );

    let columns = dataset.classify();
    info!(
        numerical = columns.numerical.len(),
        categorical = columns.categorical.len(),
        "columns classified"
    );

    match KpiAggregator::new(&dataset).snapshot() {
        Ok(kpi) => info!(
            total = kpi.total,
            purchased = kpi.purchased,
            conversion_rate = kpi.conversion_rate,
            "key metrics"
        ),
        Err(e) => warn!(error = %e, "key metrics unavailable"),
    }

    serve(args.bind, dataset).await
}
