//! Harvest module: the concurrent fetch-and-extract core
//!
//! This module contains:
//! - `TaskQueue` and `ResultStore`, the only state shared between workers
//! - The `Fetcher` and `Extractor` boundaries and their HTTP/HTML implementations
//! - The worker loop with per-item failure isolation
//! - The two-level worker `Pool`

mod extractor;
mod fetcher;
mod pool;
mod queue;
mod record;
mod store;
mod worker;

pub use extractor::{Extractor, FieldGroup, SpGlobalExtractor, GROUP_SUFFIXES};
pub use fetcher::{build_http_client, Fetcher, HttpFetcher};
pub use pool::{HarvestReport, Pool, PoolOptions};
pub use queue::TaskQueue;
pub use record::{derive_identifier, Fields, Record, WorkItem};
pub use store::ResultStore;
pub use worker::WorkerReport;

use crate::config::Config;
use crate::universe::{CountryTable, Universe};
use crate::HarvestError;
use std::sync::Arc;
use std::time::Duration;

/// Runs a complete harvest
///
/// This is the main entry point for a run. It will:
/// 1. Build the HTTP fetcher from the user agent and timeout settings
/// 2. Size the pool from the harvester settings
/// 3. Seed one work item per universe identifier
/// 4. Run the pool until the queue is drained
///
/// # Arguments
///
/// * `config` - The harvester configuration
/// * `universe` - Identifiers to harvest
/// * `countries` - Country name to ISO3 lookup
///
/// # Returns
///
/// * `Ok(HarvestReport)` - Records and run statistics
/// * `Err(HarvestError)` - Invalid pool configuration or coordination failure
pub async fn run_harvest(
    config: &Config,
    universe: &Universe,
    countries: CountryTable,
) -> Result<HarvestReport, HarvestError> {
    let options = PoolOptions::from_config(&config.harvester)?;
    let fetcher = HttpFetcher::from_config(
        &config.user_agent,
        Duration::from_secs(config.harvester.request_timeout_secs),
    )?;

    let items = universe.work_items(&config.harvester.base_url);
    tracing::info!("Fetched {} tickers", items.len());

    let pool = Pool::new(
        Arc::new(fetcher),
        Arc::new(SpGlobalExtractor::new()),
        Arc::new(countries),
        options,
    );
    pool.run_with_stats(items).await
}
