//! Worker pool orchestration
//!
//! The pool fans out in two levels: `workers` outer units, each running
//! `threads_per_worker` inner workers, all draining one shared
//! `TaskQueue` into one shared `ResultStore`. The queue is filled before any
//! worker starts and the store is only read back after every worker is done.

use crate::config::HarvesterConfig;
use crate::harvest::worker::{Shared, Worker, WorkerReport};
use crate::harvest::{Extractor, Fetcher, Record, ResultStore, TaskQueue, WorkItem};
use crate::output::RunStats;
use crate::universe::CountryTable;
use crate::{ConfigError, CoordinationError, HarvestError};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Fan-out widths for a pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolOptions {
    workers: usize,
    threads_per_worker: usize,
}

impl PoolOptions {
    /// Both widths must be at least 1
    pub fn new(workers: usize, threads_per_worker: usize) -> Result<Self, ConfigError> {
        if workers < 1 || threads_per_worker < 1 {
            return Err(ConfigError::Validation(format!(
                "pool widths must be >= 1, got {} workers x {} threads",
                workers, threads_per_worker
            )));
        }
        Ok(Self {
            workers,
            threads_per_worker,
        })
    }

    pub fn from_config(config: &HarvesterConfig) -> Result<Self, ConfigError> {
        Self::new(config.worker_count(), config.threads_per_worker as usize)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn threads_per_worker(&self) -> usize {
        self.threads_per_worker
    }

    /// Total number of concurrent workers
    pub fn total_units(&self) -> usize {
        self.workers * self.threads_per_worker
    }
}

/// Final mapping plus run statistics
#[derive(Debug, Clone)]
pub struct HarvestReport {
    pub records: HashMap<String, Record>,
    pub stats: RunStats,
}

/// Concurrent fetch-and-extract pool
pub struct Pool {
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn Extractor>,
    countries: Arc<CountryTable>,
    options: PoolOptions,
}

impl Pool {
    pub fn new(
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn Extractor>,
        countries: Arc<CountryTable>,
        options: PoolOptions,
    ) -> Self {
        Self {
            fetcher,
            extractor,
            countries,
            options,
        }
    }

    /// Processes every item and returns one record per successful identifier
    ///
    /// Identifiers whose every attempt failed are simply absent. Only
    /// coordination failures are returned as errors.
    pub async fn run(&self, items: Vec<WorkItem>) -> Result<HashMap<String, Record>, HarvestError> {
        Ok(self.run_with_stats(items).await?.records)
    }

    /// Same as [`Pool::run`], also returning aggregated worker statistics
    pub async fn run_with_stats(&self, items: Vec<WorkItem>) -> Result<HarvestReport, HarvestError> {
        let mut stats = RunStats::start(self.options, items.len());

        let shared = Arc::new(Shared {
            queue: TaskQueue::new(items),
            store: ResultStore::new(),
            fetcher: Arc::clone(&self.fetcher),
            extractor: Arc::clone(&self.extractor),
            countries: Arc::clone(&self.countries),
        });

        tracing::info!(
            "Starting {} workers x {} threads each",
            self.options.workers,
            self.options.threads_per_worker
        );

        let mut units = JoinSet::new();
        for w in 0..self.options.workers {
            let name = format!("W{}", w);
            tracing::debug!("Started {}", name);
            units.spawn(run_unit(
                name,
                self.options.threads_per_worker,
                Arc::clone(&shared),
            ));
        }

        // Dropping the join set on error aborts the remaining units
        let mut totals = WorkerReport::default();
        while let Some(joined) = units.join_next().await {
            let report = joined.map_err(CoordinationError::from)??;
            totals.merge(&report);
        }

        let records = shared.store.snapshot()?;
        stats.finish(&totals, records.len());
        tracing::info!("All workers have completed: {} records", records.len());

        Ok(HarvestReport { records, stats })
    }
}

/// One outer unit: runs its inner workers to completion
async fn run_unit(
    name: String,
    threads: usize,
    shared: Arc<Shared>,
) -> Result<WorkerReport, HarvestError> {
    let mut workers = JoinSet::new();
    for t in 0..threads {
        let worker = Worker::new(format!("{}-T{}", name, t), Arc::clone(&shared));
        workers.spawn(worker.run());
    }

    let mut totals = WorkerReport::default();
    while let Some(joined) = workers.join_next().await {
        let report = joined.map_err(CoordinationError::from)??;
        totals.merge(&report);
    }

    tracing::debug!("{} has finished", name);
    Ok(totals)
}
