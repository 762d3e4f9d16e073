//! Run statistics
//!
//! Collects the aggregated worker counters of one pool run and prints them.

use crate::harvest::{PoolOptions, WorkerReport};
use chrono::{DateTime, Utc};

/// Summary of one pool run
#[derive(Debug, Clone)]
pub struct RunStats {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,

    /// Outer units
    pub workers: usize,

    /// Inner workers per outer unit
    pub threads_per_worker: usize,

    /// Work items seeded into the queue
    pub queued: u64,

    pub attempted: u64,
    pub stored: u64,
    pub fetch_failures: u64,
    pub extract_failures: u64,
    pub duplicates_skipped: u64,
    pub races_lost: u64,

    /// Distinct identifiers in the final mapping
    pub unique_records: u64,
}

impl RunStats {
    /// Starts the clock for a run over `queued` items
    pub fn start(options: PoolOptions, queued: usize) -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            workers: options.workers(),
            threads_per_worker: options.threads_per_worker(),
            queued: queued as u64,
            attempted: 0,
            stored: 0,
            fetch_failures: 0,
            extract_failures: 0,
            duplicates_skipped: 0,
            races_lost: 0,
            unique_records: 0,
        }
    }

    /// Records the merged worker counters and stops the clock
    pub fn finish(&mut self, totals: &WorkerReport, unique_records: usize) {
        self.finished_at = Some(Utc::now());
        self.attempted = totals.attempted;
        self.stored = totals.stored;
        self.fetch_failures = totals.fetch_failures;
        self.extract_failures = totals.extract_failures;
        self.duplicates_skipped = totals.duplicates_skipped;
        self.races_lost = totals.races_lost;
        self.unique_records = unique_records as u64;
    }

    /// Wall-clock duration, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }

    pub fn total_failures(&self) -> u64 {
        self.fetch_failures + self.extract_failures
    }
}

/// Prints run statistics to stdout
pub fn print_statistics(stats: &RunStats) {
    println!("=== Harvest Statistics ===\n");

    println!(
        "Pool: {} workers x {} threads",
        stats.workers, stats.threads_per_worker
    );
    println!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(duration) = stats.duration_seconds() {
        println!("Duration: {:.2}s", duration);
    }
    println!();

    println!("Items queued:        {}", stats.queued);
    println!("Items attempted:     {}", stats.attempted);
    println!("Records stored:      {}", stats.stored);
    println!("Duplicates skipped:  {}", stats.duplicates_skipped);
    println!("Races lost:          {}", stats.races_lost);
    println!();

    if stats.total_failures() > 0 {
        println!("Failures:");
        println!("  fetch:   {}", stats.fetch_failures);
        println!("  extract: {}", stats.extract_failures);
        println!();
    }

    println!("Unique identifiers:  {}", stats.unique_records);
}
