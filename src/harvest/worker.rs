//! The fetch-and-extract worker loop

use crate::harvest::{Extractor, Fetcher, Record, ResultStore, TaskQueue, WorkItem};
use crate::state::WorkerState;
use crate::universe::CountryTable;
use crate::HarvestError;
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

/// Everything a worker reaches that is shared with the rest of the run
///
/// Only `queue` and `store` are mutable; the rest is read-only.
pub(crate) struct Shared {
    pub queue: TaskQueue,
    pub store: ResultStore,
    pub fetcher: Arc<dyn Fetcher>,
    pub extractor: Arc<dyn Extractor>,
    pub countries: Arc<CountryTable>,
}

/// Per-worker outcome counters, merged by the pool after join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerReport {
    /// Items that went on to a fetch
    pub attempted: u64,
    /// Records accepted by the result store
    pub stored: u64,
    pub fetch_failures: u64,
    pub extract_failures: u64,
    /// Items skipped because their identifier was already stored
    pub duplicates_skipped: u64,
    /// Records rejected because another worker stored the identifier first
    pub races_lost: u64,
}

impl WorkerReport {
    pub fn merge(&mut self, other: &WorkerReport) {
        self.attempted += other.attempted;
        self.stored += other.stored;
        self.fetch_failures += other.fetch_failures;
        self.extract_failures += other.extract_failures;
        self.duplicates_skipped += other.duplicates_skipped;
        self.races_lost += other.races_lost;
    }
}

/// One concurrent unit draining the shared task queue
pub(crate) struct Worker {
    name: String,
    state: WorkerState,
    shared: Arc<Shared>,
    report: WorkerReport,
}

impl Worker {
    pub fn new(name: String, shared: Arc<Shared>) -> Self {
        Self {
            name,
            state: WorkerState::Idle,
            shared,
            report: WorkerReport::default(),
        }
    }

    /// Pops and processes items until the queue is drained
    ///
    /// Item-level failures are logged and skipped. Only coordination
    /// failures end the loop early.
    pub async fn run(mut self) -> Result<WorkerReport, HarvestError> {
        tracing::debug!("{}: started", self.name);

        while let Some(item) = self.shared.queue.pop()? {
            self.process(item).await?;
        }

        self.transition(WorkerState::Done)?;
        debug_assert!(self.state.is_terminal());
        tracing::debug!("{}: no more tasks", self.name);
        Ok(self.report)
    }

    async fn process(&mut self, item: WorkItem) -> Result<(), HarvestError> {
        let id = item.id();

        if self.shared.store.contains(id)? {
            tracing::debug!("{}: skipping duplicate ticker {}", self.name, id);
            self.report.duplicates_skipped += 1;
            return Ok(());
        }

        self.report.attempted += 1;
        self.transition(WorkerState::Fetching)?;
        tracing::debug!("{}: fetching ESG scores for {}", self.name, id);

        // A panic inside a fetcher or extractor is an item failure like any other
        let fetched = AssertUnwindSafe(self.shared.fetcher.fetch(item.url()))
            .catch_unwind()
            .await;
        let body = match fetched {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => {
                tracing::warn!("{}: unable to fetch data for {}: {}", self.name, id, e);
                self.report.fetch_failures += 1;
                return self.transition(WorkerState::Idle);
            }
            Err(payload) => {
                tracing::warn!(
                    "{}: fetcher panicked for {}: {}",
                    self.name,
                    id,
                    panic_message(payload.as_ref())
                );
                self.report.fetch_failures += 1;
                return self.transition(WorkerState::Idle);
            }
        };

        self.transition(WorkerState::Extracting)?;
        let extractor = Arc::clone(&self.shared.extractor);
        let extracted = std::panic::catch_unwind(AssertUnwindSafe(|| extractor.extract(&body)));
        let fields = match extracted {
            Ok(Ok(fields)) => fields,
            Ok(Err(e)) => {
                tracing::warn!("{}: unable to extract data for {}: {}", self.name, id, e);
                self.report.extract_failures += 1;
                return self.transition(WorkerState::Idle);
            }
            Err(payload) => {
                tracing::warn!(
                    "{}: extractor panicked for {}: {}",
                    self.name,
                    id,
                    panic_message(payload.as_ref())
                );
                self.report.extract_failures += 1;
                return self.transition(WorkerState::Idle);
            }
        };

        self.transition(WorkerState::Storing)?;
        let record = Record::new(fields, &item, &self.shared.countries);
        if self.shared.store.try_insert(id.to_string(), record)? {
            self.report.stored += 1;
            tracing::debug!("{}: fetched data for {}", self.name, id);
        } else {
            self.report.races_lost += 1;
            tracing::debug!("{}: {} was stored by another worker", self.name, id);
        }

        self.transition(WorkerState::Idle)
    }

    fn transition(&mut self, next: WorkerState) -> Result<(), HarvestError> {
        if !self.state.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.state,
                to: next,
            });
        }
        tracing::trace!("{}: {} -> {}", self.name, self.state, next);
        self.state = next;
        Ok(())
    }
}

/// Best-effort text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
