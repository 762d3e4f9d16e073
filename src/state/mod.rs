//! State module for tracking worker progress
//!
//! Each worker in the pool moves through a small state machine while it
//! processes items: `Idle → Fetching → Extracting → Storing → Idle`, ending in
//! `Done` once the task queue is drained.

mod worker_state;

pub use worker_state::WorkerState;
