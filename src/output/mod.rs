//! Output module for harvest results
//!
//! This module handles:
//! - Writing the final identifier to record mapping as JSON
//! - Recording and printing run statistics

mod json;
pub mod stats;

pub use json::write_results;
pub use stats::{print_statistics, RunStats};
