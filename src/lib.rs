//! ESG Harvest: a concurrent ESG score scraper
//!
//! This crate fetches per-security ESG score pages, extracts the score fields
//! embedded in the page markup, and collects one flat record per identifier
//! using a pool of concurrent workers sharing a task queue and a result store.

pub mod config;
pub mod harvest;
pub mod output;
pub mod state;
pub mod universe;

use thiserror::Error;

/// Main error type for run-level failures
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Coordination error: {0}")]
    Coordination(#[from] CoordinationError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid worker state transition: {from} -> {to}")]
    InvalidTransition {
        from: state::WorkerState,
        to: state::WorkerState,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
///
/// These cover everything that must be valid before any worker starts: the
/// config file, the identifier universe, the country table and pool widths.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Failed to load {path}: {message}")]
    DataFile { path: String, message: String },
}

/// Errors raised by a fetcher for a single item
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("HTTP {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Network error for {url}: {message}")]
    Network { url: String, message: String },
}

/// Errors raised by an extractor for a single document
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Missing element: {0}")]
    MissingElement(String),

    #[error("Missing attribute {attribute} on {element}")]
    MissingField { element: String, attribute: String },

    #[error("Malformed structure: {0}")]
    Malformed(String),
}

/// Loss of the shared queue/result-store substrate
#[derive(Debug, Error)]
pub enum CoordinationError {
    #[error("Shared {0} lock was poisoned")]
    Poisoned(&'static str),

    #[error("Worker task failed: {0}")]
    WorkerFailed(String),
}

impl From<tokio::task::JoinError> for CoordinationError {
    fn from(err: tokio::task::JoinError) -> Self {
        CoordinationError::WorkerFailed(err.to_string())
    }
}

/// Result type alias for run-level operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use harvest::{Pool, Record, WorkItem};
pub use state::WorkerState;
pub use universe::{CountryTable, Universe};
