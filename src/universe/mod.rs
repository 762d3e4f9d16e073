//! Static input data for a harvest run
//!
//! This module loads the two read-only tables a run depends on:
//! - `Universe`: the ordered list of security identifiers to harvest
//! - `CountryTable`: country name to ISO3 code lookup
//!
//! Both are loaded once before any worker starts. Any failure here is a
//! configuration error and aborts the run.

mod countries;

pub use countries::CountryTable;

use crate::harvest::WorkItem;
use crate::ConfigError;
use serde::Deserialize;
use std::path::Path;

/// One entry of the tickers file; fields other than `id` are ignored
#[derive(Debug, Deserialize)]
struct TickerEntry {
    id: String,
}

/// Ordered identifier universe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    ids: Vec<String>,
}

impl Universe {
    /// Creates a universe from identifiers, keeping their order
    pub fn new(ids: Vec<String>) -> Self {
        Self { ids }
    }

    /// Loads the universe from a JSON array of `{"id": ...}` objects
    ///
    /// # Returns
    ///
    /// * `Ok(Universe)` - At least one identifier was loaded
    /// * `Err(ConfigError)` - File missing, malformed, or empty
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| data_error(path, e))?;
        let entries: Vec<TickerEntry> =
            serde_json::from_str(&content).map_err(|e| data_error(path, e))?;

        if entries.is_empty() {
            return Err(data_error(path, "no identifiers found"));
        }

        tracing::debug!("Loaded {} identifiers from {}", entries.len(), path.display());
        Ok(Self::new(entries.into_iter().map(|e| e.id).collect()))
    }

    /// Returns the identifiers in file order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Builds one work item per identifier by appending it to `base_url`
    ///
    /// Duplicates are kept; the pool deduplicates them.
    pub fn work_items(&self, base_url: &str) -> Vec<WorkItem> {
        self.ids
            .iter()
            .map(|id| WorkItem::new(format!("{}{}", base_url, id)))
            .collect()
    }
}

pub(crate) fn data_error(path: &Path, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::DataFile {
        path: path.display().to_string(),
        message: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_load_universe() {
        let file = create_temp_file(
            r#"[{"id": "4004205", "name": "Apple"}, {"id": "4023113"}, {"id": "4004205"}]"#,
        );
        let universe = Universe::load(file.path()).unwrap();

        assert_eq!(universe.len(), 3);
        assert_eq!(universe.ids()[0], "4004205");
        assert_eq!(universe.ids()[1], "4023113");
    }

    #[test]
    fn test_load_missing_file() {
        let result = Universe::load(Path::new("/nonexistent/tickers.json"));
        assert!(matches!(result, Err(ConfigError::DataFile { .. })));
    }

    #[test]
    fn test_load_malformed_file() {
        let file = create_temp_file(r#"{"id": "not an array"}"#);
        assert!(Universe::load(file.path()).is_err());
    }

    #[test]
    fn test_load_empty_universe() {
        let file = create_temp_file("[]");
        let result = Universe::load(file.path());
        assert!(matches!(result, Err(ConfigError::DataFile { .. })));
    }

    #[test]
    fn test_work_items_keep_order_and_duplicates() {
        let universe = Universe::new(vec!["A".into(), "B".into(), "A".into()]);
        let items = universe.work_items("https://example.com/scores?cid=");

        assert_eq!(items.len(), 3);
        assert_eq!(items[0].url(), "https://example.com/scores?cid=A");
        assert_eq!(items[1].id(), "B");
        assert_eq!(items[2].id(), "A");
    }
}
