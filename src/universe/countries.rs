use super::data_error;
use crate::ConfigError;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct CountryEntry {
    country_name: String,
    country_iso3: String,
}

/// Read-only country name to ISO3 code lookup
#[derive(Debug, Clone, Default)]
pub struct CountryTable {
    codes: HashMap<String, String>,
}

impl CountryTable {
    /// Loads the table from a JSON array of `{country_name, country_iso3}`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| data_error(path, e))?;
        let entries: Vec<CountryEntry> =
            serde_json::from_str(&content).map_err(|e| data_error(path, e))?;

        tracing::debug!("Loaded {} countries from {}", entries.len(), path.display());
        Ok(entries
            .into_iter()
            .map(|e| (e.country_name, e.country_iso3))
            .collect())
    }

    /// Looks up the ISO3 code for an exact country name
    pub fn resolve(&self, country_name: &str) -> Option<&str> {
        self.codes.get(country_name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

impl FromIterator<(String, String)> for CountryTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            codes: iter.into_iter().collect(),
        }
    }
}
