//! Work items and the records produced from them

use crate::universe::CountryTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Flat field name to value mapping produced by an extractor
pub type Fields = BTreeMap<String, String>;

/// Field names attached by the worker rather than read from the page
const ATTACHED_FIELDS: [&str; 3] = ["country_iso3", "id", "url"];

/// Derives the identifier from a work item URL
///
/// The identifier is the text after the last `=`, or the whole URL when it
/// contains none. This never fails and never touches the network.
pub fn derive_identifier(url: &str) -> &str {
    url.rsplit('=').next().unwrap_or(url)
}

/// One unit of input work: a URL and the identifier derived from it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    url: String,
    id: String,
}

impl WorkItem {
    pub fn new(url: impl Into<String>) -> Self {
        let url = url.into();
        let id = derive_identifier(&url).to_string();
        Self { url, id }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// The extracted data for one identifier
///
/// Serializes as a single flat JSON object: the extracted fields plus
/// `country_iso3`, `id` and `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: Fields,
    country_iso3: Option<String>,
    id: String,
    url: String,
}

impl Record {
    /// Builds a record from extracted fields and the item they came from
    ///
    /// The country code is resolved from the extracted `country` field.
    /// Attached fields take precedence over same-named extracted ones.
    pub fn new(mut fields: Fields, item: &WorkItem, countries: &CountryTable) -> Self {
        for name in ATTACHED_FIELDS {
            fields.remove(name);
        }

        let country_iso3 = fields
            .get("country")
            .and_then(|name| countries.resolve(name))
            .map(str::to_string);

        Self {
            fields,
            country_iso3,
            id: item.id().to_string(),
            url: item.url().to_string(),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    pub fn country_iso3(&self) -> Option<&str> {
        self.country_iso3.as_deref()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}
