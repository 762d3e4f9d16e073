//! Score page field extraction
//!
//! This module turns a fetched document body into a flat set of named fields.
//! Extraction is pure: no network, no shared state.
//!
//! Dimension scores are published as (score, industry average, industry max)
//! triples. Each triple is flattened into three fields that share a base name:
//! `score_env`, `score_env_ind_average`, `score_env_ind_max`.

use crate::harvest::Fields;
use crate::ExtractError;
use scraper::{ElementRef, Html, Selector};

/// Suffixes for the flattened members of a field group, in group order
pub const GROUP_SUFFIXES: [&str; 3] = ["", "_ind_average", "_ind_max"];

/// Maps a document body to its fields
pub trait Extractor: Send + Sync {
    fn extract(&self, body: &str) -> Result<Fields, ExtractError>;
}

/// An ordered (base, average, max) triple under one field name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldGroup {
    name: String,
    values: [String; 3],
}

impl FieldGroup {
    /// Builds a group from positional values, which must be exactly three
    pub fn from_values(name: impl Into<String>, values: Vec<String>) -> Result<Self, ExtractError> {
        let name = name.into();
        let values: [String; 3] = values.try_into().map_err(|v: Vec<String>| {
            ExtractError::Malformed(format!(
                "field group '{}' needs 3 values, got {}",
                name,
                v.len()
            ))
        })?;
        Ok(Self { name, values })
    }

    /// Writes the three flattened fields, preserving group order
    pub fn flatten_into(self, fields: &mut Fields) {
        for (suffix, value) in GROUP_SUFFIXES.iter().zip(self.values) {
            fields.insert(format!("{}{}", self.name, suffix), value);
        }
    }
}

/// (output field, attribute) pairs read from the company data element
const COMPANY_FIELDS: [(&str, &str); 6] = [
    ("name", "data-long-name"),
    ("ticker", "data-company-ticker"),
    ("industry", "data-industry"),
    ("country", "data-country"),
    ("score", "data-yoy-score"),
    ("availability", "data-availabilitylevel"),
];

const COMPANY_ELEMENT: &str = "company-data";

/// (group name, element id) for each dimension score
const SCORE_GROUPS: [(&str, &str); 3] = [
    ("score_env", "dimentions-score-env"),
    ("score_social", "dimentions-score-social"),
    ("score_goveco", "dimentions-score-govecon"),
];

/// Group member attributes in (base, average, max) order
const GROUP_ATTRIBUTES: [&str; 3] = ["data-score", "data-avg", "data-max"];

/// Extractor for the S&P Global ESG score results page
#[derive(Debug, Default, Clone, Copy)]
pub struct SpGlobalExtractor;

impl SpGlobalExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for SpGlobalExtractor {
    fn extract(&self, body: &str) -> Result<Fields, ExtractError> {
        let document = Html::parse_document(body);
        let mut fields = Fields::new();

        let company = find_div(&document, COMPANY_ELEMENT)?;
        for (field, attribute) in COMPANY_FIELDS {
            let value = required_attr(&company, COMPANY_ELEMENT, attribute)?;
            let value = if field == "ticker" {
                // "NasdaqGS AAPL" -> "AAPL"
                value.rsplit(' ').next().unwrap_or(value)
            } else {
                value
            };
            fields.insert(field.to_string(), value.to_string());
        }

        for (name, element_id) in SCORE_GROUPS {
            let element = find_div(&document, element_id)?;
            let values = GROUP_ATTRIBUTES
                .iter()
                .map(|attribute| required_attr(&element, element_id, attribute).map(str::to_string))
                .collect::<Result<Vec<_>, _>>()?;
            FieldGroup::from_values(name, values)?.flatten_into(&mut fields);
        }

        Ok(fields)
    }
}

/// Finds the first `div` with the given id
fn find_div<'a>(document: &'a Html, id: &str) -> Result<ElementRef<'a>, ExtractError> {
    let css = format!("div#{}", id);
    let selector = Selector::parse(&css)
        .map_err(|e| ExtractError::Malformed(format!("invalid selector {}: {:?}", css, e)))?;

    document
        .select(&selector)
        .next()
        .ok_or(ExtractError::MissingElement(css))
}

fn required_attr<'a>(
    element: &ElementRef<'a>,
    element_id: &str,
    attribute: &str,
) -> Result<&'a str, ExtractError> {
    element
        .value()
        .attr(attribute)
        .ok_or_else(|| ExtractError::MissingField {
            element: element_id.to_string(),
            attribute: attribute.to_string(),
        })
}
