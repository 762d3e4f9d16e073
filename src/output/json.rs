//! JSON export of the final mapping

use crate::harvest::Record;
use crate::HarvestError;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Writes records as one pretty-printed JSON object keyed by identifier
///
/// Keys are sorted so repeated runs over the same data diff cleanly.
pub fn write_results(records: &HashMap<String, Record>, path: &Path) -> Result<(), HarvestError> {
    let sorted: BTreeMap<&String, &Record> = records.iter().collect();

    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, &sorted)?;
    writer.write_all(b"\n")?;
    writer.flush()?;

    tracing::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
