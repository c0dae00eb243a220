//! CSV persistence for the campaign table.
//!
//! RULE: Only dataset.rs reads or writes the table file.
//! The synthesizer hands it records; the reporter asks it for records.

use crate::{
    error::{AdSalesError, AdSalesResult},
    record::{CampaignRecord, COLUMNS},
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Write the full table. The file appears at `path` only once every row
/// has been flushed; a failed write leaves no partial table behind.
pub fn write_csv(path: &Path, records: &[CampaignRecord]) -> AdSalesResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let tmp = staging_path(path);
    let result = write_rows(&tmp, records).and_then(|_| Ok(fs::rename(&tmp, path)?));
    if result.is_err() {
        // Best effort; the original error is what matters.
        let _ = fs::remove_file(&tmp);
    }
    result
}

fn write_rows(path: &Path, records: &[CampaignRecord]) -> AdSalesResult<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(COLUMNS)?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Read and validate the full table.
///
/// Fails on a missing file, a missing column, an unparseable or unknown
/// value, a row breaking a record invariant, or a duplicate campaign id.
pub fn read_csv(path: &Path) -> AdSalesResult<Vec<CampaignRecord>> {
    if !path.is_file() {
        return Err(AdSalesError::InputNotFound { path: path.to_path_buf() });
    }

    // Header names are matched, and deserialized, after trimming.
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    let headers = rdr.headers()?.clone();
    for column in COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(AdSalesError::MissingColumn { column: column.to_string() });
        }
    }

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for result in rdr.deserialize::<CampaignRecord>() {
        let record = result.map_err(|e| malformed(e, &headers))?;
        record.validate()?;
        if !seen.insert(record.campaign_id) {
            return Err(AdSalesError::OutOfRange {
                column: "campaign_id",
                campaign_id: record.campaign_id,
                value: "duplicate id".into(),
            });
        }
        records.push(record);
    }

    log::debug!("Loaded {} rows from {}", records.len(), path.display());
    Ok(records)
}

/// Turn a CSV decode error into a data error naming the row and column.
fn malformed(err: csv::Error, headers: &csv::StringRecord) -> AdSalesError {
    let line = err.position().map(|p| p.line()).unwrap_or(0);
    let message = match err.kind() {
        csv::ErrorKind::Deserialize { err: de, .. } => {
            let column = de
                .field()
                .and_then(|idx| headers.get(idx as usize))
                .unwrap_or("<unknown>");
            format!("column '{column}': {}", de.kind())
        }
        _ => err.to_string(),
    };
    AdSalesError::MalformedRow { line, message }
}
