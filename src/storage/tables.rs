//! Contact table input and results table output.
//!
//! Both tables are CSV files with a header row.

use std::path::Path;

use tracing::info;

use super::{Result, StorageError};
use crate::domain::{Contact, SentEmail, RESULT_COLUMNS};

/// Reads every contact row from the table at `path`, in file order.
///
/// The table must have `name` and `title` columns; other columns are ignored.
pub fn read_contacts(path: impl AsRef<Path>) -> Result<Vec<Contact>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|source| StorageError::table(path, source))?;

    let headers = reader
        .headers()
        .map_err(|source| StorageError::table(path, source))?;
    for required in ["name", "title"] {
        if !headers.iter().any(|h| h == required) {
            return Err(StorageError::MissingColumn {
                path: path.to_path_buf(),
                column: required,
            });
        }
    }

    let contacts = reader
        .deserialize::<Contact>()
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|source| StorageError::table(path, source))?;

    info!(path = %path.display(), rows = contacts.len(), "Loaded contact table");
    Ok(contacts)
}

/// Writes the results table, one row per successful send.
///
/// The header row is written even when there are no records.
pub fn write_results(path: impl AsRef<Path>, records: &[SentEmail]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|source| StorageError::table(path, source))?;

    writer
        .write_record(RESULT_COLUMNS)
        .map_err(|source| StorageError::table(path, source))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|source| StorageError::table(path, source))?;
    }
    writer
        .flush()
        .map_err(|e| StorageError::io("flushing results", path, e))?;

    Ok(())
}
