//! JSON import/export of a user's review records.
//! Used for backups and for moving a study history between databases.

use crate::error::ExportError;
use crate::models::VocabularyReviewRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecordExport {
    pub user_id: String,
    pub records: Vec<VocabularyReviewRecord>,
}

/// Writes the export as pretty-printed JSON to `path`.
pub fn export_json_to_path(export: &RecordExport, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(&mut writer, export)?;
    writer.flush()?;
    info!(
        user_id = %export.user_id,
        records = export.records.len(),
        path = %path.as_ref().display(),
        "exported review records"
    );
    Ok(())
}

pub fn import_json(path: impl AsRef<Path>) -> Result<RecordExport, ExportError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    let export: RecordExport = serde_json::from_reader(reader)?;
    info!(
        user_id = %export.user_id,
        records = export.records.len(),
        "imported review records"
    );
    Ok(export)
}
