//! Batch CSV export: every table filtered to one batch id, concatenated
//! with a `--- <WORKSHEET_NAME> ---` section line before each table's dump.
//! Tables with no matching rows still emit their section and header so the
//! download always has the same shape.

use crate::stages::schema::SchemaSet;
use crate::store::{SheetStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("csv render failure: {0}")]
    Render(#[from] csv::Error),
}

pub fn export_batch<S: SheetStore>(
    store: &S,
    schemas: &SchemaSet,
    batch_id: &str,
) -> Result<String, ExportError> {
    let batch = batch_id.trim();
    let mut output = String::new();

    for schema in schemas.tables() {
        output.push_str(&format!("--- {} ---\n", schema.table.worksheet_name()));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(schema.columns)?;
        for row in store.read(schema.table)? {
            if row.first().map(|cell| cell.trim()) == Some(batch) {
                writer.write_record(&row)?;
            }
        }
        writer.flush().map_err(csv::Error::from)?;

        let bytes = writer
            .into_inner()
            .map_err(|err| ExportError::Store(StoreError::Unavailable(err.to_string())))?;
        output.push_str(&String::from_utf8_lossy(&bytes));
        output.push('\n');
    }

    Ok(output)
}
