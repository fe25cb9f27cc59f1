//! Persistence adapter over the worksheet-shaped tables.
//!
//! Append-only, row-at-a-time semantics: no transaction spans the paired
//! summary+detail writes, so callers write detail rows first and the summary
//! last (a mid-pair failure leaves orphaned detail rows, which readers
//! ignore, rather than a summary with no supporting detail).

mod cache;
mod csv_store;

#[cfg(test)]
pub(crate) mod memory;

pub use cache::TableCache;
pub use csv_store::CsvSheetStore;

use crate::stages::schema::TableId;

/// One flat worksheet row, cells already rendered to text.
pub type Row = Vec<String>;

/// Storage abstraction so the stage service and dashboard can be exercised
/// against an in-memory double.
pub trait SheetStore: Send + Sync {
    fn append_row(&self, table: TableId, row: Row) -> Result<(), StoreError>;
    fn append_rows(&self, table: TableId, rows: Vec<Row>) -> Result<(), StoreError>;
    /// Data rows only; the header row is excluded.
    fn read(&self, table: TableId) -> Result<Vec<Row>, StoreError>;
}

/// Error enumeration for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("worksheet '{0}' not found")]
    WorksheetNotFound(String),
    #[error("sheet store unavailable: {0}")]
    Unavailable(String),
    #[error("sheet data error: {0}")]
    Data(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
