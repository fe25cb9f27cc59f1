use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::stages::schema::{SchemaSet, TableId};
use crate::store::{Row, SheetStore, StoreError};

/// One CSV file per worksheet under a data directory. The header row is
/// written when a table file is first created; appends never rewrite
/// existing rows.
#[derive(Debug)]
pub struct CsvSheetStore {
    dir: PathBuf,
    schemas: SchemaSet,
}

impl CsvSheetStore {
    /// Open (or initialize) the store, creating the directory and any
    /// missing table files with their header rows.
    pub fn open(dir: impl Into<PathBuf>, schemas: SchemaSet) -> Result<Self, StoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .map_err(|err| StoreError::Unavailable(format!("{}: {err}", dir.display())))?;

        let store = Self { dir, schemas };
        store.ensure_tables()?;
        Ok(store)
    }

    fn ensure_tables(&self) -> Result<(), StoreError> {
        for schema in self.schemas.tables() {
            let path = self.path(schema.table);
            if path.exists() {
                continue;
            }
            let file = File::create(&path)?;
            let mut writer = csv::Writer::from_writer(file);
            writer.write_record(schema.columns)?;
            writer.flush()?;
        }
        Ok(())
    }

    fn path(&self, table: TableId) -> PathBuf {
        self.dir.join(format!("{}.csv", table.worksheet_name()))
    }

    fn require_table(&self, table: TableId) -> Result<PathBuf, StoreError> {
        let path = self.path(table);
        if !path.exists() {
            return Err(StoreError::WorksheetNotFound(
                table.worksheet_name().to_string(),
            ));
        }
        Ok(path)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl SheetStore for CsvSheetStore {
    fn append_row(&self, table: TableId, row: Row) -> Result<(), StoreError> {
        self.append_rows(table, vec![row])
    }

    fn append_rows(&self, table: TableId, rows: Vec<Row>) -> Result<(), StoreError> {
        let path = self.require_table(table)?;
        let file = OpenOptions::new().append(true).open(path)?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for row in rows {
            writer.write_record(&row)?;
        }
        writer.flush()?;
        Ok(())
    }

    fn read(&self, table: TableId) -> Result<Vec<Row>, StoreError> {
        let path = self.require_table(table)?;
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(|cell| cell.to_string()).collect());
        }
        Ok(rows)
    }
}
