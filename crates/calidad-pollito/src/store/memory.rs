//! In-memory store double for unit tests, with an append log so tests can
//! assert write ordering across tables.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::stages::schema::TableId;
use crate::store::{Row, SheetStore, StoreError};

#[derive(Default, Clone)]
pub(crate) struct InMemorySheetStore {
    tables: Arc<Mutex<HashMap<TableId, Vec<Row>>>>,
    append_log: Arc<Mutex<Vec<TableId>>>,
    fail_appends_to: Arc<Mutex<Option<TableId>>>,
}

impl InMemorySheetStore {
    /// Order in which tables received appends, one entry per append call.
    pub(crate) fn append_log(&self) -> Vec<TableId> {
        self.append_log.lock().expect("log mutex poisoned").clone()
    }

    pub(crate) fn rows(&self, table: TableId) -> Vec<Row> {
        self.tables
            .lock()
            .expect("table mutex poisoned")
            .get(&table)
            .cloned()
            .unwrap_or_default()
    }

    /// Make every append to `table` fail, simulating a mid-pair write error.
    pub(crate) fn fail_appends_to(&self, table: TableId) {
        *self
            .fail_appends_to
            .lock()
            .expect("failure mutex poisoned") = Some(table);
    }
}

impl SheetStore for InMemorySheetStore {
    fn append_row(&self, table: TableId, row: Row) -> Result<(), StoreError> {
        self.append_rows(table, vec![row])
    }

    fn append_rows(&self, table: TableId, rows: Vec<Row>) -> Result<(), StoreError> {
        if *self
            .fail_appends_to
            .lock()
            .expect("failure mutex poisoned")
            == Some(table)
        {
            return Err(StoreError::Unavailable(format!(
                "append to {} refused",
                table.worksheet_name()
            )));
        }

        self.append_log
            .lock()
            .expect("log mutex poisoned")
            .push(table);
        self.tables
            .lock()
            .expect("table mutex poisoned")
            .entry(table)
            .or_default()
            .extend(rows);
        Ok(())
    }

    fn read(&self, table: TableId) -> Result<Vec<Row>, StoreError> {
        Ok(self.rows(table))
    }
}
