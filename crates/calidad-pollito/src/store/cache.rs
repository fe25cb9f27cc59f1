use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::stages::schema::TableId;
use crate::store::{Row, SheetStore, StoreError};

/// TTL-memoized table reads for the dashboard.
///
/// Dashboard renders re-read every table; this keeps repeated renders from
/// hammering the backing store. Stage writes call [`TableCache::invalidate`]
/// so operators see their own submission immediately.
#[derive(Debug)]
pub struct TableCache {
    ttl: Duration,
    entries: Mutex<HashMap<TableId, CacheEntry>>,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    fetched_at: Instant,
    rows: Vec<Row>,
}

impl TableCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn read_through<S: SheetStore + ?Sized>(
        &self,
        store: &S,
        table: TableId,
    ) -> Result<Vec<Row>, StoreError> {
        {
            let guard = self.entries.lock().expect("cache mutex poisoned");
            if let Some(entry) = guard.get(&table) {
                if entry.fetched_at.elapsed() < self.ttl {
                    return Ok(entry.rows.clone());
                }
            }
        }

        let rows = store.read(table)?;
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        guard.insert(
            table,
            CacheEntry {
                fetched_at: Instant::now(),
                rows: rows.clone(),
            },
        );
        Ok(rows)
    }

    /// Drop every memoized table; the next read hits the store.
    pub fn invalidate(&self) {
        self.entries.lock().expect("cache mutex poisoned").clear();
    }
}
