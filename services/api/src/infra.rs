use calidad_pollito::config::StorageConfig;
use calidad_pollito::error::AppError;
use calidad_pollito::stages::SchemaSet;
use calidad_pollito::store::{CsvSheetStore, TableCache};
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Open the worksheet store at the configured data directory and build the
/// shared read cache. The service and the dashboard share both so a stage
/// submission invalidates what the dashboard reads.
pub(crate) fn open_sheet_runtime(
    storage: &StorageConfig,
) -> Result<(Arc<CsvSheetStore>, Arc<TableCache>), AppError> {
    let store = CsvSheetStore::open(storage.data_dir.clone(), SchemaSet::latest())?;
    let cache = TableCache::new(Duration::from_secs(storage.cache_ttl_secs));
    Ok((Arc::new(store), Arc::new(cache)))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
