//! Cross-stage batch dashboard.
//!
//! Stateless: every call re-reads the persisted tables (through the TTL
//! cache), joins rows by trimmed batch id, and recomputes the derived KPIs.
//! When a batch was submitted more than once for a stage, the latest row
//! wins.

pub mod views;

pub use views::{
    BatchDashboard, CrossStageKpis, EggReceptionSnapshot, FarmReceptionSnapshot, HatcherySnapshot,
    SevenDaySnapshot, TransportSnapshot,
};

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::scoring::stats;
use crate::stages::schema::{SchemaSet, TableId, TableSchema};
use crate::store::{Row, SheetStore, StoreError, TableCache};

pub struct DashboardAggregator<S> {
    store: Arc<S>,
    cache: Arc<TableCache>,
    schemas: SchemaSet,
}

impl<S: SheetStore> DashboardAggregator<S> {
    pub fn new(store: Arc<S>, cache: Arc<TableCache>, schemas: SchemaSet) -> Self {
        Self {
            store,
            cache,
            schemas,
        }
    }

    /// Drop the memoized tables so the next render reads fresh rows.
    pub fn refresh(&self) {
        self.cache.invalidate();
    }

    /// Distinct batch ids seen across the stage summary tables.
    pub fn known_batches(&self) -> Result<Vec<String>, StoreError> {
        let mut batches = BTreeSet::new();
        for table in [
            TableId::EggReception,
            TableId::HatcherySummary,
            TableId::Transport,
            TableId::FarmSummary,
            TableId::SevenDaySummary,
        ] {
            for row in self.cache.read_through(self.store.as_ref(), table)? {
                if let Some(batch) = row.first() {
                    let batch = batch.trim();
                    if !batch.is_empty() {
                        batches.insert(batch.to_string());
                    }
                }
            }
        }
        Ok(batches.into_iter().collect())
    }

    pub fn batch_dashboard(&self, batch_id: &str) -> Result<BatchDashboard, StoreError> {
        let batch = batch_id.trim();

        let egg_reception = self
            .latest_row(TableId::EggReception, batch)?
            .map(|row| self.egg_snapshot(&row));
        let mut hatchery = self
            .latest_row(TableId::HatcherySummary, batch)?
            .map(|row| self.hatchery_snapshot(&row));
        let transport = self
            .latest_row(TableId::Transport, batch)?
            .map(|row| self.transport_snapshot(&row));
        let mut farm_reception = self
            .latest_row(TableId::FarmSummary, batch)?
            .map(|row| self.farm_snapshot(&row));
        let seven_day = self
            .latest_row(TableId::SevenDaySummary, batch)?
            .map(|row| self.seven_day_snapshot(&row));

        // Mean weights live in the per-unit detail tables, not the summaries.
        let hatchery_mean = self.detail_mean_weight(TableId::HatcheryDetail, batch)?;
        let farm_mean = self.detail_mean_weight(TableId::FarmDetail, batch)?;
        if let Some(snapshot) = hatchery.as_mut() {
            snapshot.mean_weight_g = hatchery_mean;
        }
        if let Some(snapshot) = farm_reception.as_mut() {
            snapshot.mean_weight_g = farm_mean;
        }

        let hatchery_score = hatchery.as_ref().map_or(0.0, |s| s.composite_score);
        let farm_score = farm_reception.as_ref().map_or(0.0, |s| s.composite_score);

        let kpis = CrossStageKpis {
            quality_drop_pct: if farm_reception.is_some() {
                stats::pct_drop_or_zero(hatchery_score, farm_score)
            } else {
                0.0
            },
            weight_shrinkage_pct: if farm_mean > 0.0 {
                stats::pct_drop_or_zero(hatchery_mean, farm_mean)
            } else {
                0.0
            },
            mortality_pct_7d: seven_day.as_ref().map_or(0.0, |s| s.mortality_pct),
            daily_gain_g: seven_day.as_ref().map_or(0.0, |s| s.daily_gain_g),
        };

        Ok(BatchDashboard {
            batch_id: batch.to_string(),
            egg_reception,
            hatchery,
            transport,
            farm_reception,
            seven_day,
            kpis,
        })
    }

    fn latest_row(&self, table: TableId, batch: &str) -> Result<Option<Row>, StoreError> {
        let rows = self.cache.read_through(self.store.as_ref(), table)?;
        Ok(rows
            .into_iter()
            .rev()
            .find(|row| row.first().map(|cell| cell.trim()) == Some(batch)))
    }

    fn detail_mean_weight(&self, table: TableId, batch: &str) -> Result<f64, StoreError> {
        let schema = self.schemas.schema(table);
        let weight_col = schema.column_index("peso_gr");
        let rows = self.cache.read_through(self.store.as_ref(), table)?;
        let weights: Vec<f64> = rows
            .iter()
            .filter(|row| row.first().map(|cell| cell.trim()) == Some(batch))
            .filter_map(|row| {
                weight_col
                    .and_then(|i| row.get(i))
                    .and_then(|cell| cell.trim().parse::<f64>().ok())
            })
            .collect();
        Ok(stats::mean(&weights))
    }

    fn field(&self, schema: &TableSchema, row: &Row, column: &str) -> f64 {
        schema
            .column_index(column)
            .and_then(|i| row.get(i))
            .and_then(|cell| cell.trim().parse::<f64>().ok())
            .unwrap_or(0.0)
    }

    fn text(&self, schema: &TableSchema, row: &Row, column: &str) -> String {
        schema
            .column_index(column)
            .and_then(|i| row.get(i))
            .map(|cell| cell.trim().to_string())
            .unwrap_or_default()
    }

    fn egg_snapshot(&self, row: &Row) -> EggReceptionSnapshot {
        let schema = self.schemas.schema(TableId::EggReception);
        EggReceptionSnapshot {
            mean_egg_weight_g: self.field(schema, row, "peso_promedio_huevo_gr"),
            cv_weight_pct: self.field(schema, row, "cv_peso_pct"),
            pct_dirty: self.field(schema, row, "pct_sucios"),
            pct_cracked: self.field(schema, row, "pct_fisurados"),
        }
    }

    fn hatchery_snapshot(&self, row: &Row) -> HatcherySnapshot {
        let schema = self.schemas.schema(TableId::HatcherySummary);
        HatcherySnapshot {
            composite_score: self.field(schema, row, "puntuacion_final"),
            uniformity_pct: self.field(schema, row, "uniformidad_pct"),
            cv_weight_pct: self.field(schema, row, "cv_peso_pct"),
            mean_weight_g: 0.0, // patched from detail rows in batch_dashboard
            mean_cloacal_temp_c: self.field(schema, row, "temp_cloacal_promedio"),
            total_count: self.field(schema, row, "cantidad_total"),
        }
    }

    fn transport_snapshot(&self, row: &Row) -> TransportSnapshot {
        let schema = self.schemas.schema(TableId::Transport);
        TransportSnapshot {
            duration_minutes: self.field(schema, row, "duracion_minutos"),
            mortality_count: self.field(schema, row, "mortalidad"),
            arrival_behavior: self.text(schema, row, "comportamiento_llegada"),
        }
    }

    fn farm_snapshot(&self, row: &Row) -> FarmReceptionSnapshot {
        let schema = self.schemas.schema(TableId::FarmSummary);
        FarmReceptionSnapshot {
            composite_score: self.field(schema, row, "puntuacion_final"),
            cv_weight_pct: self.field(schema, row, "cv_peso_pct"),
            mean_weight_g: 0.0, // patched from detail rows in batch_dashboard
            full_crop_pct: self.field(schema, row, "pct_buche_lleno"),
        }
    }

    fn seven_day_snapshot(&self, row: &Row) -> SevenDaySnapshot {
        let schema = self.schemas.schema(TableId::SevenDaySummary);
        SevenDaySnapshot {
            mean_weight_7d_g: self.field(schema, row, "peso_promedio_7d_gr"),
            daily_gain_g: self.field(schema, row, "ganancia_diaria_gr"),
            growth_factor: self.field(schema, row, "factor_crecimiento"),
            mortality_count: self.field(schema, row, "mortalidad"),
            mortality_pct: self.field(schema, row, "mortalidad_pct"),
        }
    }
}
