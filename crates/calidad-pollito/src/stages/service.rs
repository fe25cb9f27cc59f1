use std::sync::Arc;

use serde::Serialize;

use crate::scoring::{score_samples, stats, ScoringConfig};
use crate::stages::domain::{
    BatchId, EggReceptionSubmission, FarmReceptionSubmission, HatcherySubmission, SampleGrid,
    SevenDaySubmission, Stage, TransportSubmission,
};
use crate::stages::records::{self, SevenDayFigures};
use crate::stages::schema::{SchemaSet, TableId};
use crate::store::{Row, SheetStore, StoreError, TableCache};

/// Service composing the sheet store, the scoring rubric, and the table
/// schemas. One `submit_*` operation per lifecycle stage; each submission is
/// an independent, atomic-per-row append with detail rows written before the
/// summary row.
pub struct StageService<S> {
    store: Arc<S>,
    cache: Arc<TableCache>,
    scoring: ScoringConfig,
    schemas: SchemaSet,
}

/// Error raised by stage submissions.
#[derive(Debug, thiserror::Error)]
pub enum StageServiceError {
    #[error("required fields missing: {}", fields.join(", "))]
    Validation { fields: Vec<String> },
    #[error("batch '{0}' has no hatchery evaluation on record")]
    BatchNotFound(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Figures echoed back to the operator after a successful submission.
#[derive(Debug, Clone, Serialize)]
pub struct StageOutcome {
    pub stage: Stage,
    pub batch_id: String,
    pub schema_version: String,
    pub rows_written: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composite_score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uniformity_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cv_weight_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_weight_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_cloacal_temp_c: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_gain_g: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub growth_factor: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mortality_pct: Option<f64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub warnings: Vec<String>,
}

impl StageOutcome {
    fn new(stage: Stage, batch_id: &BatchId, schema_version: &str, rows_written: usize) -> Self {
        Self {
            stage,
            batch_id: batch_id.trimmed().to_string(),
            schema_version: schema_version.to_string(),
            rows_written,
            composite_score: None,
            uniformity_pct: None,
            cv_weight_pct: None,
            mean_weight_g: None,
            mean_cloacal_temp_c: None,
            daily_gain_g: None,
            growth_factor: None,
            mortality_pct: None,
            warnings: Vec::new(),
        }
    }
}

impl<S: SheetStore> StageService<S> {
    pub fn new(
        store: Arc<S>,
        cache: Arc<TableCache>,
        scoring: ScoringConfig,
        schemas: SchemaSet,
    ) -> Self {
        Self {
            store,
            cache,
            scoring,
            schemas,
        }
    }

    pub fn scoring_config(&self) -> &ScoringConfig {
        &self.scoring
    }

    /// Fresh sample-entry grid seeded for the configured sample size.
    pub fn default_grid(&self) -> SampleGrid {
        SampleGrid::seeded(self.scoring.sample_size)
    }

    pub fn submit_egg_reception(
        &self,
        submission: EggReceptionSubmission,
    ) -> Result<StageOutcome, StageServiceError> {
        require_fields(&[
            ("lote_id", submission.batch_id.trimmed()),
            ("granja_origen", &submission.origin_farm),
        ])?;

        let mean = stats::mean(&submission.egg_weights_g);
        let cv = stats::coefficient_of_variation(&submission.egg_weights_g);
        let row = records::egg_reception_summary(
            &submission,
            mean,
            cv,
            &self.scoring.schema_version,
        );
        self.append(TableId::EggReception, vec![row])?;

        let mut outcome = StageOutcome::new(
            Stage::EggReception,
            &submission.batch_id,
            &self.scoring.schema_version,
            1,
        );
        outcome.mean_weight_g = Some(mean);
        outcome.cv_weight_pct = Some(cv);
        Ok(outcome)
    }

    pub fn submit_hatchery(
        &self,
        submission: HatcherySubmission,
    ) -> Result<StageOutcome, StageServiceError> {
        require_fields(&[
            ("lote_id", submission.batch_id.trimmed()),
            ("granja_origen", &submission.origin_farm),
            ("evaluador", &submission.evaluator),
        ])?;

        let score = score_samples(&submission.samples, &self.scoring);
        let detail = records::detail_rows(&submission.batch_id, &submission.samples);
        let summary = records::hatchery_summary(&submission, &score, &self.scoring.schema_version);

        let rows_written = detail.len() + 1;
        self.append(TableId::HatcheryDetail, detail)?;
        self.append(TableId::HatcherySummary, vec![summary])?;

        let mut outcome = StageOutcome::new(
            Stage::Hatchery,
            &submission.batch_id,
            &self.scoring.schema_version,
            rows_written,
        );
        outcome.composite_score = Some(score.composite_score);
        outcome.uniformity_pct = Some(score.uniformity_pct);
        outcome.cv_weight_pct = Some(score.cv_weight_pct);
        outcome.mean_weight_g = Some(score.mean_weight_g);
        outcome.mean_cloacal_temp_c = score.mean_cloacal_temp_c;
        outcome.warnings = score
            .warnings
            .iter()
            .map(|warning| warning.label().to_string())
            .collect();
        Ok(outcome)
    }

    pub fn submit_transport(
        &self,
        submission: TransportSubmission,
    ) -> Result<StageOutcome, StageServiceError> {
        require_fields(&[
            ("lote_id", submission.batch_id.trimmed()),
            ("placa", &submission.plate),
            ("conductor", &submission.driver),
        ])?;

        let row = records::transport_row(&submission, &self.scoring.schema_version);
        self.append(TableId::Transport, vec![row])?;

        Ok(StageOutcome::new(
            Stage::Transport,
            &submission.batch_id,
            &self.scoring.schema_version,
            1,
        ))
    }

    pub fn submit_farm_reception(
        &self,
        submission: FarmReceptionSubmission,
    ) -> Result<StageOutcome, StageServiceError> {
        require_fields(&[
            ("lote_id", submission.batch_id.trimmed()),
            ("evaluador", &submission.evaluator),
        ])?;

        let score = score_samples(&submission.samples, &self.scoring);
        let temps: Vec<f64> = submission
            .samples
            .iter()
            .filter_map(|sample| sample.cloacal_temp_c)
            .collect();
        let cv_temp_pct = stats::coefficient_of_variation(&temps);

        let detail = records::detail_rows(&submission.batch_id, &submission.samples);
        let summary =
            records::farm_summary(&submission, &score, cv_temp_pct, &self.scoring.schema_version);

        let rows_written = detail.len() + 1;
        self.append(TableId::FarmDetail, detail)?;
        self.append(TableId::FarmSummary, vec![summary])?;

        let mut outcome = StageOutcome::new(
            Stage::FarmReception,
            &submission.batch_id,
            &self.scoring.schema_version,
            rows_written,
        );
        outcome.composite_score = Some(score.composite_score);
        outcome.uniformity_pct = Some(score.uniformity_pct);
        outcome.cv_weight_pct = Some(score.cv_weight_pct);
        outcome.mean_weight_g = Some(score.mean_weight_g);
        outcome.mean_cloacal_temp_c = score.mean_cloacal_temp_c;
        outcome.warnings = score
            .warnings
            .iter()
            .map(|warning| warning.label().to_string())
            .collect();
        Ok(outcome)
    }

    /// Seven-day follow-up. The only stage with a hard cross-stage
    /// dependency: a batch with no hatchery summary row is rejected before
    /// anything is written.
    pub fn submit_seven_day(
        &self,
        submission: SevenDaySubmission,
    ) -> Result<StageOutcome, StageServiceError> {
        require_fields(&[("lote_id", submission.batch_id.trimmed())])?;

        let hatchery = self.store.read(TableId::HatcherySummary)?;
        let batch = submission.batch_id.trimmed();
        let Some(hatchery_row) = last_batch_row(&hatchery, batch) else {
            return Err(StageServiceError::BatchNotFound(batch.to_string()));
        };

        let total_count = self.cell(TableId::HatcherySummary, hatchery_row, "cantidad_total");

        let farm_detail = self.store.read(TableId::FarmDetail)?;
        let farm_schema = self.schemas.schema(TableId::FarmDetail);
        let weight_col = farm_schema.column_index("peso_gr");
        let farm_weights: Vec<f64> = farm_detail
            .iter()
            .filter(|row| row.first().map(|cell| cell.trim()) == Some(batch))
            .filter_map(|row| parse_cell(row, weight_col))
            .collect();
        let reception_mean = stats::mean(&farm_weights);

        let mean_7d = stats::mean(&submission.weights_g);
        // Gain and growth factor need a farm-reception baseline; without one
        // they render as 0 rather than failing.
        let daily_gain_g = if reception_mean > 0.0 {
            (mean_7d - reception_mean) / 7.0
        } else {
            0.0
        };
        let figures = SevenDayFigures {
            mean_weight_7d_g: mean_7d,
            cv_weight_pct: stats::coefficient_of_variation(&submission.weights_g),
            daily_gain_g,
            growth_factor: stats::ratio_or_zero(mean_7d, reception_mean),
            mortality_pct: stats::ratio_or_zero(
                100.0 * f64::from(submission.mortality_count),
                total_count,
            ),
        };

        let detail = records::seven_day_detail_rows(&submission.batch_id, &submission.weights_g);
        let summary =
            records::seven_day_summary(&submission, &figures, &self.scoring.schema_version);

        let rows_written = detail.len() + 1;
        self.append(TableId::SevenDayDetail, detail)?;
        self.append(TableId::SevenDaySummary, vec![summary])?;

        let mut outcome = StageOutcome::new(
            Stage::SevenDay,
            &submission.batch_id,
            &self.scoring.schema_version,
            rows_written,
        );
        outcome.mean_weight_g = Some(figures.mean_weight_7d_g);
        outcome.cv_weight_pct = Some(figures.cv_weight_pct);
        outcome.daily_gain_g = Some(figures.daily_gain_g);
        outcome.growth_factor = Some(figures.growth_factor);
        outcome.mortality_pct = Some(figures.mortality_pct);
        Ok(outcome)
    }

    fn append(&self, table: TableId, rows: Vec<Row>) -> Result<(), StageServiceError> {
        if rows.is_empty() {
            return Ok(());
        }
        self.store.append_rows(table, rows)?;
        self.cache.invalidate();
        Ok(())
    }

    fn cell(&self, table: TableId, row: &Row, column: &str) -> f64 {
        let index = self.schemas.schema(table).column_index(column);
        parse_cell(row, index).unwrap_or(0.0)
    }
}

fn require_fields(fields: &[(&str, &str)]) -> Result<(), StageServiceError> {
    let missing: Vec<String> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(StageServiceError::Validation { fields: missing })
    }
}

fn last_batch_row<'a>(rows: &'a [Row], batch: &str) -> Option<&'a Row> {
    rows.iter()
        .rev()
        .find(|row| row.first().map(|cell| cell.trim()) == Some(batch))
}

fn parse_cell(row: &Row, index: Option<usize>) -> Option<f64> {
    index
        .and_then(|i| row.get(i))
        .and_then(|cell| cell.trim().parse::<f64>().ok())
}
