//! Stage record builders: straight mappings from validated submissions plus
//! engine output onto flat rows in persisted column order. No validation
//! happens here. Booleans become the uppercase `TRUE`/`FALSE` tokens the
//! spreadsheet consumers expect, and floats are rounded to two decimals.

use crate::scoring::ScoreOutcome;
use crate::stages::domain::{
    BatchId, CheckKind, EggReceptionSubmission, FarmReceptionSubmission, HatcherySubmission,
    SampleRecord, SevenDaySubmission, TransportSubmission,
};
use crate::store::Row;

pub(crate) fn fmt_bool(value: bool) -> String {
    if value { "TRUE" } else { "FALSE" }.to_string()
}

pub(crate) fn fmt_f64(value: f64) -> String {
    format!("{value:.2}")
}

pub(crate) fn egg_reception_summary(
    submission: &EggReceptionSubmission,
    mean_egg_weight_g: f64,
    cv_weight_pct: f64,
    schema_version: &str,
) -> Row {
    vec![
        submission.batch_id.trimmed().to_string(),
        submission.origin_farm.trim().to_string(),
        submission.breeder_age_weeks.to_string(),
        submission.reception_date.to_string(),
        fmt_f64(submission.truck_temp_c),
        submission.wait_minutes.to_string(),
        fmt_f64(submission.pct_dirty),
        fmt_f64(submission.pct_cracked),
        fmt_f64(mean_egg_weight_g),
        fmt_f64(cv_weight_pct),
        schema_version.to_string(),
    ]
}

pub(crate) fn hatchery_summary(
    submission: &HatcherySubmission,
    outcome: &ScoreOutcome,
    schema_version: &str,
) -> Row {
    vec![
        submission.batch_id.trimmed().to_string(),
        submission.origin_farm.trim().to_string(),
        submission.genetic_line.label().to_string(),
        submission.birth_date.to_string(),
        submission.total_count.to_string(),
        submission.evaluator.trim().to_string(),
        fmt_f64(submission.truck_temp_c),
        fmt_f64(submission.shell_temp_c),
        fmt_f64(submission.room_temp_c),
        fmt_bool(submission.egg_sweating),
        submission.birds_per_box.to_string(),
        fmt_f64(outcome.mean_cloacal_temp_c.unwrap_or(0.0)),
        fmt_f64(outcome.composite_score),
        fmt_f64(outcome.uniformity_pct),
        fmt_f64(outcome.cv_weight_pct),
        schema_version.to_string(),
    ]
}

/// One detail row per sampled unit, tagged with the parent batch.
pub(crate) fn detail_rows(batch_id: &BatchId, samples: &[SampleRecord]) -> Vec<Row> {
    samples
        .iter()
        .map(|sample| {
            let mut row = Vec::with_capacity(12);
            row.push(batch_id.trimmed().to_string());
            row.push(sample.unit_number.to_string());
            for kind in CheckKind::ordered() {
                row.push(fmt_bool(sample.passed(kind)));
            }
            row.push(fmt_f64(sample.weight_g));
            row.push(fmt_f64(sample.cloacal_temp_c.unwrap_or(0.0)));
            row
        })
        .collect()
}

pub(crate) fn transport_row(
    submission: &TransportSubmission,
    schema_version: &str,
) -> Row {
    vec![
        submission.batch_id.trimmed().to_string(),
        submission.date.to_string(),
        submission.plate.trim().to_string(),
        submission.driver.trim().to_string(),
        submission.departure_time.format("%H:%M").to_string(),
        submission.arrival_time.format("%H:%M").to_string(),
        submission.duration_minutes().to_string(),
        fmt_f64(submission.temp_start_c),
        fmt_f64(submission.humidity_start_pct),
        fmt_f64(submission.temp_end_c),
        fmt_f64(submission.humidity_end_pct),
        submission.arrival_behavior.label().to_string(),
        submission.mortality_count.to_string(),
        schema_version.to_string(),
    ]
}

pub(crate) fn farm_summary(
    submission: &FarmReceptionSubmission,
    outcome: &ScoreOutcome,
    cv_temp_pct: f64,
    schema_version: &str,
) -> Row {
    vec![
        submission.batch_id.trimmed().to_string(),
        submission.reception_date.to_string(),
        submission.evaluator.trim().to_string(),
        fmt_f64(submission.ambient_temp_c),
        fmt_f64(submission.relative_humidity_pct),
        fmt_f64(submission.litter_temp_c),
        fmt_f64(submission.full_crop_pct),
        fmt_f64(cv_temp_pct),
        fmt_f64(outcome.cv_weight_pct),
        fmt_f64(outcome.composite_score),
        schema_version.to_string(),
    ]
}

/// Figures the service derives before building the seven-day summary.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SevenDayFigures {
    pub mean_weight_7d_g: f64,
    pub cv_weight_pct: f64,
    pub daily_gain_g: f64,
    pub growth_factor: f64,
    pub mortality_pct: f64,
}

pub(crate) fn seven_day_summary(
    submission: &SevenDaySubmission,
    figures: &SevenDayFigures,
    schema_version: &str,
) -> Row {
    vec![
        submission.batch_id.trimmed().to_string(),
        submission.date.to_string(),
        fmt_f64(figures.mean_weight_7d_g),
        fmt_f64(figures.cv_weight_pct),
        fmt_f64(figures.daily_gain_g),
        fmt_f64(figures.growth_factor),
        submission.mortality_count.to_string(),
        fmt_f64(figures.mortality_pct),
        schema_version.to_string(),
    ]
}

pub(crate) fn seven_day_detail_rows(batch_id: &BatchId, weights_g: &[f64]) -> Vec<Row> {
    weights_g
        .iter()
        .enumerate()
        .map(|(index, weight)| {
            vec![
                batch_id.trimmed().to_string(),
                (index as u32 + 1).to_string(),
                fmt_f64(*weight),
            ]
        })
        .collect()
}
