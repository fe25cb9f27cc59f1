use super::common::*;
use crate::scoring::score_samples;
use crate::stages::domain::{BatchId, CheckKind};
use crate::stages::records;
use crate::stages::schema::{SchemaSet, TableId};

#[test]
fn detail_rows_serialize_booleans_as_uppercase_tokens() {
    let batch = BatchId(" L-55 ".to_string());
    let mut samples = passing_samples(2, 41.5);
    samples[1].checks.insert(CheckKind::Navel, false);
    samples[1].cloacal_temp_c = None;

    let rows = records::detail_rows(&batch, &samples);
    let schema = SchemaSet::latest().schema(TableId::HatcheryDetail).clone();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.len(), schema.columns.len());
        assert_eq!(row[0], "L-55", "batch id is trimmed");
    }

    let navel = schema.column_index("ombligo_ok").expect("column exists");
    assert_eq!(rows[0][navel], "TRUE");
    assert_eq!(rows[1][navel], "FALSE");

    let weight = schema.column_index("peso_gr").expect("column exists");
    assert_eq!(rows[0][weight], "41.50");

    let temp = schema.column_index("temp_cloacal").expect("column exists");
    assert_eq!(rows[1][temp], "0.00", "missing temperature renders as zero");
}

#[test]
fn hatchery_summary_matches_schema_width_and_order() {
    let submission = hatchery_submission("L-55");
    let config = test_config();
    let score = score_samples(&submission.samples, &config);
    let row = records::hatchery_summary(&submission, &score, &config.schema_version);

    let schema_set = SchemaSet::latest();
    let schema = schema_set.schema(TableId::HatcherySummary);
    assert_eq!(row.len(), schema.columns.len());

    let sweating = schema.column_index("huevo_sudado").expect("column exists");
    assert_eq!(row[sweating], "FALSE");

    let score_col = schema
        .column_index("puntuacion_final")
        .expect("column exists");
    assert_eq!(row[score_col], "105.00");

    assert_eq!(row.last().map(String::as_str), Some("mr-v1"));
}

#[test]
fn transport_row_computes_duration_and_behavior_token() {
    let submission = transport_submission("L-55");
    let row = records::transport_row(&submission, "mr-v1");

    let schema_set = SchemaSet::latest();
    let schema = schema_set.schema(TableId::Transport);
    assert_eq!(row.len(), schema.columns.len());

    let duration = schema
        .column_index("duracion_minutos")
        .expect("column exists");
    assert_eq!(row[duration], "150");

    let behavior = schema
        .column_index("comportamiento_llegada")
        .expect("column exists");
    assert_eq!(row[behavior], "normal");
}

#[test]
fn seven_day_detail_numbers_units_from_one() {
    let batch = BatchId("L-55".to_string());
    let rows = records::seven_day_detail_rows(&batch, &[171.0, 168.5]);
    assert_eq!(rows[0], vec!["L-55", "1", "171.00"]);
    assert_eq!(rows[1], vec!["L-55", "2", "168.50"]);
}
