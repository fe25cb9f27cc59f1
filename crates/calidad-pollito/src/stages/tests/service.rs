use super::common::*;
use crate::stages::schema::TableId;
use crate::stages::service::StageServiceError;

#[test]
fn hatchery_submission_writes_detail_rows_before_the_summary() {
    let (service, store) = service();

    let outcome = service
        .submit_hatchery(hatchery_submission("L-1"))
        .expect("submission succeeds");

    assert_eq!(outcome.rows_written, 11);
    assert_eq!(
        store.append_log(),
        vec![TableId::HatcheryDetail, TableId::HatcherySummary]
    );
    assert_eq!(store.rows(TableId::HatcheryDetail).len(), 10);
    assert_eq!(store.rows(TableId::HatcherySummary).len(), 1);
    assert!((outcome.composite_score.expect("scored") - 105.0).abs() < 1e-9);
    assert!((outcome.uniformity_pct.expect("scored") - 100.0).abs() < 1e-9);
    assert_eq!(outcome.mean_cloacal_temp_c, Some(40.0));
}

#[test]
fn validation_failure_blocks_any_write() {
    let (service, store) = service();

    let mut submission = hatchery_submission("L-1");
    submission.evaluator = "   ".to_string();
    submission.origin_farm = String::new();

    let err = service
        .submit_hatchery(submission)
        .expect_err("submission should fail");
    match err {
        StageServiceError::Validation { fields } => {
            assert_eq!(fields, vec!["granja_origen", "evaluador"]);
        }
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(store.append_log().is_empty(), "nothing should be written");
}

#[test]
fn seven_day_submission_requires_a_prior_hatchery_row() {
    let (service, store) = service();

    let err = service
        .submit_seven_day(seven_day_submission("L-nunca"))
        .expect_err("submission should fail");
    match err {
        StageServiceError::BatchNotFound(batch) => assert_eq!(batch, "L-nunca"),
        other => panic!("expected batch-not-found, got {other:?}"),
    }
    assert!(store.append_log().is_empty(), "nothing should be written");
}

#[test]
fn seven_day_submission_derives_gain_and_mortality_from_prior_stages() {
    let (service, store) = service();

    service
        .submit_hatchery(hatchery_submission("L-2"))
        .expect("hatchery succeeds");
    service
        .submit_farm_reception(farm_submission("L-2"))
        .expect("farm reception succeeds");

    let outcome = service
        .submit_seven_day(seven_day_submission("L-2"))
        .expect("seven-day succeeds");

    // Farm reception mean is 38 g, day-7 mean 170 g over a 1000-bird batch.
    let gain = outcome.daily_gain_g.expect("derived");
    assert!((gain - (170.0 - 38.0) / 7.0).abs() < 1e-9);
    let factor = outcome.growth_factor.expect("derived");
    assert!((factor - 170.0 / 38.0).abs() < 1e-9);
    let mortality = outcome.mortality_pct.expect("derived");
    assert!((mortality - 3.0).abs() < 1e-9);

    assert_eq!(store.rows(TableId::SevenDayDetail).len(), 10);
    assert_eq!(store.rows(TableId::SevenDaySummary).len(), 1);
}

#[test]
fn seven_day_batch_match_trims_whitespace_only() {
    let (service, _store) = service();

    service
        .submit_hatchery(hatchery_submission("  L-3 "))
        .expect("hatchery succeeds");

    service
        .submit_seven_day(seven_day_submission("L-3"))
        .expect("trimmed ids should match");

    let err = service
        .submit_seven_day(seven_day_submission("l-3"))
        .expect_err("case differences do not match");
    assert!(matches!(err, StageServiceError::BatchNotFound(_)));
}

#[test]
fn summary_write_failure_leaves_only_orphaned_detail_rows() {
    let (service, store) = service();
    store.fail_appends_to(TableId::HatcherySummary);

    let err = service
        .submit_hatchery(hatchery_submission("L-4"))
        .expect_err("summary append should fail");
    assert!(matches!(err, StageServiceError::Store(_)));

    // Detail-first ordering: the failure strands detail rows, never a
    // summary with no supporting detail.
    assert_eq!(store.rows(TableId::HatcheryDetail).len(), 10);
    assert!(store.rows(TableId::HatcherySummary).is_empty());
}

#[test]
fn duplicate_submissions_append_without_deduplication() {
    let (service, store) = service();

    service
        .submit_transport(transport_submission("L-5"))
        .expect("first transport succeeds");
    service
        .submit_transport(transport_submission("L-5"))
        .expect("second transport succeeds");

    assert_eq!(store.rows(TableId::Transport).len(), 2);
}

#[test]
fn egg_reception_derives_mean_and_cv_from_the_weight_sample() {
    let (service, store) = service();

    let outcome = service
        .submit_egg_reception(egg_submission("L-6"))
        .expect("submission succeeds");

    assert!((outcome.mean_weight_g.expect("derived") - 64.0).abs() < 1e-9);
    assert!(outcome.cv_weight_pct.expect("derived") > 0.0);

    let rows = store.rows(TableId::EggReception);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "L-6");
}
