use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};

use crate::scoring::ScoringConfig;
use crate::stages::domain::{
    ArrivalBehavior, BatchId, CheckKind, EggReceptionSubmission, FarmReceptionSubmission,
    GeneticLine, HatcherySubmission, SampleRecord, SevenDaySubmission, TransportSubmission,
};
use crate::stages::schema::SchemaSet;
use crate::stages::service::StageService;
use crate::store::memory::InMemorySheetStore;
use crate::store::TableCache;

/// Test rubric: first-revision weight table over a 10-unit sample, left
/// unclamped so score assertions can see the stacked bonuses.
pub(super) fn test_config() -> ScoringConfig {
    let mut config = ScoringConfig::initial();
    config.clamp_to_scale = false;
    config
}

pub(super) fn service() -> (StageService<InMemorySheetStore>, InMemorySheetStore) {
    let store = InMemorySheetStore::default();
    let cache = Arc::new(TableCache::new(Duration::from_secs(600)));
    let service = StageService::new(
        Arc::new(store.clone()),
        cache,
        test_config(),
        SchemaSet::latest(),
    );
    (service, store)
}

pub(super) fn all_checks(pass: bool) -> BTreeMap<CheckKind, bool> {
    CheckKind::ordered()
        .into_iter()
        .map(|kind| (kind, pass))
        .collect()
}

pub(super) fn passing_samples(count: u32, weight_g: f64) -> Vec<SampleRecord> {
    (1..=count)
        .map(|unit_number| SampleRecord {
            unit_number,
            checks: all_checks(true),
            weight_g,
            cloacal_temp_c: Some(40.0),
        })
        .collect()
}

pub(super) fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 3).expect("valid date")
}

pub(super) fn egg_submission(batch: &str) -> EggReceptionSubmission {
    EggReceptionSubmission {
        batch_id: BatchId(batch.to_string()),
        origin_farm: "Reproductora Norte".to_string(),
        breeder_age_weeks: 42,
        reception_date: date(),
        truck_temp_c: 21.0,
        wait_minutes: 45,
        pct_dirty: 2.5,
        pct_cracked: 1.0,
        egg_weights_g: vec![62.0, 64.0, 66.0, 63.0, 65.0],
    }
}

pub(super) fn hatchery_submission(batch: &str) -> HatcherySubmission {
    HatcherySubmission {
        batch_id: BatchId(batch.to_string()),
        origin_farm: "Reproductora Norte".to_string(),
        genetic_line: GeneticLine::Cobb,
        birth_date: date(),
        total_count: 1000,
        evaluator: "M. Rodriguez".to_string(),
        truck_temp_c: 22.0,
        shell_temp_c: 18.0,
        room_temp_c: 21.0,
        egg_sweating: false,
        birds_per_box: 100,
        samples: passing_samples(10, 40.0),
    }
}

pub(super) fn transport_submission(batch: &str) -> TransportSubmission {
    TransportSubmission {
        batch_id: BatchId(batch.to_string()),
        date: date(),
        plate: "WXY-482".to_string(),
        driver: "J. Prieto".to_string(),
        departure_time: NaiveTime::from_hms_opt(6, 0, 0).expect("valid time"),
        arrival_time: NaiveTime::from_hms_opt(8, 30, 0).expect("valid time"),
        temp_start_c: 24.0,
        humidity_start_pct: 55.0,
        temp_end_c: 26.0,
        humidity_end_pct: 60.0,
        arrival_behavior: ArrivalBehavior::Normal,
        mortality_count: 4,
    }
}

pub(super) fn farm_submission(batch: &str) -> FarmReceptionSubmission {
    FarmReceptionSubmission {
        batch_id: BatchId(batch.to_string()),
        reception_date: date(),
        evaluator: "C. Ibarra".to_string(),
        ambient_temp_c: 30.0,
        relative_humidity_pct: 58.0,
        litter_temp_c: 31.0,
        full_crop_pct: 92.0,
        samples: passing_samples(10, 38.0),
    }
}

pub(super) fn seven_day_submission(batch: &str) -> SevenDaySubmission {
    SevenDaySubmission {
        batch_id: BatchId(batch.to_string()),
        date: date() + chrono::Duration::days(7),
        weights_g: vec![170.0; 10],
        mortality_count: 30,
    }
}
