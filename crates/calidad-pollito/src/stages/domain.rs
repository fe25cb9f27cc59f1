use std::collections::BTreeMap;
use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// User-supplied lot identifier shared across lifecycle stages.
///
/// Matching across stages is string comparison after trimming surrounding
/// whitespace; no further normalization is applied.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BatchId(pub String);

impl BatchId {
    pub fn trimmed(&self) -> &str {
        self.0.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.trimmed().is_empty()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.trimmed())
    }
}

/// The five lifecycle stages an evaluated batch moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    EggReception,
    Hatchery,
    Transport,
    FarmReception,
    SevenDay,
}

impl Stage {
    pub const fn label(self) -> &'static str {
        match self {
            Stage::EggReception => "egg_reception",
            Stage::Hatchery => "hatchery",
            Stage::Transport => "transport",
            Stage::FarmReception => "farm_reception",
            Stage::SevenDay => "seven_day",
        }
    }
}

/// The eight per-unit boolean health checks of the Método Rodriguez rubric.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    Vitality,
    Navel,
    Legs,
    Eyes,
    Beak,
    Abdomen,
    Down,
    Neck,
}

impl CheckKind {
    /// Persisted column name, kept in the field operators' Spanish.
    pub const fn column(self) -> &'static str {
        match self {
            CheckKind::Vitality => "vitalidad_ok",
            CheckKind::Navel => "ombligo_ok",
            CheckKind::Legs => "patas_ok",
            CheckKind::Eyes => "ojos_ok",
            CheckKind::Beak => "pico_ok",
            CheckKind::Abdomen => "abdomen_ok",
            CheckKind::Down => "plumon_ok",
            CheckKind::Neck => "cuello_ok",
        }
    }

    /// Canonical column order for detail rows.
    pub const fn ordered() -> [CheckKind; 8] {
        [
            CheckKind::Vitality,
            CheckKind::Navel,
            CheckKind::Legs,
            CheckKind::Eyes,
            CheckKind::Beak,
            CheckKind::Abdomen,
            CheckKind::Down,
            CheckKind::Neck,
        ]
    }
}

/// One evaluated unit (chick or egg) within a batch sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleRecord {
    pub unit_number: u32,
    pub checks: BTreeMap<CheckKind, bool>,
    pub weight_g: f64,
    pub cloacal_temp_c: Option<f64>,
}

impl SampleRecord {
    pub fn passed(&self, check: CheckKind) -> bool {
        self.checks.get(&check).copied().unwrap_or(false)
    }
}

/// Session-scoped sample-entry buffer. Seeded once with grid defaults,
/// edited in place by the operator, and handed to the scoring engine as an
/// immutable snapshot at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleGrid {
    records: Vec<SampleRecord>,
}

impl SampleGrid {
    /// Default grid: units 1..=n, every check unticked, 40.0 g, 40.0 °C.
    pub fn seeded(sample_size: usize) -> Self {
        let records = (1..=sample_size as u32)
            .map(|unit_number| SampleRecord {
                unit_number,
                checks: CheckKind::ordered()
                    .into_iter()
                    .map(|kind| (kind, false))
                    .collect(),
                weight_g: 40.0,
                cloacal_temp_c: Some(40.0),
            })
            .collect();
        Self { records }
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [SampleRecord] {
        &mut self.records
    }

    /// Owned copy for submission, decoupled from further grid edits.
    pub fn snapshot(&self) -> Vec<SampleRecord> {
        self.records.clone()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Genetic lines offered by the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneticLine {
    Cobb,
    Ross,
    Otra,
}

impl GeneticLine {
    pub const fn label(self) -> &'static str {
        match self {
            GeneticLine::Cobb => "Cobb",
            GeneticLine::Ross => "Ross",
            GeneticLine::Otra => "Otra",
        }
    }
}

/// Flock behavior observed when the truck is opened at the farm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArrivalBehavior {
    Normal,
    Agitado,
    Decaido,
}

impl ArrivalBehavior {
    /// Persisted text token.
    pub const fn label(self) -> &'static str {
        match self {
            ArrivalBehavior::Normal => "normal",
            ArrivalBehavior::Agitado => "agitado",
            ArrivalBehavior::Decaido => "decaido",
        }
    }
}

/// Egg-reception intake. Mean weight and CV are derived from the sampled
/// egg weights, not entered by hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EggReceptionSubmission {
    pub batch_id: BatchId,
    pub origin_farm: String,
    pub breeder_age_weeks: u32,
    pub reception_date: NaiveDate,
    pub truck_temp_c: f64,
    pub wait_minutes: u32,
    pub pct_dirty: f64,
    pub pct_cracked: f64,
    pub egg_weights_g: Vec<f64>,
}

/// Hatchery evaluation: lot environment plus the scored chick sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HatcherySubmission {
    pub batch_id: BatchId,
    pub origin_farm: String,
    pub genetic_line: GeneticLine,
    pub birth_date: NaiveDate,
    pub total_count: u32,
    pub evaluator: String,
    pub truck_temp_c: f64,
    pub shell_temp_c: f64,
    pub room_temp_c: f64,
    pub egg_sweating: bool,
    pub birds_per_box: u32,
    pub samples: Vec<SampleRecord>,
}

/// Transport leg between hatchery and farm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportSubmission {
    pub batch_id: BatchId,
    pub date: NaiveDate,
    pub plate: String,
    pub driver: String,
    pub departure_time: NaiveTime,
    pub arrival_time: NaiveTime,
    pub temp_start_c: f64,
    pub humidity_start_pct: f64,
    pub temp_end_c: f64,
    pub humidity_end_pct: f64,
    pub arrival_behavior: ArrivalBehavior,
    pub mortality_count: u32,
}

impl TransportSubmission {
    /// Trip duration in minutes, wrapping legs that cross midnight.
    pub fn duration_minutes(&self) -> i64 {
        let minutes = (self.arrival_time - self.departure_time).num_minutes();
        if minutes < 0 {
            minutes + 24 * 60
        } else {
            minutes
        }
    }
}

/// Farm-reception evaluation with its own scored chick sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FarmReceptionSubmission {
    pub batch_id: BatchId,
    pub reception_date: NaiveDate,
    pub evaluator: String,
    pub ambient_temp_c: f64,
    pub relative_humidity_pct: f64,
    pub litter_temp_c: f64,
    pub full_crop_pct: f64,
    pub samples: Vec<SampleRecord>,
}

/// Seven-day follow-up: per-unit weights plus cumulative mortality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SevenDaySubmission {
    pub batch_id: BatchId,
    pub date: NaiveDate,
    pub weights_g: Vec<f64>,
    pub mortality_count: u32,
}
