//! Composite-score engine for sampled quality evaluations.
//!
//! Pure reduction of a sample snapshot plus a [`ScoringConfig`] rubric into a
//! composite score, a uniformity percentage, and dispersion statistics. The
//! engine never observes live grid mutation: callers hand it an immutable
//! snapshot at submission time.

mod config;
pub mod stats;

pub use config::{ScoringConfig, UniformityMethod};

use crate::stages::domain::SampleRecord;
use serde::Serialize;

/// Degenerate-input conditions the engine reports instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreWarning {
    EmptySample,
    NonPositiveWeights,
}

impl ScoreWarning {
    pub const fn label(self) -> &'static str {
        match self {
            ScoreWarning::EmptySample => "empty sample",
            ScoreWarning::NonPositiveWeights => "sample weights are not positive",
        }
    }
}

/// Everything the engine derives from one sample snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreOutcome {
    pub composite_score: f64,
    pub uniformity_pct: f64,
    pub cv_weight_pct: f64,
    pub mean_weight_g: f64,
    pub mean_cloacal_temp_c: Option<f64>,
    pub warnings: Vec<ScoreWarning>,
}

impl ScoreOutcome {
    fn degenerate(warning: ScoreWarning) -> Self {
        Self {
            composite_score: 0.0,
            uniformity_pct: 0.0,
            cv_weight_pct: 0.0,
            mean_weight_g: 0.0,
            mean_cloacal_temp_c: None,
            warnings: vec![warning],
        }
    }
}

/// Reduce a sample snapshot into a [`ScoreOutcome`].
///
/// Each check weight is divided by the sample size so the achievable total
/// is independent of N. The uniformity bonus is a step function: a flat
/// `uniformity_bonus_points` once the threshold is met, never scaled by N.
pub fn score_samples(samples: &[SampleRecord], config: &ScoringConfig) -> ScoreOutcome {
    if samples.is_empty() {
        return ScoreOutcome::degenerate(ScoreWarning::EmptySample);
    }

    let n = samples.len() as f64;
    let weights: Vec<f64> = samples.iter().map(|s| s.weight_g).collect();
    let mean_weight = stats::mean(&weights);

    let mut warnings = Vec::new();
    if mean_weight <= 0.0 {
        warnings.push(ScoreWarning::NonPositiveWeights);
    }

    let mut composite = 0.0;
    for sample in samples {
        for (kind, points) in &config.check_weights {
            if sample.passed(*kind) {
                composite += points / n;
            }
        }
        if sample.weight_g >= config.min_qualifying_weight_g {
            composite += config.weight_bonus_points / n;
        }
    }

    let uniformity_pct = uniformity(&weights, mean_weight, config);
    if uniformity_pct >= config.uniformity_bonus_threshold_pct {
        composite += config.uniformity_bonus_points;
    }

    if config.clamp_to_scale {
        composite = composite.min(100.0);
    }

    let cloacal: Vec<f64> = samples.iter().filter_map(|s| s.cloacal_temp_c).collect();
    let mean_cloacal_temp_c = if cloacal.is_empty() {
        None
    } else {
        Some(stats::mean(&cloacal))
    };

    ScoreOutcome {
        composite_score: composite,
        uniformity_pct,
        cv_weight_pct: stats::coefficient_of_variation(&weights),
        mean_weight_g: mean_weight,
        mean_cloacal_temp_c,
        warnings,
    }
}

fn uniformity(weights: &[f64], mean_weight: f64, config: &ScoringConfig) -> f64 {
    if mean_weight <= 0.0 {
        return 0.0;
    }

    match config.uniformity {
        UniformityMethod::WithinBandOfMean => {
            let lower = mean_weight * 0.9;
            let upper = mean_weight * 1.1;
            let in_range = weights
                .iter()
                .filter(|w| **w >= lower && **w <= upper)
                .count();
            100.0 * in_range as f64 / weights.len() as f64
        }
        UniformityMethod::OneMinusCv => {
            (100.0 - stats::coefficient_of_variation(weights)).max(0.0)
        }
    }
}
