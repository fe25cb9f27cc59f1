use crate::stages::domain::CheckKind;
use serde::{Deserialize, Serialize};

/// How the uniformity percentage is derived from the sampled weights.
///
/// Field revisions of the method used two distinct formulas under the same
/// name; they are not equivalent and must never be conflated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniformityMethod {
    /// Share of samples whose weight falls within ±10% of the sample mean.
    WithinBandOfMean,
    /// `100 − CV%`, floored at 0.
    OneMinusCv,
}

/// Versioned scoring rubric. The weight table, sample size, and bonus dials
/// are configuration data, not code: historical revisions redistributed the
/// per-check weights and grew the sample, and persisted rows carry the
/// `schema_version` so old records stay interpretable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub schema_version: String,
    pub sample_size: usize,
    pub check_weights: Vec<(CheckKind, f64)>,
    pub weight_bonus_points: f64,
    pub min_qualifying_weight_g: f64,
    pub uniformity_bonus_points: f64,
    pub uniformity_bonus_threshold_pct: f64,
    pub uniformity: UniformityMethod,
    /// Whether the composite is clamped to the nominal 100-point scale.
    /// Later revisions let stacked bonuses exceed 100, so the default is
    /// unclamped.
    pub clamp_to_scale: bool,
}

impl ScoringConfig {
    /// First-revision rubric: 82.5-point check table over a 10-unit sample,
    /// composite clamped to 100.
    pub fn initial() -> Self {
        Self {
            schema_version: "mr-v1".to_string(),
            sample_size: 10,
            check_weights: vec![
                (CheckKind::Vitality, 15.0),
                (CheckKind::Navel, 15.0),
                (CheckKind::Legs, 4.75),
                (CheckKind::Eyes, 4.75),
                (CheckKind::Beak, 10.75),
                (CheckKind::Abdomen, 10.75),
                (CheckKind::Down, 10.75),
                (CheckKind::Neck, 10.75),
            ],
            weight_bonus_points: 9.5,
            min_qualifying_weight_g: 34.0,
            uniformity_bonus_points: 13.0,
            uniformity_bonus_threshold_pct: 82.0,
            uniformity: UniformityMethod::WithinBandOfMean,
            clamp_to_scale: true,
        }
    }

    /// Current rubric: redistributed 87-point check table over a 30-unit
    /// sample, unclamped.
    pub fn current() -> Self {
        Self {
            schema_version: "mr-v6".to_string(),
            sample_size: 30,
            check_weights: vec![
                (CheckKind::Vitality, 15.0),
                (CheckKind::Navel, 15.0),
                (CheckKind::Legs, 9.5),
                (CheckKind::Eyes, 9.5),
                (CheckKind::Beak, 9.5),
                (CheckKind::Abdomen, 9.5),
                (CheckKind::Down, 9.5),
                (CheckKind::Neck, 9.5),
            ],
            weight_bonus_points: 9.5,
            min_qualifying_weight_g: 34.0,
            uniformity_bonus_points: 13.0,
            uniformity_bonus_threshold_pct: 82.0,
            uniformity: UniformityMethod::WithinBandOfMean,
            clamp_to_scale: false,
        }
    }

    /// Sum of the check weight table, i.e. the pre-bonus ceiling.
    pub fn max_check_points(&self) -> f64 {
        self.check_weights.iter().map(|(_, w)| w).sum()
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self::current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_tables_sum_to_observed_baselines() {
        assert!((ScoringConfig::initial().max_check_points() - 82.5).abs() < 1e-9);
        assert!((ScoringConfig::current().max_check_points() - 87.0).abs() < 1e-9);
    }

    #[test]
    fn every_check_appears_exactly_once_per_preset() {
        for config in [ScoringConfig::initial(), ScoringConfig::current()] {
            let mut kinds: Vec<CheckKind> =
                config.check_weights.iter().map(|(kind, _)| *kind).collect();
            kinds.sort();
            kinds.dedup();
            assert_eq!(kinds.len(), 8, "{} table malformed", config.schema_version);
        }
    }
}
