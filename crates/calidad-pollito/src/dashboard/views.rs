use serde::Serialize;

/// Headline figures for the egg-reception stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EggReceptionSnapshot {
    pub mean_egg_weight_g: f64,
    pub cv_weight_pct: f64,
    pub pct_dirty: f64,
    pub pct_cracked: f64,
}

/// Headline figures from the hatchery summary row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HatcherySnapshot {
    pub composite_score: f64,
    pub uniformity_pct: f64,
    pub cv_weight_pct: f64,
    pub mean_weight_g: f64,
    pub mean_cloacal_temp_c: f64,
    pub total_count: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransportSnapshot {
    pub duration_minutes: f64,
    pub mortality_count: f64,
    pub arrival_behavior: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FarmReceptionSnapshot {
    pub composite_score: f64,
    pub cv_weight_pct: f64,
    pub mean_weight_g: f64,
    pub full_crop_pct: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SevenDaySnapshot {
    pub mean_weight_7d_g: f64,
    pub daily_gain_g: f64,
    pub growth_factor: f64,
    pub mortality_count: f64,
    pub mortality_pct: f64,
}

/// Cross-stage derived metrics. Every ratio is zero-guarded: missing or
/// zero-valued upstream stages render as 0 rather than failing.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CrossStageKpis {
    pub quality_drop_pct: f64,
    pub weight_shrinkage_pct: f64,
    pub mortality_pct_7d: f64,
    pub daily_gain_g: f64,
}

/// Everything the dashboard renders for one batch. Stages with no persisted
/// summary row are simply absent.
#[derive(Debug, Clone, Serialize)]
pub struct BatchDashboard {
    pub batch_id: String,
    pub egg_reception: Option<EggReceptionSnapshot>,
    pub hatchery: Option<HatcherySnapshot>,
    pub transport: Option<TransportSnapshot>,
    pub farm_reception: Option<FarmReceptionSnapshot>,
    pub seven_day: Option<SevenDaySnapshot>,
    pub kpis: CrossStageKpis,
}
