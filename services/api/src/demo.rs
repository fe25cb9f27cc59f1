use crate::infra::{open_sheet_runtime, parse_date};
use calidad_pollito::config::AppConfig;
use calidad_pollito::dashboard::DashboardAggregator;
use calidad_pollito::error::AppError;
use calidad_pollito::export::export_batch;
use calidad_pollito::scoring::ScoringConfig;
use calidad_pollito::stages::{
    ArrivalBehavior, BatchId, CheckKind, EggReceptionSubmission, FarmReceptionSubmission,
    GeneticLine, HatcherySubmission, SampleGrid, SampleRecord, SchemaSet, SevenDaySubmission,
    StageOutcome, StageService, TransportSubmission,
};
use calidad_pollito::store::{CsvSheetStore, TableCache};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Batch identifier recorded across every stage of the demo
    #[arg(long, default_value = "L-DEMO")]
    pub(crate) batch_id: String,
    /// Birth date for the demo batch (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = parse_date)]
    pub(crate) birth_date: Option<NaiveDate>,
    /// Override the configured data directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DashboardArgs {
    /// Batch to render; omit to list every known batch instead
    #[arg(long)]
    pub(crate) batch_id: Option<String>,
    /// Override the configured data directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Batch whose rows are exported
    #[arg(long)]
    pub(crate) batch_id: String,
    /// Write the dump to a file instead of stdout
    #[arg(long)]
    pub(crate) output: Option<PathBuf>,
    /// Override the configured data directory
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

fn open_runtime(
    data_dir: Option<PathBuf>,
) -> Result<(Arc<CsvSheetStore>, Arc<TableCache>), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(dir) = data_dir {
        config.storage.data_dir = dir;
    }
    open_sheet_runtime(&config.storage)
}

pub(crate) fn run_dashboard(args: DashboardArgs) -> Result<(), AppError> {
    let (store, cache) = open_runtime(args.data_dir)?;
    let dashboard = DashboardAggregator::new(store, cache, SchemaSet::latest());

    match args.batch_id {
        Some(batch_id) => {
            let view = dashboard.batch_dashboard(&batch_id)?;
            match serde_json::to_string_pretty(&view) {
                Ok(json) => println!("{json}"),
                Err(err) => println!("dashboard payload unavailable: {err}"),
            }
        }
        None => {
            let batches = dashboard.known_batches()?;
            if batches.is_empty() {
                println!("No batches on record");
            } else {
                println!("Known batches");
                for batch in batches {
                    println!("- {batch}");
                }
            }
        }
    }
    Ok(())
}

pub(crate) fn run_export(args: ExportArgs) -> Result<(), AppError> {
    let (store, _cache) = open_runtime(args.data_dir)?;
    let dump = export_batch(store.as_ref(), &SchemaSet::latest(), &args.batch_id)?;

    match args.output {
        Some(path) => {
            std::fs::write(&path, dump)?;
            println!("Export written to {}", path.display());
        }
        None => print!("{dump}"),
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        batch_id,
        birth_date,
        data_dir,
    } = args;

    let birth_date = birth_date.unwrap_or_else(|| Local::now().date_naive());
    let (store, cache) = open_runtime(data_dir)?;
    let scoring = ScoringConfig::default();
    let sample_size = scoring.sample_size;
    let service = StageService::new(store.clone(), cache.clone(), scoring, SchemaSet::latest());
    let dashboard = DashboardAggregator::new(store, cache, SchemaSet::latest());

    println!("Chick quality demo for batch {batch_id}");

    let outcome = service.submit_egg_reception(demo_egg_reception(&batch_id, birth_date))?;
    render_outcome(&outcome);

    let outcome =
        service.submit_hatchery(demo_hatchery(&batch_id, birth_date, sample_size))?;
    render_outcome(&outcome);

    let outcome = service.submit_transport(demo_transport(&batch_id, birth_date))?;
    render_outcome(&outcome);

    let outcome =
        service.submit_farm_reception(demo_farm_reception(&batch_id, birth_date, sample_size))?;
    render_outcome(&outcome);

    let outcome = service.submit_seven_day(demo_seven_day(&batch_id, birth_date, sample_size))?;
    render_outcome(&outcome);

    println!("\nCross-stage dashboard");
    let view = dashboard.batch_dashboard(&batch_id)?;
    match serde_json::to_string_pretty(&view) {
        Ok(json) => println!("{json}"),
        Err(err) => println!("dashboard payload unavailable: {err}"),
    }

    Ok(())
}

fn render_outcome(outcome: &StageOutcome) {
    println!(
        "- {}: {} row(s) written",
        outcome.stage.label(),
        outcome.rows_written
    );
    if let Some(score) = outcome.composite_score {
        println!("  composite score {score:.2}");
    }
    if let Some(uniformity) = outcome.uniformity_pct {
        println!("  uniformity {uniformity:.1}%");
    }
    if let Some(mean) = outcome.mean_weight_g {
        println!("  mean weight {mean:.2} g");
    }
    if let Some(gain) = outcome.daily_gain_g {
        println!("  daily gain {gain:.2} g/day");
    }
    if let Some(mortality) = outcome.mortality_pct {
        println!("  mortality {mortality:.2}%");
    }
    for warning in &outcome.warnings {
        println!("  warning: {warning}");
    }
}

/// Sample grid with every check passed and a small weight spread so the
/// uniformity and CV figures land in realistic ranges.
fn demo_samples(count: usize, base_weight_g: f64) -> Vec<SampleRecord> {
    let mut grid = SampleGrid::seeded(count);
    for (index, record) in grid.records_mut().iter_mut().enumerate() {
        record.weight_g = base_weight_g + (index % 5) as f64 * 0.5;
        record.cloacal_temp_c = Some(40.0 + (index % 3) as f64 * 0.2);
        for kind in CheckKind::ordered() {
            record.checks.insert(kind, true);
        }
    }
    grid.snapshot()
}

fn demo_egg_reception(batch_id: &str, date: NaiveDate) -> EggReceptionSubmission {
    EggReceptionSubmission {
        batch_id: BatchId(batch_id.to_string()),
        origin_farm: "Reproductora San Marcos".to_string(),
        breeder_age_weeks: 42,
        reception_date: date - chrono::Duration::days(21),
        truck_temp_c: 21.5,
        wait_minutes: 35,
        pct_dirty: 2.5,
        pct_cracked: 1.0,
        egg_weights_g: vec![62.0, 64.5, 63.0, 65.5, 64.0, 63.5, 62.5, 66.0, 64.5, 63.0],
    }
}

fn demo_hatchery(batch_id: &str, date: NaiveDate, sample_size: usize) -> HatcherySubmission {
    HatcherySubmission {
        batch_id: BatchId(batch_id.to_string()),
        origin_farm: "Reproductora San Marcos".to_string(),
        genetic_line: GeneticLine::Cobb,
        birth_date: date,
        total_count: 12_000,
        evaluator: "M. Rodriguez".to_string(),
        truck_temp_c: 23.0,
        shell_temp_c: 18.5,
        room_temp_c: 24.0,
        egg_sweating: false,
        birds_per_box: 100,
        samples: demo_samples(sample_size, 40.0),
    }
}

fn demo_transport(batch_id: &str, date: NaiveDate) -> TransportSubmission {
    TransportSubmission {
        batch_id: BatchId(batch_id.to_string()),
        date,
        plate: "PLT-482".to_string(),
        driver: "J. Fuentes".to_string(),
        departure_time: NaiveTime::from_hms_opt(5, 30, 0).expect("valid time"),
        arrival_time: NaiveTime::from_hms_opt(8, 10, 0).expect("valid time"),
        temp_start_c: 24.0,
        humidity_start_pct: 62.0,
        temp_end_c: 26.5,
        humidity_end_pct: 66.0,
        arrival_behavior: ArrivalBehavior::Normal,
        mortality_count: 4,
    }
}

fn demo_farm_reception(
    batch_id: &str,
    date: NaiveDate,
    sample_size: usize,
) -> FarmReceptionSubmission {
    FarmReceptionSubmission {
        batch_id: BatchId(batch_id.to_string()),
        reception_date: date,
        evaluator: "C. Ibarra".to_string(),
        ambient_temp_c: 30.5,
        relative_humidity_pct: 58.0,
        litter_temp_c: 31.0,
        full_crop_pct: 92.0,
        samples: demo_samples(sample_size, 38.5),
    }
}

fn demo_seven_day(batch_id: &str, date: NaiveDate, sample_size: usize) -> SevenDaySubmission {
    let weights_g = (0..sample_size)
        .map(|index| 168.0 + (index % 7) as f64 * 2.0)
        .collect();
    SevenDaySubmission {
        batch_id: BatchId(batch_id.to_string()),
        date: date + chrono::Duration::days(7),
        weights_g,
        mortality_count: 180,
    }
}
