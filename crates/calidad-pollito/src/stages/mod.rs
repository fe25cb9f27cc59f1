//! Lifecycle-stage capture: domain types, persisted table schemas, stage
//! record builders, and the submission service.

pub mod domain;
pub(crate) mod records;
pub mod router;
pub mod schema;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    ArrivalBehavior, BatchId, CheckKind, EggReceptionSubmission, FarmReceptionSubmission,
    GeneticLine, HatcherySubmission, SampleGrid, SampleRecord, SevenDaySubmission, Stage,
    TransportSubmission,
};
pub use router::stage_router;
pub use schema::{SchemaSet, TableId, TableSchema};
pub use service::{StageOutcome, StageService, StageServiceError};
