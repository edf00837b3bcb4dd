//! tf-pipeline - Pipeline stages for Tierflow
//!
//! Each stage reads its input tier from disk, does its work in memory and
//! writes its output tier, so stages can run on their own or chained by the
//! [`IncrementalSimulator`]. A stage whose input does not exist yet returns
//! `Ok(None)` instead of failing.

pub mod data_version;
pub mod error;
pub mod gold;
pub mod ingest;
pub mod simulate;
pub mod splitter;
pub mod transform;
pub mod validate;
pub mod versioning;

pub use data_version::{data_version, DataVersion};
pub use error::{PipelineError, PipelineResult};
pub use gold::{build_gold, GoldSplit, GOLD_COLUMNS};
pub use ingest::{ingest, IngestOutcome, IngestedBatch};
pub use simulate::{
    BatchReport, IncrementalSimulator, NoopObserver, SimulationObserver, SimulationOptions,
    SimulationPhase, SimulationSummary, TierCounts,
};
pub use splitter::{generate, split_into_batches, synthesize, write_batches, GenerateOutcome};
pub use transform::transform_silver;
pub use validate::{validate_bronze, ValidateOutcome};
pub use versioning::{
    ContentVersioner, DvcVersioner, GitRevisionControl, NoRevisionControl, OfflineVersioner,
    RevisionControl,
};
