//! tf-core - Core library for Tierflow
//!
//! This crate provides the shared types used by every pipeline stage:
//! parameters, the tiered filesystem layout, the CSV table model,
//! timestamp parsing, checksums, the provenance manifest, the optional
//! column contract, and simulation run state.

pub mod checksum;
pub mod config;
pub mod contract;
pub mod error;
pub mod layout;
pub mod manifest;
pub mod project;
pub mod run_state;
pub mod table;
pub mod timestamp;

pub use checksum::file_checksum;
pub use config::{Params, ValueRange};
pub use contract::{ColumnContract, ColumnTest, TestType};
pub use error::{CoreError, CoreResult};
pub use layout::TierLayout;
pub use manifest::{Manifest, ManifestEntry};
pub use project::Project;
pub use run_state::{RunStatus, SimulationState};
pub use table::{is_null, parse_number, Table};
pub use timestamp::{format_timestamp, parse_timestamp};
