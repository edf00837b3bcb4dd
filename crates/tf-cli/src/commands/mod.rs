//! CLI command implementations

pub(crate) mod build;
pub(crate) mod checksums;
pub(crate) mod clean;
pub(crate) mod common;
pub(crate) mod generate;
pub(crate) mod ingest;
pub(crate) mod run;
pub(crate) mod simulate;
pub(crate) mod transform;
pub(crate) mod validate;
pub(crate) mod version;
