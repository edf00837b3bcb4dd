//! Silver validation stage: partition bronze into accepted and rejected rows

use crate::error::PipelineResult;
use tf_core::{Project, Table};
use tf_quality::{RuleOutcome, SilverValidator};

/// Result of validating the bronze master
#[derive(Debug, Clone)]
pub struct ValidateOutcome {
    pub accepted: usize,
    pub rejected: usize,
    pub rule_rejections: Vec<RuleOutcome>,
}

/// Validate `bronze/bronze_all.csv` and write the silver partitions
///
/// The whole bronze snapshot is re-validated on every call, so results do
/// not depend on how many batches have arrived before. Returns `Ok(None)`
/// when there is no bronze master yet.
pub fn validate_bronze(project: &Project) -> PipelineResult<Option<ValidateOutcome>> {
    let layout = &project.layout;
    let master = layout.bronze_master();
    if !master.exists() {
        log::info!("No bronze master file found, nothing to validate");
        return Ok(None);
    }

    let bronze = Table::read_csv(&master)?;
    let validator = SilverValidator::standard(&project.params, project.contract.as_ref());
    let report = validator.validate(&bronze)?;

    let (accepted, rejected) = bronze.partition(&report.mask);
    accepted.write_csv(&layout.silver_all())?;
    rejected.write_csv(&layout.rejected_rows())?;

    log::info!(
        "Validation complete: {} valid, {} rejected",
        report.accepted_count(),
        report.rejected_count()
    );
    Ok(Some(ValidateOutcome {
        accepted: report.accepted_count(),
        rejected: report.rejected_count(),
        rule_rejections: report.rule_rejections,
    }))
}
