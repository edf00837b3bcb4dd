//! External content-versioning and revision-control collaborators
//!
//! Both collaborators are optional. Every call made through them is
//! best-effort: the pipeline always has a local fallback (a SHA-256 side-car
//! for checksums, an empty commit id for revisions), so correctness never
//! depends on `dvc` or `git` being installed.

use crate::error::{PipelineError, PipelineResult};
use serde::{Deserialize, Serialize};
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tf_core::{file_checksum, CoreError, TierLayout};

/// Extra project files staged with every tier snapshot, when present
const SNAPSHOT_EXTRAS: [&str; 3] = ["dvc.lock", "dvc.yaml", ".gitignore"];

/// Tracks file or directory contents and leaves a `<path>.dvc` record
pub trait ContentVersioner {
    /// Tool name used in log messages
    fn name(&self) -> &str;

    /// Start (or refresh) tracking of `path`
    fn track(&self, path: &Path) -> PipelineResult<()>;
}

/// Records and reports repository revisions
pub trait RevisionControl {
    fn name(&self) -> &str;

    /// Current revision id, if one can be determined
    fn head(&self) -> Option<String>;

    /// Stage `paths` and commit them with `message`
    fn commit(&self, paths: &[PathBuf], message: &str) -> PipelineResult<()>;
}

/// Run an external tool in `cwd`, returning its trimmed stdout
fn run_tool<I, S>(program: &str, args: I, cwd: &Path) -> PipelineResult<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let output = Command::new(program)
        .args(args)
        .current_dir(cwd)
        .output()
        .map_err(|e| PipelineError::ToolUnavailable {
            tool: program.to_string(),
            message: e.to_string(),
        })?;

    if !output.status.success() {
        return Err(PipelineError::ToolFailed {
            tool: program.to_string(),
            message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// `dvc add` based content versioning
#[derive(Debug, Clone)]
pub struct DvcVersioner {
    project_root: PathBuf,
}

impl DvcVersioner {
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
        }
    }
}

impl ContentVersioner for DvcVersioner {
    fn name(&self) -> &str {
        "dvc"
    }

    fn track(&self, path: &Path) -> PipelineResult<()> {
        run_tool("dvc", [OsStr::new("add"), path.as_os_str()], &self.project_root)?;
        Ok(())
    }
}

/// Versioner for environments without a versioning tool
///
/// Tracking always fails, so checksums come from the local fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineVersioner;

impl ContentVersioner for OfflineVersioner {
    fn name(&self) -> &str {
        "offline"
    }

    fn track(&self, _path: &Path) -> PipelineResult<()> {
        Err(PipelineError::ToolUnavailable {
            tool: self.name().to_string(),
            message: "no content versioning tool configured".to_string(),
        })
    }
}

/// Git-backed revision control
#[derive(Debug, Clone)]
pub struct GitRevisionControl {
    repo_root: PathBuf,
}

impl GitRevisionControl {
    pub fn new(repo_root: impl Into<PathBuf>) -> Self {
        Self {
            repo_root: repo_root.into(),
        }
    }
}

impl RevisionControl for GitRevisionControl {
    fn name(&self) -> &str {
        "git"
    }

    fn head(&self) -> Option<String> {
        match run_tool("git", ["rev-parse", "HEAD"], &self.repo_root) {
            Ok(sha) if !sha.is_empty() => Some(sha),
            Ok(_) => None,
            Err(e) => {
                log::debug!("No git revision available: {}", e);
                None
            }
        }
    }

    fn commit(&self, paths: &[PathBuf], message: &str) -> PipelineResult<()> {
        let relative: Vec<&Path> = paths
            .iter()
            .map(|p| p.strip_prefix(&self.repo_root).unwrap_or(p.as_path()))
            .collect();
        let mut add_args: Vec<&OsStr> = vec![OsStr::new("add")];
        add_args.extend(relative.iter().map(|p| p.as_os_str()));
        run_tool("git", add_args, &self.repo_root)?;
        run_tool("git", ["commit", "-m", message], &self.repo_root)?;
        Ok(())
    }
}

/// Revision control for environments without one
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRevisionControl;

impl RevisionControl for NoRevisionControl {
    fn name(&self) -> &str {
        "none"
    }

    fn head(&self) -> Option<String> {
        None
    }

    fn commit(&self, _paths: &[PathBuf], _message: &str) -> PipelineResult<()> {
        Err(PipelineError::ToolUnavailable {
            tool: self.name().to_string(),
            message: "no revision control configured".to_string(),
        })
    }
}

/// A `.dvc` record: the tracked outputs and their checksums
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidecarRecord {
    #[serde(default)]
    pub outs: Vec<SidecarOut>,
}

/// One output entry of a `.dvc` record
///
/// Only the checksum-bearing keys are read; other keys written by the
/// versioning tool are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SidecarOut {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub md5: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sha256: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl SidecarOut {
    /// First checksum field present, in md5, etag, checksum, sha256 order
    pub fn checksum_value(&self) -> Option<&str> {
        [&self.md5, &self.etag, &self.checksum, &self.sha256]
            .into_iter()
            .find_map(|v| v.as_deref().filter(|s| !s.is_empty()))
    }
}

/// Path of the `.dvc` record for `path`
pub fn sidecar_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".dvc");
    PathBuf::from(name)
}

/// Read the checksum of the first output in a `.dvc` record
pub fn read_sidecar_checksum(sidecar: &Path) -> Option<String> {
    let content = fs::read_to_string(sidecar).ok()?;
    match serde_yaml::from_str::<SidecarRecord>(&content) {
        Ok(record) => record
            .outs
            .first()
            .and_then(SidecarOut::checksum_value)
            .map(String::from),
        Err(e) => {
            log::warn!("Unreadable record {}: {}", sidecar.display(), e);
            None
        }
    }
}

/// Hash `path` locally and persist a `.dvc` side-car with the result
pub fn write_sidecar(path: &Path) -> PipelineResult<String> {
    let checksum = file_checksum(path)?;
    let record = SidecarRecord {
        outs: vec![SidecarOut {
            path: path.file_name().map(|n| n.to_string_lossy().into_owned()),
            sha256: Some(checksum.clone()),
            ..Default::default()
        }],
    };
    let sidecar = sidecar_path(path);
    let yaml = serde_yaml::to_string(&record).map_err(CoreError::from)?;
    fs::write(&sidecar, yaml).map_err(|e| CoreError::io(&sidecar, e))?;
    Ok(checksum)
}

/// Content checksum for a file, delegating to the versioner when it can
///
/// When the versioner tracks the file, the checksum is read from the record
/// it produced. Otherwise the file is hashed locally and a side-car with
/// the same shape is written. An empty string means no checksum could be
/// obtained at all.
pub fn record_checksum(versioner: &dyn ContentVersioner, path: &Path) -> String {
    match versioner.track(path) {
        Ok(()) => {
            if let Some(checksum) = read_sidecar_checksum(&sidecar_path(path)) {
                return checksum;
            }
            log::warn!(
                "{} tracked {} but left no readable checksum; hashing locally",
                versioner.name(),
                path.display()
            );
            return file_checksum(path).unwrap_or_default();
        }
        Err(e) => log::warn!(
            "{} could not track {} ({}); writing fallback record",
            versioner.name(),
            path.display(),
            e
        ),
    }

    match write_sidecar(path) {
        Ok(checksum) => checksum,
        Err(e) => {
            log::warn!("Fallback checksum for {} failed: {}", path.display(), e);
            String::new()
        }
    }
}

/// Commit message for the snapshot after a batch
pub fn snapshot_message(batch_stem: &str) -> String {
    format!("Batch {}: update Bronze/Silver/Gold", batch_stem)
}

/// Version the bronze, silver and gold tiers and commit their records
///
/// Returns `Ok(false)` when there was nothing to commit. Any tool failure
/// is returned as an error for the caller to report; nothing is rolled back.
pub fn snapshot_tiers(
    project_root: &Path,
    layout: &TierLayout,
    versioner: &dyn ContentVersioner,
    revisions: &dyn RevisionControl,
    batch_stem: &str,
) -> PipelineResult<bool> {
    let tiers = [layout.bronze_dir(), layout.silver_dir(), layout.gold_dir()];
    for tier in &tiers {
        versioner.track(tier)?;
    }

    let mut to_add: Vec<PathBuf> = tiers
        .iter()
        .map(|t| sidecar_path(t))
        .filter(|p| p.exists())
        .collect();
    to_add.extend(
        SNAPSHOT_EXTRAS
            .iter()
            .map(|name| project_root.join(name))
            .filter(|p| p.exists()),
    );

    if to_add.is_empty() {
        return Ok(false);
    }
    revisions.commit(&to_add, &snapshot_message(batch_stem))?;
    Ok(true)
}

#[cfg(test)]
#[path = "versioning_test.rs"]
mod tests;
