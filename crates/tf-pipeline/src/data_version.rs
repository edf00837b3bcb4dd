//! Identify the version of the gold dataset

use crate::error::{PipelineError, PipelineResult};
use crate::versioning::RevisionControl;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tf_core::table::count_data_lines;
use tf_core::{file_checksum, Project};

/// Lock file of the content-versioning tool, at the project root
pub const DVC_LOCK_FILE: &str = "dvc.lock";

/// Identity of the current gold dataset
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataVersion {
    /// Checksum from the lock file, or the SHA-256 of `gold.csv`
    pub data_version_id: String,
    /// Data rows in `gold.csv` (lines minus the header)
    pub row_count: usize,
    pub dataset_path: String,
    /// Revision of the repository, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
}

/// First output checksum recorded in a lock file
///
/// Stages are scanned in file order; within an output `md5` wins over
/// `sha256`. Unreadable lock files yield `None`.
pub fn lock_checksum(lock_path: &Path) -> Option<String> {
    let content = fs::read_to_string(lock_path).ok()?;
    let doc: serde_yaml::Value = match serde_yaml::from_str(&content) {
        Ok(doc) => doc,
        Err(e) => {
            log::warn!(
                "Failed to parse {}: {}; falling back to dataset hash",
                lock_path.display(),
                e
            );
            return None;
        }
    };

    doc.get("stages")?
        .as_mapping()?
        .values()
        .filter_map(|stage| stage.get("outs")?.as_sequence())
        .flatten()
        .find_map(|out| {
            ["md5", "sha256"]
                .iter()
                .find_map(|key| out.get(*key)?.as_str().map(String::from))
        })
}

/// Version of `gold/gold.csv` for `project`
pub fn data_version(
    project: &Project,
    revisions: &dyn RevisionControl,
) -> PipelineResult<DataVersion> {
    let gold = project.layout.gold();
    let from_lock = lock_checksum(&project.root.join(DVC_LOCK_FILE));

    if !gold.exists() {
        return Err(PipelineError::DatasetNotFound {
            path: gold.display().to_string(),
        });
    }
    let data_version_id = match from_lock {
        Some(id) => id,
        None => file_checksum(&gold)?,
    };

    Ok(DataVersion {
        data_version_id,
        row_count: count_data_lines(&gold)?,
        dataset_path: gold.display().to_string(),
        git_commit: revisions.head(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::versioning::NoRevisionControl;
    use tempfile::tempdir;

    fn project_with_gold(content: Option<&str>) -> (tempfile::TempDir, Project) {
        let dir = tempdir().unwrap();
        let project = Project::load(dir.path()).unwrap();
        if let Some(content) = content {
            fs::create_dir_all(project.layout.gold_dir()).unwrap();
            fs::write(project.layout.gold(), content).unwrap();
        }
        (dir, project)
    }

    #[test]
    fn test_hashes_gold_without_lock() {
        let (_dir, project) = project_with_gold(Some("id,target\n1,0\n2,1\n"));
        let version = data_version(&project, &NoRevisionControl).unwrap();
        assert_eq!(version.row_count, 2);
        assert_eq!(
            version.data_version_id,
            file_checksum(&project.layout.gold()).unwrap()
        );
        assert!(version.git_commit.is_none());
    }

    #[test]
    fn test_prefers_lock_checksum() {
        let (dir, project) = project_with_gold(Some("id\n1\n"));
        fs::write(
            dir.path().join(DVC_LOCK_FILE),
            "schema: '2.0'\nstages:\n  build:\n    cmd: build\n    outs:\n    - path: data/gold\n      md5: abc.dir\n",
        )
        .unwrap();
        let version = data_version(&project, &NoRevisionControl).unwrap();
        assert_eq!(version.data_version_id, "abc.dir");
    }

    #[test]
    fn test_lock_accepts_json_and_sha256() {
        let dir = tempdir().unwrap();
        let lock = dir.path().join(DVC_LOCK_FILE);
        fs::write(
            &lock,
            r#"{"stages": {"a": {"outs": []}, "b": {"outs": [{"path": "x", "sha256": "f00"}]}}}"#,
        )
        .unwrap();
        assert_eq!(lock_checksum(&lock), Some("f00".to_string()));
    }

    #[test]
    fn test_broken_lock_is_ignored() {
        let dir = tempdir().unwrap();
        let lock = dir.path().join(DVC_LOCK_FILE);
        fs::write(&lock, "stages: [unclosed").unwrap();
        assert_eq!(lock_checksum(&lock), None);
    }

    #[test]
    fn test_missing_gold_is_an_error() {
        let (_dir, project) = project_with_gold(None);
        let err = data_version(&project, &NoRevisionControl).unwrap_err();
        assert!(matches!(err, PipelineError::DatasetNotFound { .. }));
    }
}
