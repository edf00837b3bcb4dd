//! Project discovery: params, tier layout and optional contract

use crate::config::Params;
use crate::contract::ColumnContract;
use crate::error::{CoreError, CoreResult};
use crate::layout::TierLayout;
use std::path::{Path, PathBuf};

/// A loaded Tierflow project
///
/// This is the typed context handed to every stage; stages never look up
/// paths or parameters on their own.
#[derive(Debug, Clone)]
pub struct Project {
    /// Project root directory
    pub root: PathBuf,

    /// Parsed params.yaml (or defaults)
    pub params: Params,

    /// Tiered data layout under `params.data_dir`
    pub layout: TierLayout,

    /// Optional column contract
    pub contract: Option<ColumnContract>,
}

impl Project {
    /// Load a project from a directory, reading `params.yaml` if present
    pub fn load(root: &Path) -> CoreResult<Self> {
        Self::ensure_root(root)?;
        let params = Params::load_from_dir(root)?;
        Ok(Self::with_params(root, params))
    }

    /// Load a project with an explicit params file
    pub fn load_with_params_file(root: &Path, params_path: &Path) -> CoreResult<Self> {
        Self::ensure_root(root)?;
        let params = Params::load(params_path)?;
        Ok(Self::with_params(root, params))
    }

    /// Build a project from already-parsed params
    pub fn with_params(root: &Path, params: Params) -> Self {
        let layout = TierLayout::new(params.data_dir_absolute(root));
        let contract = ColumnContract::load_optional(&params.contract_path_absolute(root));
        Self {
            root: root.to_path_buf(),
            params,
            layout,
            contract,
        }
    }

    fn ensure_root(root: &Path) -> CoreResult<()> {
        if root.is_dir() {
            Ok(())
        } else {
            Err(CoreError::ProjectNotFound {
                path: root.display().to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_load_empty_project_uses_defaults() {
        let dir = tempdir().unwrap();
        let project = Project::load(dir.path()).unwrap();
        assert_eq!(project.params, Params::default());
        assert_eq!(project.layout.root(), dir.path().join("data"));
        assert!(project.contract.is_none());
    }

    #[test]
    fn test_load_reads_params_and_contract() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("params.yaml"), "data_dir: lake\n").unwrap();
        std::fs::write(
            dir.path().join("contract.yml"),
            "columns:\n  - name: id\n    tests: [unique]\n",
        )
        .unwrap();

        let project = Project::load(dir.path()).unwrap();
        assert_eq!(project.layout.root(), dir.path().join("lake"));
        assert_eq!(project.contract.unwrap().tests().len(), 1);
    }

    #[test]
    fn test_missing_root_errors() {
        let err = Project::load(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, CoreError::ProjectNotFound { .. }));
    }
}
