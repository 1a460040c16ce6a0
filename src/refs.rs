use crate::error::GitletError;
use crate::utils;
use std::fs;
use std::path::{Path, PathBuf};

pub const BRANCHES_DIR: &str = "branches";
pub const HEAD_FILE: &str = "head";
pub const MAIN_BRANCH: &str = "main";

/// Branch pointers (name -> commit id) and the HEAD symbolic reference
/// (the name of the currently checked-out branch, per §4.2).
pub struct RefStore {
    branches_path: PathBuf,
    head_file: PathBuf,
}

impl RefStore {
    pub fn new(metadata_dir: &Path) -> Self {
        Self {
            branches_path: metadata_dir.join(BRANCHES_DIR),
            head_file: metadata_dir.join(HEAD_FILE),
        }
    }

    pub fn init(metadata_dir: &Path, initial_commit_id: &str) -> Result<(), GitletError> {
        let branches_path = metadata_dir.join(BRANCHES_DIR);
        fs::create_dir_all(&branches_path)?;
        utils::write_bytes(&branches_path.join(MAIN_BRANCH), initial_commit_id.as_bytes())?;
        utils::write_bytes(&metadata_dir.join(HEAD_FILE), MAIN_BRANCH.as_bytes())?;
        Ok(())
    }

    pub fn head_branch(&self) -> Result<String, GitletError> {
        let bytes = utils::read_bytes(&self.head_file)?;
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }

    pub fn set_head_branch(&self, name: &str) -> Result<(), GitletError> {
        utils::write_bytes(&self.head_file, name.as_bytes())
    }

    pub fn branch_commit(&self, name: &str) -> Result<String, GitletError> {
        let path = self.branches_path.join(name);
        if !path.exists() {
            return Err(GitletError::NoSuchBranch);
        }
        let bytes = utils::read_bytes(&path)?;
        Ok(String::from_utf8_lossy(&bytes).trim().to_string())
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.branches_path.join(name).exists()
    }

    pub fn set_branch(&self, name: &str, commit_id: &str) -> Result<(), GitletError> {
        utils::write_bytes(&self.branches_path.join(name), commit_id.as_bytes())
    }

    pub fn create_branch(&self, name: &str, commit_id: &str) -> Result<(), GitletError> {
        if self.branch_exists(name) {
            return Err(GitletError::BranchExists);
        }
        self.set_branch(name, commit_id)
    }

    pub fn delete_branch(&self, name: &str) -> Result<(), GitletError> {
        if !self.branch_exists(name) {
            return Err(GitletError::NoSuchBranch);
        }
        utils::remove_file_if_exists(&self.branches_path.join(name))
    }

    pub fn list_branches(&self) -> Result<Vec<String>, GitletError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.branches_path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}
