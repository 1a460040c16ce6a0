use crate::error::GitletError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const STAGING_AREA_FILE: &str = "staging_area";

/// The pending additions and removals to be realized by the next commit (§3, §4.3).
/// A path is in `added` XOR `removed` XOR neither (§3 Invariant 5) — every mutator
/// here maintains that by construction: staging a path for one side first unstages
/// it from the other.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagingArea {
    added: BTreeMap<String, String>,
    removed: BTreeMap<String, ()>,
}

impl StagingArea {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage_add(&mut self, path: String, blob_id: String) {
        self.removed.remove(&path);
        self.added.insert(path, blob_id);
    }

    pub fn stage_remove(&mut self, path: String) {
        self.added.remove(&path);
        self.removed.insert(path, ());
    }

    pub fn unstage_add(&mut self, path: &str) {
        self.added.remove(path);
    }

    pub fn unstage_remove(&mut self, path: &str) {
        self.removed.remove(path);
    }

    pub fn added(&self) -> &BTreeMap<String, String> {
        &self.added
    }

    pub fn removed(&self) -> &BTreeMap<String, ()> {
        &self.removed
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// copies of both mappings, per §4.3 `snapshot()`
    pub fn snapshot(&self) -> (BTreeMap<String, String>, BTreeMap<String, ()>) {
        (self.added.clone(), self.removed.clone())
    }

    pub fn clear(&mut self) {
        self.added.clear();
        self.removed.clear();
    }

    pub fn load(path: &Path) -> Result<Self, GitletError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let bytes = fs::read(path)?;
        if bytes.is_empty() {
            return Ok(Self::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn persist(&self, path: &Path) -> Result<(), GitletError> {
        let encoded = serde_json::to_vec(self)?;
        fs::write(path, encoded)?;
        Ok(())
    }

    pub fn file_path(metadata_dir: &Path) -> PathBuf {
        metadata_dir.join(STAGING_AREA_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_add_cancels_pending_removal() {
        let mut area = StagingArea::new();
        area.stage_remove("f.txt".to_string());
        assert!(area.removed().contains_key("f.txt"));
        area.stage_add("f.txt".to_string(), "hash".to_string());
        assert!(!area.removed().contains_key("f.txt"));
        assert_eq!(area.added().get("f.txt"), Some(&"hash".to_string()));
    }

    #[test]
    fn stage_remove_cancels_pending_addition() {
        let mut area = StagingArea::new();
        area.stage_add("f.txt".to_string(), "hash".to_string());
        area.stage_remove("f.txt".to_string());
        assert!(!area.added().contains_key("f.txt"));
        assert!(area.removed().contains_key("f.txt"));
    }

    #[test]
    fn persist_and_load_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("staging_area");

        let mut area = StagingArea::new();
        area.stage_add("a".to_string(), "h1".to_string());
        area.stage_remove("b".to_string());
        area.persist(&path).unwrap();

        let loaded = StagingArea::load(&path).unwrap();
        assert_eq!(area, loaded);
    }

    #[test]
    fn load_missing_file_is_empty() {
        let path = PathBuf::from("/nonexistent/gitlet_rs_staging_area_never_created");
        let area = StagingArea::load(&path).unwrap();
        assert!(area.is_empty());
    }
}
