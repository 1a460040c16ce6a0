use crate::error::GitletError;
use crate::utils;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const BLOBS_DIR: &str = "blobs";
pub const COMMITS_DIR: &str = "commits";
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// The part of a commit that is hashed to derive its id. Field order is fixed
/// so that `serde_json::to_string` is a canonical encoding across runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct CommitContent {
    message: String,
    timestamp: i64,
    parent: Option<String>,
    second_parent: Option<String>,
    files: BTreeMap<String, String>,
}

/// An immutable snapshot of the tracked file set plus its lineage. `id` is a pure
/// function of the other fields (§3 Invariant 1) and is recomputed, never stored
/// redundantly in the persisted encoding — it is the filename under `commits/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub message: String,
    pub timestamp: i64,
    pub parent: Option<String>,
    pub second_parent: Option<String>,
    pub files: BTreeMap<String, String>,
}

impl Commit {
    pub fn initial() -> Self {
        Self {
            message: INITIAL_COMMIT_MESSAGE.to_string(),
            timestamp: 0,
            parent: None,
            second_parent: None,
            files: BTreeMap::new(),
        }
    }

    pub fn new(
        message: String,
        timestamp: i64,
        parent: Option<String>,
        second_parent: Option<String>,
        files: BTreeMap<String, String>,
    ) -> Self {
        Self {
            message,
            timestamp,
            parent,
            second_parent,
            files,
        }
    }

    fn content(&self) -> CommitContent {
        CommitContent {
            message: self.message.clone(),
            timestamp: self.timestamp,
            parent: self.parent.clone(),
            second_parent: self.second_parent.clone(),
            files: self.files.clone(),
        }
    }

    /// Deterministic hex SHA-1 derived from the commit's content, per §3 Invariant 1.
    pub fn id(&self) -> Result<String, GitletError> {
        let encoded = serde_json::to_string(&self.content())?;
        Ok(utils::sha1_bytes(encoded.as_bytes()))
    }

    pub fn is_merge(&self) -> bool {
        self.second_parent.is_some()
    }

    /// `EEE MMM d HH:mm:ss yyyy Z` formatted timestamp, used by `log`/`global-log`.
    pub fn formatted_date(&self) -> String {
        let dt: DateTime<Utc> = DateTime::from_timestamp(self.timestamp, 0).unwrap_or_else(|| {
            DateTime::from_timestamp(0, 0).expect("epoch origin is always representable")
        });
        dt.format("%a %b %-d %H:%M:%S %Y +0000").to_string()
    }
}

/// Content-addressed persistence for blobs and commits, keyed by hex SHA-1, plus
/// a well-known-name slot for the staging area (see `staging.rs`).
pub struct ObjectStore {
    blobs_path: PathBuf,
    commits_path: PathBuf,
}

impl ObjectStore {
    pub fn new(metadata_dir: &Path) -> Self {
        Self {
            blobs_path: metadata_dir.join(BLOBS_DIR),
            commits_path: metadata_dir.join(COMMITS_DIR),
        }
    }

    pub fn init(metadata_dir: &Path) -> Result<(), GitletError> {
        fs::create_dir_all(metadata_dir.join(BLOBS_DIR))?;
        fs::create_dir_all(metadata_dir.join(COMMITS_DIR))?;
        Ok(())
    }

    /// idempotent: writes the bytes under their hash only if not already present
    pub fn put_blob(&self, bytes: &[u8]) -> Result<String, GitletError> {
        let id = utils::sha1_bytes(bytes);
        let path = self.blobs_path.join(&id);
        if !path.exists() {
            utils::write_bytes(&path, bytes)?;
        }
        Ok(id)
    }

    pub fn get_blob(&self, blob_id: &str) -> Result<Vec<u8>, GitletError> {
        let path = self.blobs_path.join(blob_id);
        if !path.exists() {
            return Err(GitletError::ObjectNotFound(blob_id.to_string()));
        }
        utils::read_bytes(&path)
    }

    pub fn put_commit(&self, commit: &Commit) -> Result<String, GitletError> {
        let id = commit.id()?;
        let path = self.commits_path.join(&id);
        if !path.exists() {
            let encoded = serde_json::to_vec(commit)?;
            utils::write_bytes(&path, &encoded)?;
        }
        Ok(id)
    }

    pub fn get_commit(&self, commit_id: &str) -> Result<Commit, GitletError> {
        let path = self.commits_path.join(commit_id);
        if !path.exists() {
            return Err(GitletError::ObjectNotFound(commit_id.to_string()));
        }
        let bytes = utils::read_bytes(&path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Returns the unique commit id sharing `prefix` as a leading substring, in
    /// directory-enumeration order, or `None` if nothing matches (§4.1).
    pub fn resolve_prefix(&self, prefix: &str) -> Result<Option<String>, GitletError> {
        if prefix.len() == 40 && self.commits_path.join(prefix).exists() {
            return Ok(Some(prefix.to_string()));
        }
        for id in self.list_commit_ids()? {
            if id.starts_with(prefix) {
                return Ok(Some(id));
            }
        }
        Ok(None)
    }

    pub fn list_commit_ids(&self) -> Result<Vec<String>, GitletError> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.commits_path)? {
            let entry = entry?;
            if let Some(name) = entry.file_name().to_str() {
                ids.push(name.to_string());
            }
        }
        Ok(ids)
    }
}
