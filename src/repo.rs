use crate::error::GitletError;
use crate::objects::{Commit, ObjectStore};
use crate::refs::RefStore;
use crate::staging::StagingArea;
use crate::utils;
use chrono::Utc;
use log::{debug, info};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::env;
use std::fs;
use std::path::PathBuf;

pub const METADATA_DIR: &str = ".gitlet";

/// Facade tying the Object Store, Ref Store, and Staging Area together with the
/// working directory. One instance is constructed per command invocation (§5).
pub struct Repository {
    cwd: PathBuf,
    metadata_dir: PathBuf,
    objects: ObjectStore,
    refs: RefStore,
    staging: StagingArea,
}

impl Repository {
    pub fn new() -> Result<Self, GitletError> {
        let cwd = env::current_dir()?;
        let metadata_dir = cwd.join(METADATA_DIR);
        let objects = ObjectStore::new(&metadata_dir);
        let refs = RefStore::new(&metadata_dir);
        Ok(Self {
            cwd,
            metadata_dir,
            objects,
            refs,
            staging: StagingArea::new(),
        })
    }

    pub fn new_at(cwd: PathBuf) -> Result<Self, GitletError> {
        let metadata_dir = cwd.join(METADATA_DIR);
        let objects = ObjectStore::new(&metadata_dir);
        let refs = RefStore::new(&metadata_dir);
        Ok(Self {
            cwd,
            metadata_dir,
            objects,
            refs,
            staging: StagingArea::new(),
        })
    }

    pub fn exists(&self) -> bool {
        self.metadata_dir.exists()
    }

    pub fn metadata_dir_display(&self) -> String {
        self.metadata_dir.display().to_string()
    }

    /// Creates the metadata area and the initial commit (§3 Invariant 4).
    pub fn init(&mut self) -> Result<(), GitletError> {
        if self.exists() {
            return Err(GitletError::AlreadyInitialized);
        }
        fs::create_dir_all(&self.metadata_dir)?;
        ObjectStore::init(&self.metadata_dir)?;
        let initial = Commit::initial();
        let initial_id = self.objects.put_commit(&initial)?;
        RefStore::init(&self.metadata_dir, &initial_id)?;
        StagingArea::new().persist(&StagingArea::file_path(&self.metadata_dir))?;
        Ok(())
    }

    /// Opens an already-initialized repository, loading the staging area from disk.
    pub fn open() -> Result<Self, GitletError> {
        let mut repo = Self::new()?;
        repo.load()?;
        Ok(repo)
    }

    pub fn open_at(cwd: PathBuf) -> Result<Self, GitletError> {
        let mut repo = Self::new_at(cwd)?;
        repo.load()?;
        Ok(repo)
    }

    fn load(&mut self) -> Result<(), GitletError> {
        if !self.exists() {
            return Err(GitletError::NotInitialized);
        }
        self.staging = StagingArea::load(&StagingArea::file_path(&self.metadata_dir))?;
        Ok(())
    }

    fn persist_staging(&self) -> Result<(), GitletError> {
        self.staging
            .persist(&StagingArea::file_path(&self.metadata_dir))
    }

    fn head_commit_id(&self) -> Result<String, GitletError> {
        let branch = self.refs.head_branch()?;
        let id = self.refs.branch_commit(&branch)?;
        debug!("HEAD -> branch {} -> commit {}", branch, id);
        Ok(id)
    }

    fn head_commit(&self) -> Result<Commit, GitletError> {
        let id = self.head_commit_id()?;
        self.objects.get_commit(&id)
    }

    // ---- Staging (§4.3) ----------------------------------------------------

    pub fn add(&mut self, path: &str) -> Result<(), GitletError> {
        let abs = self.cwd.join(path);
        if !abs.exists() {
            return Err(GitletError::FileNotExist);
        }
        let head = self.head_commit()?;
        let bytes = utils::read_bytes(&abs)?;
        let current_hash = utils::sha1_bytes(&bytes);

        if head.files.get(path) == Some(&current_hash) {
            self.staging.unstage_add(path);
            self.staging.unstage_remove(path);
        } else {
            let blob_id = self.objects.put_blob(&bytes)?;
            self.staging.stage_add(path.to_string(), blob_id);
            self.staging.unstage_remove(path);
        }
        self.persist_staging()
    }

    pub fn remove(&mut self, path: &str) -> Result<(), GitletError> {
        let head = self.head_commit()?;
        let staged = self.staging.added().contains_key(path);
        let tracked = head.files.contains_key(path);
        if !staged && !tracked {
            return Err(GitletError::NoReasonToRemove);
        }
        if staged {
            self.staging.unstage_add(path);
        }
        if tracked {
            self.staging.stage_remove(path.to_string());
            utils::remove_file_if_exists(&self.cwd.join(path))?;
        }
        self.persist_staging()
    }

    // ---- Commit Engine (§4.4) ----------------------------------------------

    pub fn commit(&mut self, message: &str) -> Result<(), GitletError> {
        if message.trim().is_empty() {
            return Err(GitletError::EmptyCommitMessage);
        }
        if self.staging.is_empty() {
            return Err(GitletError::NothingToCommit);
        }
        let head_id = self.head_commit_id()?;
        let head = self.objects.get_commit(&head_id)?;

        let mut files = head.files.clone();
        for path in self.staging.removed().keys() {
            files.remove(path);
        }
        for (path, blob_id) in self.staging.added() {
            files.insert(path.clone(), blob_id.clone());
        }

        let commit = Commit::new(
            message.to_string(),
            Utc::now().timestamp(),
            Some(head_id),
            None,
            files,
        );
        let commit_id = self.objects.put_commit(&commit)?;
        let branch = self.refs.head_branch()?;
        self.refs.set_branch(&branch, &commit_id)?;
        self.staging.clear();
        self.persist_staging()
    }

    // ---- Working-Tree Reconciler (§4.5) ------------------------------------

    /// Fails if materializing `target` (writing its files, deleting `head`'s
    /// files that `target` drops) would clobber a file that is on disk but
    /// neither tracked by `head` nor staged for addition.
    fn check_untracked_safety(&self, target: &Commit, head: &Commit) -> Result<(), GitletError> {
        let working = utils::working_file_set(&self.cwd, &self.metadata_dir)?;
        let untracked: HashSet<&String> = working
            .iter()
            .filter(|p| !head.files.contains_key(*p) && !self.staging.added().contains_key(*p))
            .collect();

        for path in target.files.keys() {
            if untracked.contains(path) {
                return Err(GitletError::UntrackedFileInTheWay);
            }
        }
        for path in head.files.keys() {
            if !target.files.contains_key(path) && untracked.contains(path) {
                return Err(GitletError::UntrackedFileInTheWay);
            }
        }
        Ok(())
    }

    fn materialize(&mut self, target: &Commit, head: &Commit) -> Result<(), GitletError> {
        info!(
            "materializing working tree: {} files to write, {} tracked by old HEAD",
            target.files.len(),
            head.files.len()
        );
        for (path, blob_id) in &target.files {
            let bytes = self.objects.get_blob(blob_id)?;
            utils::write_bytes(&self.cwd.join(path), &bytes)?;
        }
        for path in head.files.keys() {
            if !target.files.contains_key(path) {
                utils::remove_file_if_exists(&self.cwd.join(path))?;
            }
        }
        self.staging.clear();
        self.persist_staging()
    }

    pub fn restore(&mut self, path: &str) -> Result<(), GitletError> {
        let head = self.head_commit()?;
        let blob_id = head
            .files
            .get(path)
            .ok_or(GitletError::FileNotInCommit)?;
        let bytes = self.objects.get_blob(blob_id)?;
        utils::write_bytes(&self.cwd.join(path), &bytes)
    }

    pub fn restore_from(&mut self, commit_prefix: &str, path: &str) -> Result<(), GitletError> {
        let commit_id = self
            .objects
            .resolve_prefix(commit_prefix)?
            .ok_or(GitletError::NoSuchCommit)?;
        let commit = self.objects.get_commit(&commit_id)?;
        let blob_id = commit
            .files
            .get(path)
            .ok_or(GitletError::FileNotInCommit)?;
        let bytes = self.objects.get_blob(blob_id)?;
        utils::write_bytes(&self.cwd.join(path), &bytes)
    }

    pub fn switch(&mut self, branch: &str) -> Result<(), GitletError> {
        if !self.refs.branch_exists(branch) {
            return Err(GitletError::NoSuchBranch);
        }
        let current_branch = self.refs.head_branch()?;
        if current_branch == branch {
            return Err(GitletError::AlreadyOnBranch);
        }
        let head = self.head_commit()?;
        let target_id = self.refs.branch_commit(branch)?;
        let target = self.objects.get_commit(&target_id)?;

        self.check_untracked_safety(&target, &head)?;
        self.materialize(&target, &head)?;
        self.refs.set_head_branch(branch)
    }

    pub fn reset(&mut self, commit_prefix: &str) -> Result<(), GitletError> {
        let target_id = self
            .objects
            .resolve_prefix(commit_prefix)?
            .ok_or(GitletError::NoSuchCommit)?;
        let target = self.objects.get_commit(&target_id)?;
        let head = self.head_commit()?;

        self.check_untracked_safety(&target, &head)?;
        self.materialize(&target, &head)?;

        let branch = self.refs.head_branch()?;
        self.refs.set_branch(&branch, &target_id)
    }

    // ---- Branches -----------------------------------------------------------

    pub fn branch(&mut self, name: &str) -> Result<(), GitletError> {
        let head_id = self.head_commit_id()?;
        self.refs.create_branch(name, &head_id)
    }

    pub fn rm_branch(&mut self, name: &str) -> Result<(), GitletError> {
        let current = self.refs.head_branch()?;
        if current == name {
            return Err(GitletError::CannotRemoveCurrentBranch);
        }
        self.refs.delete_branch(name)
    }

    // ---- History Queries (§4.6) ---------------------------------------------

    pub fn log(&self) -> Result<String, GitletError> {
        let mut entries = Vec::new();
        let mut current_id = Some(self.head_commit_id()?);
        while let Some(id) = current_id {
            let commit = self.objects.get_commit(&id)?;
            entries.push(Self::format_commit_entry(&id, &commit));
            current_id = commit.parent.clone();
        }
        Ok(entries.join("\n"))
    }

    pub fn global_log(&self) -> Result<String, GitletError> {
        let mut entries = Vec::new();
        for id in self.objects.list_commit_ids()? {
            let commit = self.objects.get_commit(&id)?;
            entries.push(Self::format_commit_entry(&id, &commit));
        }
        Ok(entries.join("\n"))
    }

    fn format_commit_entry(id: &str, commit: &Commit) -> String {
        let mut lines = vec!["===".to_string(), format!("commit {}", id)];
        if let Some(second_parent) = &commit.second_parent {
            let first_parent = commit.parent.clone().unwrap_or_default();
            lines.push(format!(
                "Merge: {} {}",
                &first_parent[..first_parent.len().min(7)],
                &second_parent[..second_parent.len().min(7)]
            ));
        }
        lines.push(format!("Date: {}", commit.formatted_date()));
        lines.push(commit.message.clone());
        lines.join("\n")
    }

    pub fn find(&self, message: &str) -> Result<String, GitletError> {
        let mut ids = Vec::new();
        for id in self.objects.list_commit_ids()? {
            let commit = self.objects.get_commit(&id)?;
            if commit.message == message {
                ids.push(id);
            }
        }
        if ids.is_empty() {
            return Err(GitletError::NoCommitWithMessage);
        }
        Ok(ids.join("\n"))
    }

    pub fn status(&self) -> Result<String, GitletError> {
        let head = self.head_commit()?;
        let current_branch = self.refs.head_branch()?;
        let branches = self.refs.list_branches()?;

        let mut branch_lines = vec!["=== Branches ===".to_string()];
        for b in &branches {
            if *b == current_branch {
                branch_lines.push(format!("*{}", b));
            } else {
                branch_lines.push(b.clone());
            }
        }

        let mut staged_lines = vec!["=== Staged Files ===".to_string()];
        staged_lines.extend(self.staging.added().keys().cloned());

        let mut removed_lines = vec!["=== Removed Files ===".to_string()];
        removed_lines.extend(self.staging.removed().keys().cloned());

        let working = utils::working_file_set(&self.cwd, &self.metadata_dir)?;

        let mut modifications = Vec::new();
        for (path, blob_id) in &head.files {
            if self.staging.added().contains_key(path) || self.staging.removed().contains_key(path)
            {
                continue;
            }
            if working.contains(path) {
                let current_hash = utils::sha1_file(&self.cwd.join(path))?;
                if &current_hash != blob_id {
                    modifications.push(format!("{} (modified)", path));
                }
            } else {
                modifications.push(format!("{} (deleted)", path));
            }
        }
        for (path, blob_id) in self.staging.added() {
            if working.contains(path) {
                let current_hash = utils::sha1_file(&self.cwd.join(path))?;
                if &current_hash != blob_id {
                    modifications.push(format!("{} (modified)", path));
                }
            } else {
                modifications.push(format!("{} (deleted)", path));
            }
        }
        modifications.sort();
        let mut mod_lines = vec!["=== Modifications Not Staged For Commit ===".to_string()];
        mod_lines.extend(modifications);

        let mut untracked: Vec<String> = working
            .iter()
            .filter(|p| !head.files.contains_key(*p) && !self.staging.added().contains_key(*p))
            .cloned()
            .collect();
        untracked.sort();
        let mut untracked_lines = vec!["=== Untracked Files ===".to_string()];
        untracked_lines.extend(untracked);

        Ok([
            branch_lines.join("\n"),
            staged_lines.join("\n"),
            removed_lines.join("\n"),
            mod_lines.join("\n"),
            untracked_lines.join("\n"),
        ]
        .join("\n\n"))
    }

    // ---- Merge Engine (§4.7) -------------------------------------------------

    /// Double-ended BFS latest common ancestor, per §4.7. Deliberately simple
    /// (first revisited id wins, queue seeded `[other, current]`) and must stay
    /// that way even in merge-of-merges DAGs where it isn't globally optimal.
    fn split_point(&self, current_id: &str, other_id: &str) -> Result<String, GitletError> {
        debug!(
            "resolving split point between current {} and other {}",
            current_id, other_id
        );
        let mut seen: HashSet<String> = HashSet::new();
        let mut queue: VecDeque<String> = VecDeque::new();
        queue.push_back(other_id.to_string());
        queue.push_back(current_id.to_string());

        while let Some(id) = queue.pop_front() {
            if seen.contains(&id) {
                info!("split point resolved to {}", id);
                return Ok(id);
            }
            seen.insert(id.clone());
            let commit = self.objects.get_commit(&id)?;
            if let Some(parent) = &commit.parent {
                queue.push_back(parent.clone());
            }
            if let Some(second_parent) = &commit.second_parent {
                queue.push_back(second_parent.clone());
            }
        }
        Err(GitletError::ObjectNotFound(
            "no common ancestor between merge tips".to_string(),
        ))
    }

    pub fn merge(&mut self, branch: &str) -> Result<String, GitletError> {
        if !self.staging.is_empty() {
            return Err(GitletError::UncommittedChanges);
        }
        if !self.refs.branch_exists(branch) {
            return Err(GitletError::MergeBranchNotFound);
        }
        let current_branch = self.refs.head_branch()?;
        if current_branch == branch {
            return Err(GitletError::MergeWithSelf);
        }

        let current_id = self.refs.branch_commit(&current_branch)?;
        let other_id = self.refs.branch_commit(branch)?;
        let current = self.objects.get_commit(&current_id)?;
        let other = self.objects.get_commit(&other_id)?;

        self.check_untracked_safety(&other, &current)?;

        let split_id = self.split_point(&current_id, &other_id)?;

        if split_id == current_id {
            self.materialize(&other, &current)?;
            self.refs.set_branch(&current_branch, &other_id)?;
            return Ok("Current branch fast-forwarded.".to_string());
        }
        if split_id == other_id {
            return Ok("Given branch is an ancestor of the current branch.".to_string());
        }

        let split = self.objects.get_commit(&split_id)?;

        let mut paths: BTreeSet<String> = BTreeSet::new();
        paths.extend(split.files.keys().cloned());
        paths.extend(current.files.keys().cloned());
        paths.extend(other.files.keys().cloned());

        let mut conflict_messages = Vec::new();

        for path in paths {
            let s = split.files.get(&path);
            let c = current.files.get(&path);
            let o = other.files.get(&path);

            let curr_changed = s.is_some() && c.is_some() && c != s;
            let other_changed = s.is_some() && o.is_some() && o != s;

            if curr_changed && other_changed {
                info!("merge conflict on {}", path);
                let current_bytes = match c {
                    Some(id) => self.objects.get_blob(id)?,
                    None => Vec::new(),
                };
                let other_bytes = match o {
                    Some(id) => self.objects.get_blob(id)?,
                    None => Vec::new(),
                };
                let mut conflict_bytes = Vec::new();
                conflict_bytes.extend_from_slice(b"<<<<<<< HEAD\n");
                conflict_bytes.extend_from_slice(&current_bytes);
                conflict_bytes.extend_from_slice(b"=======\n");
                conflict_bytes.extend_from_slice(&other_bytes);
                conflict_bytes.extend_from_slice(b">>>>>>>\n");

                utils::write_bytes(&self.cwd.join(&path), &conflict_bytes)?;
                let blob_id = self.objects.put_blob(&conflict_bytes)?;
                self.staging.stage_add(path.clone(), blob_id);
                conflict_messages.push("Encountered a merge conflict.".to_string());
            } else if s.is_some() && c.is_some() && o.is_none() {
                self.staging.stage_remove(path.clone());
                utils::remove_file_if_exists(&self.cwd.join(&path))?;
            } else if s.is_none() && c.is_none() && o.is_some() {
                let blob_id = o.unwrap().clone();
                let bytes = self.objects.get_blob(&blob_id)?;
                utils::write_bytes(&self.cwd.join(&path), &bytes)?;
                self.staging.stage_add(path.clone(), blob_id);
            } else if s.is_some() && !curr_changed && other_changed {
                let blob_id = o.unwrap().clone();
                let bytes = self.objects.get_blob(&blob_id)?;
                utils::write_bytes(&self.cwd.join(&path), &bytes)?;
                self.staging.stage_add(path.clone(), blob_id);
            } else if s.is_some() && !curr_changed && c.is_none() && o.is_none() {
                utils::remove_file_if_exists(&self.cwd.join(&path))?;
            }
        }

        // Known source defect (spec §9 Open Question, preserved deliberately):
        // the merge commit's files come from the staged additions only, not
        // HEAD ∪ additions − removals, so unchanged-on-both-sides files drop out.
        let (added, _removed) = self.staging.snapshot();
        let message = format!("Merged {} into {}.", branch, current_branch);
        let merge_commit = Commit::new(
            message,
            Utc::now().timestamp(),
            Some(current_id.clone()),
            Some(other_id.clone()),
            added,
        );
        let merge_id = self.objects.put_commit(&merge_commit)?;
        self.refs.set_branch(&current_branch, &merge_id)?;
        self.staging.clear();
        self.persist_staging()?;

        Ok(conflict_messages.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::{tempdir, TempDir};

    fn fresh_repo() -> (Repository, TempDir) {
        let _ = env_logger::builder().is_test(true).try_init();
        let tmp = tempdir().unwrap();
        let mut repo = Repository::new_at(tmp.path().to_path_buf()).unwrap();
        repo.init().unwrap();
        let repo = Repository::open_at(tmp.path().to_path_buf()).unwrap();
        (repo, tmp)
    }

    fn write_file(dir: &Path, name: &str, contents: &str) {
        fs::write(dir.join(name), contents).unwrap();
    }

    #[test]
    fn init_twice_fails() {
        let (_repo, tmp) = fresh_repo();
        let mut again = Repository::new_at(tmp.path().to_path_buf()).unwrap();
        assert!(matches!(
            again.init(),
            Err(GitletError::AlreadyInitialized)
        ));
    }

    #[test]
    fn add_then_commit_tracks_file() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "hello.txt", "hi\n");
        repo.add("hello.txt").unwrap();
        repo.commit("added hello").unwrap();

        let head = repo.head_commit().unwrap();
        assert_eq!(head.files.len(), 1);
        assert!(head.files.contains_key("hello.txt"));
    }

    #[test]
    fn commit_with_empty_staging_fails() {
        let (mut repo, _tmp) = fresh_repo();
        assert!(matches!(
            repo.commit("nothing to see here"),
            Err(GitletError::NothingToCommit)
        ));
    }

    #[test]
    fn commit_with_blank_message_fails() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "a.txt", "a");
        repo.add("a.txt").unwrap();
        assert!(matches!(
            repo.commit("   "),
            Err(GitletError::EmptyCommitMessage)
        ));
    }

    #[test]
    fn restore_round_trips_head_content() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "f.txt", "X");
        repo.add("f.txt").unwrap();
        repo.commit("commit X").unwrap();
        write_file(tmp.path(), "f.txt", "Y");
        repo.restore("f.txt").unwrap();
        let contents = fs::read_to_string(tmp.path().join("f.txt")).unwrap();
        assert_eq!(contents, "X");
    }

    #[test]
    fn switch_materializes_branch_content_and_back() {
        let (mut repo, tmp) = fresh_repo();
        repo.branch("dev").unwrap();
        repo.switch("dev").unwrap();
        write_file(tmp.path(), "a.txt", "A");
        repo.add("a.txt").unwrap();
        repo.commit("add a").unwrap();
        repo.switch("main").unwrap();
        assert!(!tmp.path().join("a.txt").exists());
        repo.switch("dev").unwrap();
        assert_eq!(fs::read_to_string(tmp.path().join("a.txt")).unwrap(), "A");
    }

    #[test]
    fn switch_to_current_branch_is_rejected() {
        let (mut repo, _tmp) = fresh_repo();
        assert!(matches!(
            repo.switch("main"),
            Err(GitletError::AlreadyOnBranch)
        ));
    }

    #[test]
    fn switch_refuses_to_clobber_untracked_file() {
        let (mut repo, tmp) = fresh_repo();
        repo.branch("dev").unwrap();
        repo.switch("dev").unwrap();
        write_file(tmp.path(), "a.txt", "A");
        repo.add("a.txt").unwrap();
        repo.commit("add a").unwrap();
        repo.switch("main").unwrap();

        write_file(tmp.path(), "a.txt", "in the way");
        assert!(matches!(
            repo.switch("dev"),
            Err(GitletError::UntrackedFileInTheWay)
        ));
        assert_eq!(
            fs::read_to_string(tmp.path().join("a.txt")).unwrap(),
            "in the way"
        );
    }

    #[test]
    fn merge_fast_forwards_when_current_is_ancestor() {
        let (mut repo, tmp) = fresh_repo();
        repo.branch("dev").unwrap();
        repo.switch("dev").unwrap();
        write_file(tmp.path(), "a.txt", "A");
        repo.add("a.txt").unwrap();
        repo.commit("commit 1").unwrap();
        write_file(tmp.path(), "b.txt", "B");
        repo.add("b.txt").unwrap();
        repo.commit("commit 2").unwrap();
        let dev_head = repo.head_commit_id().unwrap();
        repo.switch("main").unwrap();

        let msg = repo.merge("dev").unwrap();
        assert_eq!(msg, "Current branch fast-forwarded.");
        assert_eq!(repo.head_commit_id().unwrap(), dev_head);
        assert!(!repo.head_commit().unwrap().is_merge());
    }

    #[test]
    fn merge_given_branch_ancestor_is_noop() {
        let (mut repo, tmp) = fresh_repo();
        repo.branch("dev").unwrap();
        write_file(tmp.path(), "a.txt", "A");
        repo.add("a.txt").unwrap();
        repo.commit("commit 1").unwrap();

        let msg = repo.merge("dev").unwrap();
        assert_eq!(msg, "Given branch is an ancestor of the current branch.");
    }

    #[test]
    fn merge_clean_three_way_combines_both_sides() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "f.txt", "X");
        repo.add("f.txt").unwrap();
        repo.commit("split").unwrap();

        repo.branch("dev").unwrap();
        write_file(tmp.path(), "g.txt", "Y");
        repo.add("g.txt").unwrap();
        repo.commit("current adds g").unwrap();

        repo.switch("dev").unwrap();
        write_file(tmp.path(), "f.txt", "Z");
        repo.add("f.txt").unwrap();
        repo.commit("dev modifies f").unwrap();

        repo.switch("main").unwrap();
        let msg = repo.merge("dev").unwrap();
        assert!(msg.is_empty());
        assert_eq!(fs::read_to_string(tmp.path().join("f.txt")).unwrap(), "Z");
        assert_eq!(fs::read_to_string(tmp.path().join("g.txt")).unwrap(), "Y");
        assert!(repo.head_commit().unwrap().is_merge());
        assert!(repo.staging.is_empty());
    }

    #[test]
    fn merge_conflict_writes_markers_and_stages_blob() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "f.txt", "X");
        repo.add("f.txt").unwrap();
        repo.commit("split").unwrap();

        repo.branch("dev").unwrap();
        write_file(tmp.path(), "f.txt", "A");
        repo.add("f.txt").unwrap();
        repo.commit("current sets A").unwrap();

        repo.switch("dev").unwrap();
        write_file(tmp.path(), "f.txt", "B");
        repo.add("f.txt").unwrap();
        repo.commit("dev sets B").unwrap();

        repo.switch("main").unwrap();
        let msg = repo.merge("dev").unwrap();
        assert_eq!(msg, "Encountered a merge conflict.");
        let contents = fs::read_to_string(tmp.path().join("f.txt")).unwrap();
        assert_eq!(contents, "<<<<<<< HEAD\nA=======\nB>>>>>>>\n");
        assert!(repo.head_commit().unwrap().files.contains_key("f.txt"));
    }

    #[test]
    fn status_reports_modified_and_restore_clears_it() {
        let (mut repo, tmp) = fresh_repo();
        write_file(tmp.path(), "hello.txt", "hi\n");
        repo.add("hello.txt").unwrap();
        repo.commit("added hello").unwrap();
        write_file(tmp.path(), "hello.txt", "bye\n");

        let status = repo.status().unwrap();
        assert!(status.contains("hello.txt (modified)"));

        repo.restore("hello.txt").unwrap();
        let status = repo.status().unwrap();
        assert!(!status.contains("(modified)"));
    }

    #[test]
    fn rm_branch_refuses_current_branch() {
        let (mut repo, _tmp) = fresh_repo();
        assert!(matches!(
            repo.rm_branch("main"),
            Err(GitletError::CannotRemoveCurrentBranch)
        ));
    }
}
