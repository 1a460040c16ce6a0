use crate::error::GitletError;
use log::info;
use sha1::{Digest, Sha1};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// hex SHA-1 of raw bytes
pub fn sha1_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// hex SHA-1 of a file's contents, read byte-accurately (no text decoding)
pub fn sha1_file(path: &Path) -> Result<String, GitletError> {
    if !path.exists() {
        return Err(GitletError::FileNotExist);
    }
    let bytes = fs::read(path)?;
    Ok(sha1_bytes(&bytes))
}

/// read a file's raw bytes
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, GitletError> {
    if !path.exists() {
        return Err(GitletError::FileNotExist);
    }
    Ok(fs::read(path)?)
}

/// write bytes to `path`, creating parent directories and overwriting any existing content
pub fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), GitletError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, bytes)?;
    Ok(())
}

/// delete a file if present; a missing file is not an error
pub fn remove_file_if_exists(path: &Path) -> Result<(), GitletError> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

/// recursively enumerate regular files under `dir`, skipping anything under `ignore`
/// (the metadata directory), returned as paths relative to `dir`
pub fn list_working_files(dir: &Path, ignore: &Path) -> Result<Vec<PathBuf>, GitletError> {
    let mut paths = Vec::new();
    visit_dirs(dir, dir, ignore, &mut paths)?;
    Ok(paths)
}

fn visit_dirs(
    root: &Path,
    dir: &Path,
    ignore: &Path,
    paths: &mut Vec<PathBuf>,
) -> Result<(), GitletError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path == ignore {
            continue;
        }
        if path.is_dir() {
            visit_dirs(root, &path, ignore, paths)?;
        } else {
            let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();
            paths.push(relative);
        }
    }
    Ok(())
}

/// the set of regular files in the working directory as relative-path strings,
/// used by `status` and the untracked-file safety guard
pub fn working_file_set(cwd: &Path, metadata_dir: &Path) -> Result<HashSet<String>, GitletError> {
    info!("scanning working tree under {}", cwd.display());
    let files = list_working_files(cwd, metadata_dir)?;
    Ok(files
        .into_iter()
        .map(|p| p.to_string_lossy().replace('\\', "/"))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sha1_bytes_matches_known_vector() {
        assert_eq!(
            "cc9eef9cdbe8b198eddf07651446ad9cdf1446f3",
            sha1_bytes(b"This is a demo content for crypto_string_ut")
        );
    }

    #[test]
    fn sha1_file_ut() {
        let tmp = tempfile::tempdir().unwrap();
        let file_path = tmp.path().join("f");
        fs::write(&file_path, b"This is a demo content for crypto_file_ut").unwrap();
        assert_eq!(
            "2564cf76bd5b1cf65f7b9f52546f1ba7c8accee8",
            sha1_file(&file_path).unwrap()
        );
    }

    #[test]
    fn list_working_files_skips_metadata_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub")).unwrap();
        fs::create_dir_all(root.join(".gitlet")).unwrap();
        fs::write(root.join("a.txt"), b"a").unwrap();
        fs::write(root.join("sub/b.txt"), b"b").unwrap();
        fs::write(root.join(".gitlet/ignored"), b"x").unwrap();

        let files = working_file_set(root, &root.join(".gitlet")).unwrap();
        assert!(files.contains("a.txt"));
        assert!(files.contains("sub/b.txt"));
        assert_eq!(files.len(), 2);
    }
}
