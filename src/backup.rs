//! Timestamped copies of files and projects taken before they are overwritten.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use log::debug;
use walkdir::WalkDir;

use crate::constants::BACKUP_TIMESTAMP_FORMAT;
use crate::error::{Error, Result};

/// Returns `<path>.bak.<YYYYmmddHHMMSS>`.
pub fn backup_path(path: &Path) -> PathBuf {
    let stamp = Local::now().format(BACKUP_TIMESTAMP_FORMAT);
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".bak.{stamp}"));
    PathBuf::from(name)
}

/// Like [`backup_path`], with a `.<n>` suffix added when that name is
/// already taken. Existing backups are never overwritten.
pub fn unused_backup_path(path: &Path) -> PathBuf {
    let base = backup_path(path);
    let mut candidate = base.clone();
    let mut counter = 1;
    while candidate.exists() {
        let mut name = base.as_os_str().to_owned();
        name.push(format!(".{counter}"));
        candidate = PathBuf::from(name);
        counter += 1;
    }
    candidate
}

/// Copies an existing file aside before it gets overwritten.
///
/// # Returns
/// * `Result<Option<PathBuf>>` - Path of the copy, `None` if `path` does not exist
pub fn backup_file(path: &Path) -> Result<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }
    let target = unused_backup_path(path);
    debug!("Backing up '{}' to '{}'", path.display(), target.display());
    fs::copy(path, &target)?;
    Ok(Some(target))
}

/// Copies a whole project (a directory or an archive file) aside.
pub fn snapshot(path: &Path) -> Result<PathBuf> {
    let target = unused_backup_path(path);
    if path.is_file() {
        fs::copy(path, &target)?;
        return Ok(target);
    }

    debug!("Snapshotting '{}' to '{}'", path.display(), target.display());
    for entry in WalkDir::new(path) {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let relative = entry
            .path()
            .strip_prefix(path)
            .map_err(|e| Error::IoError(std::io::Error::other(e)))?;
        let dest = target.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            fs::copy(entry.path(), &dest)?;
        }
    }
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_suffix() {
        let path = backup_path(Path::new("demo/src/main.rs"));
        let name = path.to_string_lossy();
        assert!(name.starts_with("demo/src/main.rs.bak."));
        assert_eq!(name.len(), "demo/src/main.rs.bak.".len() + 14);
    }

    #[test]
    fn test_backups_never_overwrite_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("a.txt");

        fs::write(&file, "first").unwrap();
        let first = backup_file(&file).unwrap().unwrap();
        fs::write(&file, "second").unwrap();
        let second = backup_file(&file).unwrap().unwrap();

        assert_ne!(first, second);
        assert_eq!(fs::read_to_string(first).unwrap(), "first");
        assert_eq!(fs::read_to_string(second).unwrap(), "second");
        assert_eq!(backup_file(&temp_dir.path().join("missing")).unwrap(), None);
    }
}
