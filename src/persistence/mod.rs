//! Guarded file writes
//!
//! A rewrite must never leave a truncated file behind:
//! - The current file is copied aside (`scores.txt` -> `scores.bak.txt`)
//! - The new contents are written in place
//! - Success removes the copy; failure copies it back first

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors from a guarded write
#[derive(thiserror::Error, Debug)]
pub enum PersistError {
    #[error("Backing up {path:?} failed : {source}")]
    Backup { path: PathBuf, source: io::Error },

    /// The write failed and the original contents are back in place
    #[error("Writing {path:?} failed, original restored : {source}")]
    Write { path: PathBuf, source: io::Error },

    /// The write failed and so did the restore; the backup is left on disk
    #[error("Writing {path:?} failed and restoring from {backup:?} failed : {source}")]
    Restore {
        path: PathBuf,
        backup: PathBuf,
        source: io::Error,
    },
}

/// First unused `<stem>.bak[.bak...]<.ext>` next to `path`
pub fn backup_path(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut stem = format!("{stem}.bak");
    loop {
        let candidate = path.with_file_name(format!("{stem}{ext}"));
        if !candidate.exists() {
            return candidate;
        }
        stem.push_str(".bak");
    }
}

/// Replace the contents of `path`, restoring the old contents if the write fails
pub fn write_with_backup(path: &Path, contents: &str) -> Result<(), PersistError> {
    write_with_backup_using(path, |p| fs::write(p, contents))
}

/// Same as [`write_with_backup`] with a caller-supplied writer
pub fn write_with_backup_using<F>(path: &Path, write: F) -> Result<(), PersistError>
where
    F: FnOnce(&Path) -> io::Result<()>,
{
    if !path.exists() {
        // Nothing to protect yet
        return write(path).map_err(|source| PersistError::Write {
            path: path.to_path_buf(),
            source,
        });
    }

    let backup = backup_path(path);
    fs::copy(path, &backup).map_err(|source| PersistError::Backup {
        path: path.to_path_buf(),
        source,
    })?;

    match write(path) {
        Ok(()) => {
            if let Err(e) = fs::remove_file(&backup) {
                log::warn!("Could not remove backup {backup:?}: {e}");
            }
            Ok(())
        }
        Err(source) => {
            if let Err(restore_err) = fs::copy(&backup, path) {
                log::error!("Restoring {path:?} from {backup:?} failed: {restore_err}");
                return Err(PersistError::Restore {
                    path: path.to_path_buf(),
                    backup,
                    source: restore_err,
                });
            }
            if let Err(e) = fs::remove_file(&backup) {
                log::warn!("Could not remove backup {backup:?}: {e}");
            }
            Err(PersistError::Write {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_backup_path_skips_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        assert_eq!(backup_path(&path), dir.path().join("scores.bak.txt"));

        fs::write(dir.path().join("scores.bak.txt"), "old").unwrap();
        assert_eq!(backup_path(&path), dir.path().join("scores.bak.bak.txt"));
    }

    #[test]
    fn test_write_replaces_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "old\n").unwrap();

        write_with_backup(&path, "new\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new\n");
        assert!(!dir.path().join("scores.bak.txt").exists());
    }

    #[test]
    fn test_write_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        write_with_backup(&path, "first\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "first\n");
    }

    #[test]
    fn test_failed_write_restores_original() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "12.3400\tAA\n").unwrap();

        let result = write_with_backup_using(&path, |p| {
            // Truncate, write half a line, then blow up
            fs::write(p, "9.0")?;
            Err(io::Error::other("disk full"))
        });

        assert!(matches!(result, Err(PersistError::Write { .. })));
        assert_eq!(fs::read_to_string(&path).unwrap(), "12.3400\tAA\n");
        assert!(!dir.path().join("scores.bak.txt").exists());
    }

    #[test]
    fn test_failed_restore_keeps_backup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(&path, "12.3400\tAA\n").unwrap();

        let result = write_with_backup_using(&path, |p| {
            // Leave something in the way that the backup can't be copied over
            fs::remove_file(p)?;
            fs::create_dir(p)?;
            Err(io::Error::other("disk full"))
        });

        let backup = dir.path().join("scores.bak.txt");
        match result {
            Err(PersistError::Restore { backup: kept, .. }) => assert_eq!(kept, backup),
            other => panic!("unexpected result {other:?}"),
        }
        assert_eq!(fs::read_to_string(&backup).unwrap(), "12.3400\tAA\n");
    }
}
