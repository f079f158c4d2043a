//! Spool setup and teardown around a test scenario.
//!
//! Before a scenario the spool directory must exist and be empty; after it,
//! whatever the application spooled is removed again.

use std::fs;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::error::{Result, SpoolError};
use crate::store::spool::{ScanOptions, SpoolDir};

/// Create the spool directory if needed, purge leftovers, and open it.
pub fn prepare(path: impl AsRef<Path>, options: ScanOptions) -> Result<SpoolDir> {
    let path = path.as_ref();
    if !path.exists() {
        fs::create_dir_all(path).map_err(|e| SpoolError::io(path, e))?;
        info!(path = %path.display(), "Created spool directory");
    }

    let spool = SpoolDir::open(path, options)?;
    let removed = purge(&spool)?;
    if removed > 0 {
        info!(path = %path.display(), removed, "Purged leftover spooled emails");
    }
    Ok(spool)
}

/// Remove every spooled file, keeping the directory tree itself.
///
/// Only paths under the spool directory are touched; symlinks are removed
/// as links, never through to their targets. Returns the number of files
/// removed.
pub fn purge(spool: &SpoolDir) -> Result<usize> {
    let mut removed = 0;
    for file in spool.files()? {
        if !file.starts_with(spool.path()) {
            warn!(path = %file.display(), "Refusing to remove file outside the spool");
            continue;
        }
        fs::remove_file(&file).map_err(|e| SpoolError::io(&file, e))?;
        debug!(path = %file.display(), "Removed spooled email");
        removed += 1;
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::spool::MessageSource;

    #[test]
    fn test_prepare_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("a").join("spool");
        let spool = prepare(&path, ScanOptions::default()).unwrap();
        assert!(path.is_dir());
        assert_eq!(spool.messages().unwrap().count(), 0);
    }

    #[test]
    fn test_prepare_purges_leftovers() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("old.eml"), "Subject: Old").unwrap();
        fs::create_dir(tmp.path().join("sub")).unwrap();
        fs::write(tmp.path().join("sub").join("older.eml"), "Subject: Older").unwrap();

        let spool = prepare(tmp.path(), ScanOptions::default()).unwrap();
        assert_eq!(spool.messages().unwrap().count(), 0);
        assert!(tmp.path().join("sub").is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn test_prepare_keeps_files_behind_symlinked_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let spool_path = tmp.path().join("spool");
        let precious = tmp.path().join("precious");
        fs::create_dir_all(&spool_path).unwrap();
        fs::create_dir_all(&precious).unwrap();
        fs::write(precious.join("keep.txt"), "keep").unwrap();
        fs::write(spool_path.join("old.eml"), "Subject: Old").unwrap();
        std::os::unix::fs::symlink(&precious, spool_path.join("link")).unwrap();
        std::os::unix::fs::symlink(&spool_path, spool_path.join("loop")).unwrap();

        let spool = prepare(&spool_path, ScanOptions::default()).unwrap();
        assert!(precious.join("keep.txt").exists());
        assert!(!spool_path.join("old.eml").exists());
        assert_eq!(spool.messages().unwrap().count(), 0);
    }

    #[cfg(unix)]
    #[test]
    fn test_purge_removes_file_links_not_targets() {
        let tmp = tempfile::tempdir().unwrap();
        let spool_path = tmp.path().join("spool");
        fs::create_dir_all(&spool_path).unwrap();
        let target = tmp.path().join("target.eml");
        fs::write(&target, "Subject: Target").unwrap();
        std::os::unix::fs::symlink(&target, spool_path.join("linked.eml")).unwrap();

        let spool = SpoolDir::open(&spool_path, ScanOptions::default()).unwrap();
        assert_eq!(purge(&spool).unwrap(), 1);
        assert!(target.exists());
        assert!(!spool_path.join("linked.eml").exists());
    }

    #[test]
    fn test_purge_reports_count_and_keeps_hidden() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("a.eml"), "a").unwrap();
        fs::write(tmp.path().join("b.eml"), "b").unwrap();
        fs::write(tmp.path().join(".gitkeep"), "").unwrap();

        let spool = SpoolDir::open(tmp.path(), ScanOptions::default()).unwrap();
        assert_eq!(purge(&spool).unwrap(), 2);
        assert_eq!(purge(&spool).unwrap(), 0);
        assert!(tmp.path().join(".gitkeep").exists());
    }
}
