//! Spool directory reader: lazy, restartable enumeration of spooled files.

use std::collections::VecDeque;
use std::fs::{self, ReadDir};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Result, SpoolError};
use crate::model::message::RawMessage;

/// How a spool directory is walked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    /// Descend into subdirectories.
    pub recursive: bool,
    /// Visit entries whose name starts with a dot.
    pub include_hidden: bool,
    /// Log and skip files that cannot be read instead of failing the scan.
    pub skip_unreadable: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            recursive: true,
            include_hidden: false,
            skip_unreadable: false,
        }
    }
}

/// Anything that can hand out spooled messages for matching.
pub trait MessageSource {
    /// Human-readable name used in logs and errors.
    fn describe(&self) -> String;

    /// Start a fresh pass over every message.
    fn messages(&self) -> Result<Box<dyn Iterator<Item = Result<RawMessage>> + '_>>;
}

/// A validated spool directory.
#[derive(Debug, Clone)]
pub struct SpoolDir {
    path: PathBuf,
    options: ScanOptions,
}

impl SpoolDir {
    /// Open a spool directory, checking that it exists and can be listed.
    pub fn open(path: impl AsRef<Path>, options: ScanOptions) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if !path.is_dir() {
            return Err(SpoolError::DirectoryNotFound(path));
        }
        if let Err(e) = fs::read_dir(&path) {
            debug!(path = %path.display(), error = %e, "Spool directory not listable");
            return Err(SpoolError::DirectoryNotFound(path));
        }
        Ok(Self { path, options })
    }

    /// Directory being scanned.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start a new scan. Each call re-reads the directory from scratch.
    pub fn scan(&self) -> Result<SpoolIter> {
        let root = fs::read_dir(&self.path)
            .map_err(|_| SpoolError::DirectoryNotFound(self.path.clone()))?;
        Ok(SpoolIter {
            current: Some((self.path.clone(), root)),
            pending: VecDeque::new(),
            options: self.options,
        })
    }

    /// Paths of every spooled file, in enumeration order, without reading them.
    ///
    /// Entries that cannot be listed are skipped under
    /// [`ScanOptions::skip_unreadable`], same as during a message scan.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut iter = self.scan()?;
        let mut files = Vec::new();
        loop {
            match iter.next_file() {
                Ok(Some(path)) => files.push(path),
                Ok(None) => return Ok(files),
                Err(e) if self.options.skip_unreadable => {
                    warn!(error = %e, "Skipping unreadable spool entry");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

impl MessageSource for SpoolDir {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn messages(&self) -> Result<Box<dyn Iterator<Item = Result<RawMessage>> + '_>> {
        Ok(Box::new(self.scan()?))
    }
}

/// In-memory spool, mostly useful for tests and for embedding.
impl MessageSource for Vec<RawMessage> {
    fn describe(&self) -> String {
        "<memory>".to_string()
    }

    fn messages(&self) -> Result<Box<dyn Iterator<Item = Result<RawMessage>> + '_>> {
        Ok(Box::new(self.iter().cloned().map(Ok)))
    }
}

/// Iterator over the files of a [`SpoolDir`], reading each one on demand.
///
/// Subdirectories are queued and walked after the current directory, so
/// only one directory handle is open at a time. Symlinked directories are
/// never followed; every file under the spool is visited exactly once.
pub struct SpoolIter {
    current: Option<(PathBuf, ReadDir)>,
    pending: VecDeque<PathBuf>,
    options: ScanOptions,
}

impl SpoolIter {
    /// Advance to the next regular file, without reading it.
    fn next_file(&mut self) -> Result<Option<PathBuf>> {
        loop {
            let next_entry = match self.current.as_mut() {
                Some((dir, entries)) => entries
                    .next()
                    .map(|entry| entry.map_err(|e| SpoolError::io(dir.as_path(), e))),
                None => match self.pending.pop_front() {
                    Some(next) => {
                        let entries = fs::read_dir(&next).map_err(|e| SpoolError::io(&next, e))?;
                        self.current = Some((next, entries));
                        continue;
                    }
                    None => return Ok(None),
                },
            };

            let entry = match next_entry {
                Some(Ok(entry)) => entry,
                Some(Err(e)) => {
                    // A failing directory handle cannot make progress.
                    self.current = None;
                    return Err(e);
                }
                None => {
                    self.current = None;
                    continue;
                }
            };

            if !self.options.include_hidden && entry.file_name().to_string_lossy().starts_with('.') {
                continue;
            }

            let path = entry.path();
            let file_type = entry.file_type().map_err(|e| SpoolError::io(&path, e))?;
            if file_type.is_dir() {
                if self.options.recursive {
                    self.pending.push_back(path);
                }
                continue;
            }
            if file_type.is_symlink() && path.is_dir() {
                debug!(path = %path.display(), "Not following symlinked directory");
                continue;
            }
            return Ok(Some(path));
        }
    }
}

impl Iterator for SpoolIter {
    type Item = Result<RawMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let path = match self.next_file() {
                Ok(Some(path)) => path,
                Ok(None) => return None,
                Err(e) if self.options.skip_unreadable => {
                    warn!(error = %e, "Skipping unreadable spool entry");
                    continue;
                }
                Err(e) => return Some(Err(e)),
            };

            match read_message(&path) {
                Ok(message) => return Some(Ok(message)),
                Err(e) if self.options.skip_unreadable => {
                    warn!(path = %path.display(), error = %e, "Skipping unreadable spool file");
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Read one spool file fully and decode it to text.
pub fn read_message(path: &Path) -> Result<RawMessage> {
    let bytes = fs::read(path).map_err(|e| SpoolError::io(path, e))?;
    debug!(path = %path.display(), bytes = bytes.len(), "Read spool file");
    Ok(RawMessage {
        path: path.to_path_buf(),
        text: decode_text(&bytes),
    })
}

/// Decode file bytes to a string.
///
/// Tries UTF-8 first, then falls back to Windows-1252 (which accepts every byte).
fn decode_text(bytes: &[u8]) -> String {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);

    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => {
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
            decoded.into_owned()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write(dir: &Path, name: &str, contents: &[u8]) {
        let path = dir.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn sorted_names(dir: &SpoolDir) -> Vec<String> {
        let mut names: Vec<String> = dir
            .messages()
            .unwrap()
            .map(|m| {
                m.unwrap()
                    .path
                    .strip_prefix(dir.path())
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_open_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            SpoolDir::open(&missing, ScanOptions::default()),
            Err(SpoolError::DirectoryNotFound(p)) if p == missing
        ));
    }

    #[test]
    fn test_open_file_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"x");
        assert!(matches!(
            SpoolDir::open(tmp.path().join("a.eml"), ScanOptions::default()),
            Err(SpoolError::DirectoryNotFound(_))
        ));
    }

    #[test]
    fn test_recursive_scan_visits_each_file_once() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"a");
        write(tmp.path(), "nested/b.eml", b"b");
        write(tmp.path(), "nested/deeper/c.eml", b"c");

        let dir = SpoolDir::open(tmp.path(), ScanOptions::default()).unwrap();
        assert_eq!(
            sorted_names(&dir),
            vec!["a.eml", "nested/b.eml", "nested/deeper/c.eml"]
        );
    }

    #[test]
    fn test_non_recursive_scan() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"a");
        write(tmp.path(), "nested/b.eml", b"b");

        let options = ScanOptions {
            recursive: false,
            ..ScanOptions::default()
        };
        let dir = SpoolDir::open(tmp.path(), options).unwrap();
        assert_eq!(sorted_names(&dir), vec!["a.eml"]);
    }

    #[test]
    fn test_hidden_files_skipped_by_default() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"a");
        write(tmp.path(), ".gitkeep", b"");
        write(tmp.path(), ".hidden/b.eml", b"b");

        let dir = SpoolDir::open(tmp.path(), ScanOptions::default()).unwrap();
        assert_eq!(sorted_names(&dir), vec!["a.eml"]);

        let options = ScanOptions {
            include_hidden: true,
            ..ScanOptions::default()
        };
        let dir = SpoolDir::open(tmp.path(), options).unwrap();
        assert_eq!(sorted_names(&dir), vec![".gitkeep", ".hidden/b.eml", "a.eml"]);
    }

    #[test]
    fn test_scan_is_restartable() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"a");
        let dir = SpoolDir::open(tmp.path(), ScanOptions::default()).unwrap();

        assert_eq!(dir.messages().unwrap().count(), 1);
        write(tmp.path(), "b.eml", b"b");
        assert_eq!(dir.messages().unwrap().count(), 2);
        assert_eq!(dir.files().unwrap().len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinked_directories_not_followed() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "spool/a.eml", b"a");
        write(tmp.path(), "elsewhere/b.eml", b"b");
        let spool = tmp.path().join("spool");
        std::os::unix::fs::symlink(&spool, spool.join("loop")).unwrap();
        std::os::unix::fs::symlink(tmp.path().join("elsewhere"), spool.join("link")).unwrap();

        let dir = SpoolDir::open(&spool, ScanOptions::default()).unwrap();
        assert_eq!(sorted_names(&dir), vec!["a.eml"]);
        assert_eq!(dir.files().unwrap(), vec![spool.join("a.eml")]);
    }

    #[cfg(unix)]
    #[test]
    fn test_files_honors_skip_unreadable() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.eml", b"a");
        write(tmp.path(), "locked/b.eml", b"b");
        let locked = tmp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();
        if fs::read_dir(&locked).is_ok() {
            // Running as root: permissions are not enforced.
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let strict = SpoolDir::open(tmp.path(), ScanOptions::default()).unwrap();
        let lenient = SpoolDir::open(
            tmp.path(),
            ScanOptions {
                skip_unreadable: true,
                ..ScanOptions::default()
            },
        )
        .unwrap();
        let strict_result = strict.files();
        let lenient_result = lenient.files();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert!(matches!(strict_result, Err(SpoolError::Io { .. })));
        assert_eq!(lenient_result.unwrap(), vec![tmp.path().join("a.eml")]);
    }

    #[test]
    fn test_decode_utf8_with_bom() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFSubject: Hi"), "Subject: Hi");
    }

    #[test]
    fn test_decode_windows_1252_fallback() {
        assert_eq!(decode_text(b"M\xFCller"), "Müller");
    }

    #[test]
    fn test_memory_source() {
        let spool = vec![RawMessage::new("one", "Subject: A")];
        assert_eq!(spool.describe(), "<memory>");
        let all: Vec<_> = spool.messages().unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(all, spool);
    }
}
