//! One-shot classification of the exposed folder.
//!
//! [`scan_folder`] runs once at startup. Only top-level regular files at or
//! under [`MAX_FILE_SIZE`] whose leading bytes sniff as text-like become
//! [`FileRecord`]s; everything else is skipped without failing the scan.

use crate::error::Error;
use crate::sniff::{SNIFF_LEN, detect_content_type, is_text_like};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

/// Largest file, in bytes, that is eligible for exposure.
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Metadata for one eligible file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Base name within the folder. Unique across records.
    pub name: String,
    /// Sniffed content type.
    pub mime_type: String,
    /// Size in bytes at scan time.
    pub size: u64,
    /// Modification time at scan time.
    pub last_modified: DateTime<Utc>,
}

/// Check that `path` is an accessible directory and return its canonical form.
pub fn resolve_folder(path: &Path) -> Result<PathBuf, Error> {
    let access = |source| Error::Access {
        path: path.to_path_buf(),
        source,
    };
    let meta = fs::metadata(path).map_err(access)?;
    if !meta.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    path.canonicalize().map_err(access)
}

/// Scan the top level of `dir` and return its eligible files sorted by name.
///
/// Only failing to list `dir` itself is an error.
pub fn scan_folder(dir: &Path) -> Result<Vec<FileRecord>, Error> {
    let read_dir = fs::read_dir(dir).map_err(|source| Error::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::debug!("skipping non UTF-8 name {}", path.display());
            continue;
        };
        match classify(&path, name) {
            Ok(Some(record)) => files.push(record),
            Ok(None) => {}
            Err(e) => tracing::debug!("skipping {}: {e}", path.display()),
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}

/// Apply the eligibility pipeline to one entry.
///
/// `Ok(None)` means the entry is readable but ineligible.
fn classify(path: &Path, name: String) -> io::Result<Option<FileRecord>> {
    // Follows symlinks: a link to a regular file is eligible, a link to a
    // directory is not.
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Ok(None);
    }
    let size = meta.len();
    if size > MAX_FILE_SIZE {
        return Ok(None);
    }
    let last_modified = DateTime::<Utc>::from(meta.modified()?);

    let head = read_head(path)?;
    let mime_type = detect_content_type(&head);
    if !is_text_like(mime_type) {
        return Ok(None);
    }

    Ok(Some(FileRecord {
        name,
        mime_type: mime_type.to_owned(),
        size,
        last_modified,
    }))
}

/// Read up to [`SNIFF_LEN`] leading bytes. An empty file has nothing to sniff.
fn read_head(path: &Path) -> io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    File::open(path)?
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;
    if head.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "no bytes to sniff",
        ));
    }
    Ok(head)
}

#[cfg(test)]
mod tests {
    use crate::scan::{MAX_FILE_SIZE, resolve_folder, scan_folder};
    use std::fs;

    #[test]
    fn includes_text_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("hello.txt"), "hello world").unwrap();

        let files = scan_folder(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "hello.txt");
        assert_eq!(files[0].size, 11);
        assert!(files[0].mime_type.starts_with("text/plain"));
    }

    #[test]
    fn skips_binary_files() {
        let dir = tempfile::tempdir().unwrap();
        let png = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
        fs::write(dir.path().join("image.png"), png).unwrap();

        assert!(scan_folder(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn size_ceiling_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let at_limit = vec![b'a'; MAX_FILE_SIZE as usize];
        fs::write(dir.path().join("at_limit.txt"), &at_limit).unwrap();
        let mut over_limit = at_limit;
        over_limit.push(b'a');
        fs::write(dir.path().join("over_limit.txt"), &over_limit).unwrap();

        let files = scan_folder(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "at_limit.txt");
        assert_eq!(files[0].size, MAX_FILE_SIZE);
    }

    #[test]
    fn skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("subdir")).unwrap();
        fs::write(dir.path().join("subdir").join("nested.txt"), "nested").unwrap();
        fs::write(dir.path().join("file.txt"), "content").unwrap();

        let files = scan_folder(dir.path()).unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "file.txt");
    }

    #[test]
    fn skips_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("empty.txt"), "").unwrap();

        assert!(scan_folder(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["c.md", "a.txt", "b.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }

        let names: Vec<_> = scan_folder(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["a.txt", "b.json", "c.md"]);
    }

    #[test]
    fn missing_folder_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        assert!(scan_folder(&missing).is_err());
        assert!(resolve_folder(&missing).is_err());
    }

    #[test]
    fn resolve_rejects_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("file.txt");
        fs::write(&file, "content").unwrap();

        let err = resolve_folder(&file).unwrap_err();
        assert!(err.to_string().starts_with("not a directory"));
        assert!(resolve_folder(dir.path()).unwrap().is_absolute());
    }

    #[cfg(unix)]
    #[test]
    fn follows_symlinks_to_regular_files_only() {
        use std::os::unix::fs::symlink;

        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), "plain text").unwrap();
        fs::write(outside.path().join("target.txt"), "linked text").unwrap();
        fs::create_dir(outside.path().join("subdir")).unwrap();

        symlink(outside.path().join("target.txt"), dir.path().join("link_to_file")).unwrap();
        symlink(outside.path().join("subdir"), dir.path().join("link_to_dir")).unwrap();
        symlink(outside.path().join("missing.txt"), dir.path().join("dangling")).unwrap();

        let files = scan_folder(dir.path()).unwrap();
        let names: Vec<_> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, ["link_to_file", "ok.txt"]);
        assert_eq!(files[0].size, 11);
        assert!(files[0].mime_type.starts_with("text/plain"));
    }

    #[cfg(unix)]
    #[test]
    fn skips_fifos() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("ok.txt"), "plain text").unwrap();
        let status = std::process::Command::new("mkfifo")
            .arg(dir.path().join("pipe"))
            .status()
            .unwrap();
        assert!(status.success());

        let names: Vec<_> = scan_folder(dir.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, ["ok.txt"]);
    }
}
