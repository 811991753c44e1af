//! The `manifest.json` artifact written into the exposed folder.
//!
//! The manifest is output only; the server never reads it back.

use crate::error::Error;
use crate::scan::FileRecord;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

/// File name of the manifest inside the exposed folder.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Serialized form of the eligible file set.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    pub files: Vec<FileRecord>,
}

/// Write the manifest for `files` into `dir`, replacing any previous one.
///
/// Returns the path of the written file.
pub fn write_manifest(dir: &Path, files: &[FileRecord]) -> Result<PathBuf, Error> {
    #[derive(Serialize)]
    struct ManifestRef<'a> {
        files: &'a [FileRecord],
    }

    let path = dir.join(MANIFEST_FILE_NAME);
    let data = serde_json::to_vec_pretty(&ManifestRef { files }).map_err(|source| {
        Error::SerializeManifest {
            path: path.clone(),
            source,
        }
    })?;
    write_file(&path, &data).map_err(|source| Error::WriteManifest {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    let mut file = options.open(path)?;
    file.write_all(data)?;
    file.flush()
}

#[cfg(test)]
mod tests {
    use crate::manifest::{MANIFEST_FILE_NAME, Manifest, write_manifest};
    use crate::scan::{FileRecord, scan_folder};
    use chrono::{TimeZone, Utc};
    use std::fs;

    fn record(name: &str, size: u64) -> FileRecord {
        FileRecord {
            name: name.into(),
            mime_type: "text/plain".into(),
            size,
            last_modified: Utc.with_ymd_and_hms(2025, 1, 15, 10, 30, 0).unwrap(),
        }
    }

    #[test]
    fn writes_pretty_camel_case_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), &[record("test.txt", 42)]).unwrap();
        assert_eq!(path, dir.path().join(MANIFEST_FILE_NAME));

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"files\": [\n"));
        assert!(text.contains("\"mimeType\": \"text/plain\""));
        assert!(text.contains("\"lastModified\": \"2025-01-15T10:30:00Z\""));
        assert!(text.contains("\"size\": 42"));
    }

    #[test]
    fn overwrites_previous_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE_NAME), "stale and much longer content").unwrap();
        write_manifest(dir.path(), &[]).unwrap();

        let text = fs::read_to_string(dir.path().join(MANIFEST_FILE_NAME)).unwrap();
        let manifest: Manifest = serde_json::from_str(&text).unwrap();
        assert!(manifest.files.is_empty());
    }

    #[test]
    fn matches_scanned_set_in_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.txt"), "bb").unwrap();
        fs::write(dir.path().join("a.txt"), "a").unwrap();
        fs::write(dir.path().join("c.bin"), [0u8, 1, 2, 3]).unwrap();

        let files = scan_folder(dir.path()).unwrap();
        let path = write_manifest(dir.path(), &files).unwrap();
        let manifest: Manifest = serde_json::from_slice(&fs::read(path).unwrap()).unwrap();
        assert_eq!(manifest.files, files);
        assert_eq!(manifest.files[0].name, "a.txt");
        assert_eq!(manifest.files[1].size, 2);
    }

    #[cfg(unix)]
    #[test]
    fn new_manifest_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), &[]).unwrap();
        let mode = fs::metadata(path).unwrap().permissions().mode();
        assert_eq!(mode & 0o004, 0o004);
    }
}
