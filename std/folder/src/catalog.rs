//! Immutable lookup table over the eligible file set.
//!
//! The catalog is the only place that turns a file name into a path, and it
//! only does so for names recorded at startup. Caller-supplied strings are
//! looked up, never joined onto the folder root.

use crate::scan::FileRecord;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Startup-time file set keyed by name and by resource URI.
#[derive(Debug)]
pub struct Catalog {
    root: PathBuf,
    records: Vec<FileRecord>,
    by_name: HashMap<String, usize>,
    by_uri: HashMap<String, usize>,
}

impl Catalog {
    /// Build the catalog for `records` scanned from the absolute folder `root`.
    pub fn new(root: PathBuf, records: Vec<FileRecord>) -> Self {
        let by_name = records
            .iter()
            .enumerate()
            .map(|(i, r)| (r.name.clone(), i))
            .collect();
        let by_uri = records
            .iter()
            .enumerate()
            .map(|(i, r)| (file_uri(&root.join(&r.name)), i))
            .collect();
        Self {
            root,
            records,
            by_name,
            by_uri,
        }
    }

    /// The exposed folder.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All records, in scan order.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact, case-sensitive lookup by file name.
    pub fn get(&self, name: &str) -> Option<&FileRecord> {
        self.by_name.get(name).map(|&i| &self.records[i])
    }

    /// Absolute path of a cataloged file, or `None` for unknown names.
    pub fn resolve(&self, name: &str) -> Option<PathBuf> {
        self.get(name).map(|r| self.root.join(&r.name))
    }

    /// Resource URI of a cataloged file.
    pub fn resource_uri(&self, record: &FileRecord) -> String {
        file_uri(&self.root.join(&record.name))
    }

    /// Reverse of [`Catalog::resource_uri`].
    pub fn by_uri(&self, uri: &str) -> Option<&FileRecord> {
        self.by_uri.get(uri).map(|&i| &self.records[i])
    }
}

/// `file:///` URI for an absolute path.
fn file_uri(path: &Path) -> String {
    let path = path.to_string_lossy();
    format!("file:///{}", path.trim_start_matches('/'))
}
