//! Datastore layout
//!
//! Records live under the datastore root as `<root>/<uid[..2]>/<uid>`, with
//! their properties in a `metadata` subdirectory of the entry. The two-character
//! prefix directories keep any single directory from growing too large.

use crate::collector::PropertyReader;
use crate::config::METADATA_SUBDIR;
use crate::error::{PropError, Result};
use crate::property::{PropertyMap, PropertyName, PropertyValue};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Length of the prefix directory names under the root, in characters
pub const PREFIX_LEN: usize = 2;

/// Length of a record uid (a hyphenated UUID), in characters
pub const UID_LEN: usize = 36;

/// Maps record uids to paths inside a datastore root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatastoreLayout {
    root: PathBuf,
}

impl DatastoreLayout {
    /// Create a layout rooted at `root`
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The datastore root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of the record `uid`
    ///
    /// # Errors
    ///
    /// Returns `PropError::InvalidName` if `uid` is shorter than the prefix
    /// or is not a bare filename.
    pub fn entry_path(&self, uid: &str) -> Result<PathBuf> {
        let uid = PropertyName::new(uid)?;
        let uid = uid.as_str();
        if uid.chars().count() < PREFIX_LEN {
            return Err(PropError::InvalidName {
                name: uid.to_string(),
                reason: "uid shorter than its prefix directory",
            });
        }
        let end = uid
            .char_indices()
            .nth(PREFIX_LEN)
            .map_or(uid.len(), |(i, _)| i);
        let prefix = &uid[..end];
        Ok(self.root.join(prefix).join(uid))
    }

    /// Metadata directory of the record `uid`
    ///
    /// # Errors
    ///
    /// Same as [`DatastoreLayout::entry_path`].
    pub fn metadata_path(&self, uid: &str) -> Result<PathBuf> {
        Ok(self.entry_path(uid)?.join(METADATA_SUBDIR))
    }

    /// List the uids of every record under the root
    ///
    /// Only prefix directories with two-character names are descended into,
    /// and only entries with uid-length names are reported. Order follows
    /// directory enumeration and is not stable.
    ///
    /// # Errors
    ///
    /// Returns `Err(PropError)` if the root or a prefix directory cannot be
    /// opened or listed.
    pub fn find_all(&self) -> Result<Vec<String>> {
        let mut uids = Vec::new();
        for prefix in read_dir_names(&self.root)? {
            if prefix.chars().count() != PREFIX_LEN {
                continue;
            }
            let prefix_path = self.root.join(&prefix);
            if !prefix_path.is_dir() {
                continue;
            }
            for name in read_dir_names(&prefix_path)? {
                if name.chars().count() == UID_LEN {
                    uids.push(name);
                } else {
                    trace!(entry = %name, "not a record uid");
                }
            }
        }
        debug!(root = %self.root.display(), count = uids.len(), "listed records");
        Ok(uids)
    }
}

/// UTF-8 names of a directory's entries; other names are skipped
fn read_dir_names(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|source| PropError::DirectoryOpen {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PropError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        if let Ok(name) = entry.file_name().into_string() {
            names.push(name);
        }
    }
    Ok(names)
}

/// Read side of the metadata store: property lookups by record uid
#[derive(Debug, Clone)]
pub struct MetadataStore {
    layout: DatastoreLayout,
    reader: PropertyReader,
}

impl MetadataStore {
    /// Create a store over `layout`, reading with `reader`
    ///
    /// The reader's base path should be `Direct`: the store already
    /// resolves the `metadata` subdirectory.
    #[must_use]
    pub const fn new(layout: DatastoreLayout, reader: PropertyReader) -> Self {
        Self { layout, reader }
    }

    /// The layout this store reads from
    #[must_use]
    pub const fn layout(&self) -> &DatastoreLayout {
        &self.layout
    }

    /// Retrieve properties of record `uid`
    ///
    /// # Errors
    ///
    /// Returns `Err(PropError)` if the uid is invalid or retrieval fails; see
    /// [`PropertyReader::retrieve`].
    pub fn retrieve<S: AsRef<str>>(
        &self,
        uid: &str,
        properties: Option<&[S]>,
    ) -> Result<PropertyMap> {
        let path = self.layout.metadata_path(uid)?;
        self.reader.retrieve(&path, properties)
    }

    /// Read one property of record `uid`, `None` if it is not set
    ///
    /// # Errors
    ///
    /// Returns `Err(PropError)` if the uid or key is invalid or the property
    /// file exists but cannot be read.
    pub fn get_property(&self, uid: &str, key: &str) -> Result<Option<PropertyValue>> {
        let path = self.layout.metadata_path(uid)?;
        self.reader.get_property(&path, key)
    }
}
