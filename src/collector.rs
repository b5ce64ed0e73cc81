//! Property collector
//!
//! Builds a [`PropertyMap`] for one metadata record, either from an
//! explicit list of property names or from a full listing of the metadata
//! directory. Retrieval is all-or-nothing: the first failure discards
//! everything collected so far and is returned as the call's error.

use crate::config::{ReaderConfig, RequestStrategy};
use crate::error::{PropError, Result};
use crate::loader::{load_property, load_required, Requirement};
use crate::property::{is_dot_entry, PropertyMap, PropertyName, PropertyValue};
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{debug, trace};

/// Which directory entries a scan keeps
#[derive(Debug)]
enum Membership {
    /// Every entry except `.` and `..`
    All,
    /// Only entries whose name is in the set
    Only(HashSet<String>),
}

impl Membership {
    fn admits(&self, name: &std::ffi::OsStr) -> bool {
        match self {
            Self::All => true,
            Self::Only(names) => name.to_str().is_some_and(|s| names.contains(s)),
        }
    }
}

/// Reads metadata directories into property maps
///
/// A reader holds only configuration; every call owns its own map, file
/// handles, and directory handle, and releases all of them before it
/// returns.
///
/// # Examples
///
/// ```rust,no_run
/// use propdir::{PropertyReader, ReaderConfig};
/// use std::path::Path;
///
/// # fn main() -> propdir::Result<()> {
/// let reader = PropertyReader::new(ReaderConfig::default());
///
/// // Every property in the directory
/// let all = reader.retrieve(Path::new("/var/lib/store/ab/abcd/metadata"), None::<&[&str]>)?;
///
/// // Just two of them; both must exist
/// let some = reader.retrieve(
///     Path::new("/var/lib/store/ab/abcd/metadata"),
///     Some(&["title", "mime_type"][..]),
/// )?;
/// # let _ = (all, some);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct PropertyReader {
    config: ReaderConfig,
}

impl PropertyReader {
    /// Create a reader with the given configuration
    #[must_use]
    pub const fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// The reader's configuration
    #[must_use]
    pub const fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Retrieve properties from a metadata directory
    ///
    /// With no request list, or an empty one, every entry of the directory
    /// except `.` and `..` is loaded. With a non-empty list the configured
    /// [`RequestStrategy`] applies: `ExplicitList` loads exactly the listed
    /// names in order, `FilteredScan` lists the directory and keeps the
    /// entries that were requested.
    ///
    /// # Parameters
    ///
    /// * `dir` - Directory of the record, before base path resolution
    /// * `requested` - Optional list of property names
    ///
    /// # Returns
    ///
    /// The complete map. No partial map is ever returned.
    ///
    /// # Errors
    ///
    /// Returns `Err(PropError)` if:
    /// - A requested name is not a valid property name (`InvalidName`)
    /// - The metadata directory cannot be opened or listed
    /// - Any property file cannot be opened, sized, or fully read
    /// - Any property file exceeds the size cap (`ValueTooLarge`)
    pub fn retrieve<S: AsRef<str>>(
        &self,
        dir: &Path,
        requested: Option<&[S]>,
    ) -> Result<PropertyMap> {
        let base = self.config.base.resolve(dir);

        let result = match requested {
            Some(names) if !names.is_empty() => match self.config.strategy {
                RequestStrategy::ExplicitList => {
                    debug!(dir = %base.display(), count = names.len(), "reading requested properties");
                    self.read_from_list(&base, names)
                }
                RequestStrategy::FilteredScan => {
                    debug!(dir = %base.display(), count = names.len(), "scanning for requested properties");
                    let wanted = names
                        .iter()
                        .map(|n| PropertyName::new(n.as_ref()).map(PropertyName::into_string))
                        .collect::<Result<HashSet<_>>>()?;
                    self.read_directory(&base, &Membership::Only(wanted))
                }
            },
            _ => {
                debug!(dir = %base.display(), "reading all properties");
                self.read_directory(&base, &Membership::All)
            }
        };

        if let Err(e) = &result {
            debug!(dir = %base.display(), error = %e, "property retrieval failed");
        }
        result
    }

    /// Look up a single property, tolerating its absence
    ///
    /// # Returns
    ///
    /// `Ok(None)` if no file exists for `name`.
    ///
    /// # Errors
    ///
    /// Returns `Err(PropError)` if the name is invalid, or if the file exists
    /// but cannot be read in full or exceeds the size cap.
    pub fn get_property(&self, dir: &Path, name: &str) -> Result<Option<PropertyValue>> {
        let name = PropertyName::new(name)?;
        let base = self.config.base.resolve(dir);
        load_property(&base, &name, Requirement::Optional, self.config.max_value_len)
    }

    fn read_from_list<S: AsRef<str>>(&self, base: &Path, names: &[S]) -> Result<PropertyMap> {
        let mut map = PropertyMap::with_capacity(names.len());
        for name in names {
            let name = PropertyName::new(name.as_ref())?;
            let value = load_required(base, &name, self.config.max_value_len)?;
            map.insert(name.into_string(), value);
        }
        Ok(map)
    }

    fn read_directory(&self, base: &Path, membership: &Membership) -> Result<PropertyMap> {
        let entries = fs::read_dir(base).map_err(|source| PropError::DirectoryOpen {
            path: base.to_path_buf(),
            source,
        })?;

        let mut map = PropertyMap::new();
        for entry in entries {
            let entry = entry.map_err(|source| PropError::DirectoryRead {
                path: base.to_path_buf(),
                source,
            })?;
            let file_name = entry.file_name();

            if is_dot_entry(&file_name) {
                trace!(entry = ?file_name, "skipping dot entry");
                continue;
            }
            if !membership.admits(&file_name) {
                trace!(entry = ?file_name, "entry not requested");
                continue;
            }

            let name = PropertyName::from_os_str(&file_name)?;
            let value = load_required(base, &name, self.config.max_value_len)?;
            let previous = map.insert(name.into_string(), value);
            debug_assert!(previous.is_none(), "directory listed an entry twice");
        }
        Ok(map)
    }
}
