//! Property names and values
//!
//! A property is one named value of a metadata record, stored as a single
//! file whose name is the property name and whose contents are the value.

use crate::error::{PropError, Result};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::fmt;

/// Mapping from property name to value, built fresh for every retrieval
pub type PropertyMap = HashMap<String, PropertyValue>;

/// A validated property name
///
/// A property name is used directly as a filename inside the metadata
/// directory, so it must be a bare filename: non-empty, not `.` or `..`,
/// and free of path separators and NUL bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyName(String);

impl PropertyName {
    /// Validate a name supplied by a caller
    ///
    /// # Errors
    ///
    /// Returns `PropError::InvalidName` if the name is empty, is `.` or `..`,
    /// or contains `/` or a NUL byte.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if let Some(reason) = invalid_reason(&name) {
            return Err(PropError::InvalidName { name, reason });
        }
        Ok(Self(name))
    }

    /// Validate a name taken from a directory listing
    ///
    /// # Errors
    ///
    /// Returns `PropError::InvalidName` if the name is not valid UTF-8 or
    /// fails the checks of [`PropertyName::new`].
    pub fn from_os_str(name: &OsStr) -> Result<Self> {
        match name.to_str() {
            Some(s) => Self::new(s),
            None => Err(PropError::InvalidName {
                name: name.to_string_lossy().into_owned(),
                reason: "not valid UTF-8",
            }),
        }
    }

    /// Borrow the name as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the name, returning the inner string
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for PropertyName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl AsRef<std::path::Path> for PropertyName {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.0)
    }
}

impl fmt::Display for PropertyName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// True for the two directory entries that never name a property
#[must_use]
pub fn is_dot_entry(name: &OsStr) -> bool {
    name == OsStr::new(".") || name == OsStr::new("..")
}

fn invalid_reason(name: &str) -> Option<&'static str> {
    if name.is_empty() {
        Some("empty name")
    } else if name == "." || name == ".." {
        Some("reserved directory entry")
    } else if name.contains('/') || name.contains(std::path::MAIN_SEPARATOR) {
        Some("contains a path separator")
    } else if name.contains('\0') {
        Some("contains a NUL byte")
    } else {
        None
    }
}

/// The value of one property
///
/// Values are opaque bytes. A zero-length file yields `Empty` rather than
/// `Bytes(vec![])`; hosts that distinguish an empty string from an empty
/// binary buffer rely on this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    /// Zero-length value
    Empty,
    /// Raw file contents, at least one byte
    Bytes(Vec<u8>),
}

impl PropertyValue {
    /// Wrap bytes read from a property file
    #[must_use]
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        if bytes.is_empty() {
            Self::Empty
        } else {
            Self::Bytes(bytes)
        }
    }

    /// Borrow the raw bytes (empty slice for `Empty`)
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Bytes(bytes) => bytes,
        }
    }

    /// Length of the value in bytes
    #[must_use]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    /// True for the distinguished empty value
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Consume the value, returning its bytes
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            Self::Empty => Vec::new(),
            Self::Bytes(bytes) => bytes,
        }
    }
}
