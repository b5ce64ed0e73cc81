//! Error types for property retrieval
//!
//! Every failure aborts the whole retrieval call. `PropError` carries the
//! offending path and the underlying OS error where there is one, and
//! [`PropError::category`] gives the coarse classification a host layer
//! maps onto its own exception types.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for property retrieval
pub type Result<T> = std::result::Result<T, PropError>;

/// Errors produced while reading a metadata directory
#[derive(Debug, Error)]
pub enum PropError {
    /// A property file could not be opened (including a required file that is missing)
    #[error("Cannot open property file {}: {source}", .path.display())]
    OpenFailure {
        /// Path of the property file
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// The metadata directory itself could not be opened for listing
    #[error("Couldn't open metadata directory {}: {source}", .path.display())]
    DirectoryOpen {
        /// Path of the metadata directory
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// An entry could not be read while enumerating the metadata directory
    #[error("Error while listing metadata directory {}: {source}", .path.display())]
    DirectoryRead {
        /// Path of the metadata directory
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// The size of an opened property file could not be determined
    #[error("Cannot determine size of property file {}: {source}", .path.display())]
    Stat {
        /// Path of the property file
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// A property entry is not a regular file (a subdirectory, a FIFO, ...)
    #[error("Property entry {} is not a regular file", .path.display())]
    NotAFile {
        /// Path of the entry
        path: PathBuf,
    },

    /// Reading an opened property file failed
    #[error("Error while reading property file {}: {source}", .path.display())]
    Read {
        /// Path of the property file
        path: PathBuf,
        /// Underlying OS error
        source: io::Error,
    },

    /// Fewer bytes were read than the file's reported size
    #[error(
        "Error while reading property file {}: expected {expected} bytes, read {actual}",
        .path.display()
    )]
    ShortRead {
        /// Path of the property file
        path: PathBuf,
        /// Size reported before reading
        expected: u64,
        /// Bytes actually read
        actual: u64,
    },

    /// A property file is larger than the configured cap
    #[error("Property file too big: {} is {size} bytes (limit {limit})", .path.display())]
    ValueTooLarge {
        /// Path of the property file
        path: PathBuf,
        /// Size of the file in bytes
        size: u64,
        /// Maximum accepted size in bytes
        limit: u64,
    },

    /// A property name (or record uid) cannot be used as a bare filename
    #[error("Invalid property name {name:?}: {reason}")]
    InvalidName {
        /// The rejected name, lossily rendered
        name: String,
        /// Why it was rejected
        reason: &'static str,
    },
}

/// Coarse error classification exposed at the host boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Property file could not be opened or read
    Io,
    /// Property value exceeds the size cap
    ValueTooLarge,
    /// Metadata directory could not be opened or listed
    CannotOpenDirectory,
    /// Name is not a valid bare filename
    InvalidName,
}

impl ErrorCategory {
    /// Stable lowercase identifier for this category
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Io => "io-error",
            Self::ValueTooLarge => "value-too-large",
            Self::CannotOpenDirectory => "cannot-open-directory",
            Self::InvalidName => "invalid-name",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PropError {
    /// Classify this error for the host boundary
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::OpenFailure { .. }
            | Self::Stat { .. }
            | Self::NotAFile { .. }
            | Self::Read { .. }
            | Self::ShortRead { .. } => ErrorCategory::Io,
            Self::DirectoryOpen { .. } | Self::DirectoryRead { .. } => {
                ErrorCategory::CannotOpenDirectory
            }
            Self::ValueTooLarge { .. } => ErrorCategory::ValueTooLarge,
            Self::InvalidName { .. } => ErrorCategory::InvalidName,
        }
    }

    /// Path of the file or directory the error refers to, if any
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::OpenFailure { path, .. }
            | Self::DirectoryOpen { path, .. }
            | Self::DirectoryRead { path, .. }
            | Self::Stat { path, .. }
            | Self::NotAFile { path }
            | Self::Read { path, .. }
            | Self::ShortRead { path, .. }
            | Self::ValueTooLarge { path, .. } => Some(path),
            Self::InvalidName { .. } => None,
        }
    }

    /// True if the error was caused by a file or directory that does not exist
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        match self {
            Self::OpenFailure { source, .. } | Self::DirectoryOpen { source, .. } => {
                source.kind() == io::ErrorKind::NotFound
            }
            _ => false,
        }
    }
}
