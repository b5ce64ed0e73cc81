//! Reader configuration
//!
//! The two historical deployments of the metadata reader differ only in
//! where the property files live relative to the caller's directory and
//! in how a request list selects entries. Both are expressed here as
//! configuration of a single [`PropertyReader`](crate::PropertyReader).

use crate::loader::MAX_PROPERTY_LENGTH;
use std::borrow::Cow;
use std::path::Path;

/// Name of the subdirectory holding property files in the older layout
pub const METADATA_SUBDIR: &str = "metadata";

/// How the caller's directory maps to the directory holding property files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BasePath {
    /// Property files live directly in the given directory
    #[default]
    Direct,
    /// Property files live in a `metadata` subdirectory of the given directory
    MetadataSubdir,
}

impl BasePath {
    /// Resolve the directory that holds the property files
    #[must_use]
    pub fn resolve<'a>(&self, dir: &'a Path) -> Cow<'a, Path> {
        match self {
            Self::Direct => Cow::Borrowed(dir),
            Self::MetadataSubdir => Cow::Owned(dir.join(METADATA_SUBDIR)),
        }
    }
}

/// How a non-empty request list selects properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestStrategy {
    /// Load each requested name directly; every one must exist
    #[default]
    ExplicitList,
    /// List the directory and keep entries named in the request;
    /// requested names with no file are left out of the result
    FilteredScan,
}

/// Configuration for a [`PropertyReader`](crate::PropertyReader)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// Base path resolution
    pub base: BasePath,
    /// Request list handling
    pub strategy: RequestStrategy,
    /// Size cap for a single value, in bytes
    pub max_value_len: u64,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            base: BasePath::Direct,
            strategy: RequestStrategy::ExplicitList,
            max_value_len: MAX_PROPERTY_LENGTH,
        }
    }
}

impl ReaderConfig {
    /// Set the base path resolution
    #[must_use]
    pub const fn with_base(mut self, base: BasePath) -> Self {
        self.base = base;
        self
    }

    /// Set the request list strategy
    #[must_use]
    pub const fn with_strategy(mut self, strategy: RequestStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the per-value size cap
    #[must_use]
    pub const fn with_max_value_len(mut self, max_value_len: u64) -> Self {
        self.max_value_len = max_value_len;
        self
    }
}
