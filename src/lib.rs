//! # propdir
//!
//! Read path of a filesystem-backed metadata store. Each property of a
//! record is a file in the record's metadata directory; the file name is
//! the property name and the raw file contents are the value.
//!
//! - [`PropertyReader`] retrieves every property of a directory, or an
//!   explicit list of them, as a [`PropertyMap`]. Retrieval is
//!   all-or-nothing.
//! - [`loader`] reads a single property file with the size cap and
//!   empty-file handling.
//! - [`layout`] maps record uids to metadata directories.
//! - [`host`] converts values and errors for a host environment.
//!
//! ## Example
//!
//! ```rust,no_run
//! use propdir::{PropertyReader, PropertyValue, ReaderConfig};
//! use std::path::Path;
//!
//! # fn main() -> propdir::Result<()> {
//! let reader = PropertyReader::new(ReaderConfig::default());
//! let props = reader.retrieve(Path::new("metadata"), Some(&["title"][..]))?;
//! if let Some(PropertyValue::Bytes(title)) = props.get("title") {
//!     println!("{} bytes of title", title.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod host;
pub mod layout;
pub mod loader;
pub mod property;

pub use collector::PropertyReader;
pub use config::{BasePath, ReaderConfig, RequestStrategy};
pub use error::{ErrorCategory, PropError, Result};
pub use host::{HostAdapter, HostError, JsonEncoder, TextEncoder, ValueEncoder};
pub use layout::{DatastoreLayout, MetadataStore};
pub use loader::{load_property, Requirement, MAX_PROPERTY_LENGTH};
pub use property::{PropertyMap, PropertyName, PropertyValue};
