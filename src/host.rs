//! Host boundary
//!
//! The collector produces host-agnostic [`PropertyValue`]s. A host (a
//! scripting runtime, the CLI, a service layer) supplies a [`ValueEncoder`]
//! when it builds its [`HostAdapter`], and the adapter converts each value
//! into the host's own representation. Errors cross the boundary as
//! [`HostError`], which keeps the category and offending path inspectable.

use crate::collector::PropertyReader;
use crate::error::{ErrorCategory, PropError};
use crate::property::PropertyValue;
use base64::Engine;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Converts property values into a host's value type
pub trait ValueEncoder {
    /// Host representation of a property value
    type Value;

    /// Encode the distinguished empty value
    fn empty(&self) -> Self::Value;

    /// Encode a non-empty binary value
    fn bytes(&self, bytes: Vec<u8>) -> Self::Value;

    /// Encode any property value
    fn encode(&self, value: PropertyValue) -> Self::Value {
        match value {
            PropertyValue::Empty => self.empty(),
            PropertyValue::Bytes(bytes) => self.bytes(bytes),
        }
    }
}

/// Error surfaced to a host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostError {
    /// Coarse classification
    pub category: ErrorCategory,
    /// Offending file or directory, where there is one
    pub path: Option<PathBuf>,
    /// Human-readable message
    pub message: String,
}

impl From<PropError> for HostError {
    fn from(err: PropError) -> Self {
        Self {
            category: err.category(),
            path: err.path().map(Path::to_path_buf),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl std::error::Error for HostError {}

/// Entry point a host calls to retrieve properties
#[derive(Debug, Clone)]
pub struct HostAdapter<E> {
    reader: PropertyReader,
    encoder: E,
}

impl<E: ValueEncoder> HostAdapter<E> {
    /// Bind a reader to the host's value encoder
    #[must_use]
    pub const fn new(reader: PropertyReader, encoder: E) -> Self {
        Self { reader, encoder }
    }

    /// The underlying reader
    #[must_use]
    pub const fn reader(&self) -> &PropertyReader {
        &self.reader
    }

    /// Retrieve properties and encode them for the host
    ///
    /// # Errors
    ///
    /// Returns `Err(HostError)` carrying the category and message of the
    /// underlying [`PropError`].
    pub fn retrieve<S: AsRef<str>>(
        &self,
        dir: &Path,
        requested: Option<&[S]>,
    ) -> Result<HashMap<String, E::Value>, HostError> {
        let map = self.reader.retrieve(dir, requested)?;
        Ok(map
            .into_iter()
            .map(|(name, value)| (name, self.encoder.encode(value)))
            .collect())
    }

    /// Look up one property and encode it for the host
    ///
    /// # Errors
    ///
    /// Returns `Err(HostError)` if the property exists but cannot be read.
    pub fn get_property(&self, dir: &Path, name: &str) -> Result<Option<E::Value>, HostError> {
        Ok(self
            .reader
            .get_property(dir, name)?
            .map(|value| self.encoder.encode(value)))
    }
}

/// Renders values for a terminal
///
/// Empty values become an empty string; bytes are shown with non-printable
/// and non-ASCII bytes escaped, so binary values print unambiguously.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextEncoder;

impl ValueEncoder for TextEncoder {
    type Value = String;

    fn empty(&self) -> String {
        String::new()
    }

    fn bytes(&self, bytes: Vec<u8>) -> String {
        bytes.escape_ascii().to_string()
    }
}

/// Encodes values as JSON
///
/// Empty values become `""`; bytes become `{"base64": "..."}` so a consumer
/// can tell them apart and recover the exact contents.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonEncoder;

impl ValueEncoder for JsonEncoder {
    type Value = serde_json::Value;

    fn empty(&self) -> serde_json::Value {
        serde_json::Value::String(String::new())
    }

    fn bytes(&self, bytes: Vec<u8>) -> serde_json::Value {
        serde_json::json!({
            "base64": base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }
}
