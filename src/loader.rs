//! File value loader
//!
//! Reads a single property file into a [`PropertyValue`], enforcing the
//! size cap and the empty-file special case.

use crate::error::{PropError, Result};
use crate::property::{PropertyName, PropertyValue};
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Largest accepted property value in bytes
pub const MAX_PROPERTY_LENGTH: u64 = 500 * 1024;

/// Whether a missing property file is an error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// The file must exist; a missing file fails with `OpenFailure`
    Required,
    /// A file that cannot be stat'ed is reported as absent
    Optional,
}

/// Load one property value from `base/name`
///
/// The file is opened, sized, and read in full. Zero-length files yield
/// [`PropertyValue::Empty`] without a read. The file handle is released on
/// every return path.
///
/// # Parameters
///
/// * `base` - Metadata directory holding the property files
/// * `name` - Property name (bare filename)
/// * `requirement` - Whether a missing file is an error
/// * `max_len` - Size cap in bytes; larger files are rejected, never truncated
///
/// # Returns
///
/// `Ok(Some(value))` on success, `Ok(None)` only for an optional property
/// whose file does not exist.
///
/// # Errors
///
/// Returns `Err(PropError)` if:
/// - The file cannot be opened (`OpenFailure`)
/// - Its size cannot be determined (`Stat`)
/// - It is not a regular file (`NotAFile`)
/// - It is larger than `max_len` (`ValueTooLarge`)
/// - Reading fails (`Read`) or returns fewer bytes than its size (`ShortRead`)
pub fn load_property(
    base: &Path,
    name: &PropertyName,
    requirement: Requirement,
    max_len: u64,
) -> Result<Option<PropertyValue>> {
    let path = base.join(name);

    if requirement == Requirement::Optional && fs::metadata(&path).is_err() {
        trace!(path = %path.display(), "optional property absent");
        return Ok(None);
    }

    read_value(path, name, max_len).map(Some)
}

/// Load a property that must exist
///
/// Equivalent to [`load_property`] with [`Requirement::Required`], without
/// the `Option` wrapper.
///
/// # Errors
///
/// Same as [`load_property`]; a missing file is an `OpenFailure`.
pub fn load_required(base: &Path, name: &PropertyName, max_len: u64) -> Result<PropertyValue> {
    read_value(base.join(name), name, max_len)
}

fn read_value(path: PathBuf, name: &PropertyName, max_len: u64) -> Result<PropertyValue> {
    let file = File::open(&path).map_err(|source| PropError::OpenFailure {
        path: path.clone(),
        source,
    })?;

    let metadata = file.metadata().map_err(|source| PropError::Stat {
        path: path.clone(),
        source,
    })?;
    if !metadata.is_file() {
        return Err(PropError::NotAFile { path });
    }
    let size = metadata.len();

    if size == 0 {
        debug!(property = %name, "loaded empty property");
        return Ok(PropertyValue::Empty);
    }

    if size > max_len {
        return Err(PropError::ValueTooLarge {
            path,
            size,
            limit: max_len,
        });
    }

    let buf = read_exact_len(&file, &path, size)?;
    debug!(property = %name, size, "loaded property");
    Ok(PropertyValue::Bytes(buf))
}

/// Read exactly `size` bytes from `reader`
///
/// Bytes past `size` are never consumed. Fewer bytes than `size` is a
/// `ShortRead`.
fn read_exact_len<R: Read>(reader: R, path: &Path, size: u64) -> Result<Vec<u8>> {
    let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
    reader
        .take(size)
        .read_to_end(&mut buf)
        .map_err(|source| PropError::Read {
            path: path.to_path_buf(),
            source,
        })?;

    let actual = buf.len() as u64;
    if actual < size {
        return Err(PropError::ShortRead {
            path: path.to_path_buf(),
            expected: size,
            actual,
        });
    }
    Ok(buf)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::error::ErrorCategory;
    use rstest::rstest;
    use tempfile::TempDir;

    fn name(s: &str) -> PropertyName {
        PropertyName::new(s).unwrap()
    }

    #[test]
    fn test_load_small_property() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("title"), b"Hello, World!")?;

        let value = load_property(
            temp_dir.path(),
            &name("title"),
            Requirement::Required,
            MAX_PROPERTY_LENGTH,
        )?;

        assert_eq!(value, Some(PropertyValue::Bytes(b"Hello, World!".to_vec())));
        Ok(())
    }

    #[test]
    fn test_load_empty_property() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        File::create(temp_dir.path().join("keep"))?;

        let value = load_property(
            temp_dir.path(),
            &name("keep"),
            Requirement::Required,
            MAX_PROPERTY_LENGTH,
        )?;

        assert_eq!(value, Some(PropertyValue::Empty));
        Ok(())
    }

    #[test]
    fn test_load_binary_property() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        let data: Vec<u8> = (0..=255).collect();
        fs::write(temp_dir.path().join("preview"), &data)?;

        let value = load_property(
            temp_dir.path(),
            &name("preview"),
            Requirement::Required,
            MAX_PROPERTY_LENGTH,
        )?;

        assert_eq!(value.map(PropertyValue::into_bytes), Some(data));
        Ok(())
    }

    #[rstest]
    #[case(MAX_PROPERTY_LENGTH - 1, true)]
    #[case(MAX_PROPERTY_LENGTH, true)]
    #[case(MAX_PROPERTY_LENGTH + 1, false)]
    fn test_size_cap_boundary(#[case] size: u64, #[case] accepted: bool) -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(
            temp_dir.path().join("big"),
            vec![0x42u8; usize::try_from(size)?],
        )?;

        let result = load_property(
            temp_dir.path(),
            &name("big"),
            Requirement::Required,
            MAX_PROPERTY_LENGTH,
        );

        if accepted {
            assert_eq!(result?.map(|v| v.len() as u64), Some(size));
        } else {
            let err = result.unwrap_err();
            assert_eq!(err.category(), ErrorCategory::ValueTooLarge);
            assert!(matches!(
                err,
                PropError::ValueTooLarge { size: s, limit: MAX_PROPERTY_LENGTH, .. } if s == size
            ));
        }
        Ok(())
    }

    #[test]
    fn test_custom_cap() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("v"), b"12345")?;

        let err = load_property(temp_dir.path(), &name("v"), Requirement::Required, 4)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ValueTooLarge);
        Ok(())
    }

    #[test]
    fn test_required_missing_property_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;

        let err = load_property(
            temp_dir.path(),
            &name("missing"),
            Requirement::Required,
            MAX_PROPERTY_LENGTH,
        )
        .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.path(), Some(temp_dir.path().join("missing").as_path()));
        Ok(())
    }

    #[test]
    fn test_optional_missing_property_is_absent() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;

        let value = load_property(
            temp_dir.path(),
            &name("missing"),
            Requirement::Optional,
            MAX_PROPERTY_LENGTH,
        )?;

        assert_eq!(value, None);
        Ok(())
    }

    #[test]
    fn test_optional_present_property_is_loaded() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("uid"), b"abc")?;

        let value = load_property(
            temp_dir.path(),
            &name("uid"),
            Requirement::Optional,
            MAX_PROPERTY_LENGTH,
        )?;

        assert_eq!(value, Some(PropertyValue::Bytes(b"abc".to_vec())));
        Ok(())
    }

    #[test]
    fn test_load_required_unwrapped() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("title"), b"x")?;

        let value = load_required(temp_dir.path(), &name("title"), MAX_PROPERTY_LENGTH)?;
        assert_eq!(value, PropertyValue::Bytes(b"x".to_vec()));

        let err = load_required(temp_dir.path(), &name("other"), MAX_PROPERTY_LENGTH).unwrap_err();
        assert!(err.is_not_found());
        Ok(())
    }

    #[test]
    fn test_optional_oversize_still_fails() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::write(temp_dir.path().join("big"), b"too long")?;

        let err = load_property(temp_dir.path(), &name("big"), Requirement::Optional, 2)
            .unwrap_err();
        assert_eq!(err.category(), ErrorCategory::ValueTooLarge);
        Ok(())
    }

    /// Hands out at most `chunk` bytes per call, then fails after `fail_after`
    struct FlakyReader {
        data: Vec<u8>,
        pos: usize,
        fail_after: Option<usize>,
    }

    impl Read for FlakyReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.fail_after.is_some_and(|n| self.pos >= n) {
                return Err(std::io::Error::other("device gone"));
            }
            let n = buf.len().min(self.data.len() - self.pos).min(3);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_read_exact_len_short_read() {
        let reader = FlakyReader {
            data: b"abcd".to_vec(),
            pos: 0,
            fail_after: None,
        };

        let err = read_exact_len(reader, Path::new("meta/title"), 10).unwrap_err();

        assert!(matches!(
            err,
            PropError::ShortRead { expected: 10, actual: 4, .. }
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        assert_eq!(err.path(), Some(Path::new("meta/title")));
    }

    #[test]
    fn test_read_exact_len_read_error() {
        let reader = FlakyReader {
            data: b"abcdefgh".to_vec(),
            pos: 0,
            fail_after: Some(3),
        };

        let err = read_exact_len(reader, Path::new("meta/preview"), 8).unwrap_err();

        assert!(matches!(err, PropError::Read { .. }));
        assert_eq!(err.category(), ErrorCategory::Io);
    }

    #[test]
    fn test_read_exact_len_stops_at_size() -> anyhow::Result<()> {
        let reader = FlakyReader {
            data: b"abcdefgh".to_vec(),
            pos: 0,
            fail_after: None,
        };

        let buf = read_exact_len(reader, Path::new("meta/title"), 5)?;
        assert_eq!(buf, b"abcde");
        Ok(())
    }

    #[test]
    fn test_directory_is_not_a_property() -> anyhow::Result<()> {
        let temp_dir = TempDir::new()?;
        fs::create_dir(temp_dir.path().join("nested"))?;

        let err = load_required(temp_dir.path(), &name("nested"), MAX_PROPERTY_LENGTH)
            .unwrap_err();

        // Platforms that refuse to open a directory report OpenFailure instead
        assert!(matches!(
            err,
            PropError::NotAFile { .. } | PropError::OpenFailure { .. }
        ));
        assert_eq!(err.category(), ErrorCategory::Io);
        Ok(())
    }
}
