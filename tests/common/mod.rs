//! Shared fixtures for integration tests

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A uid-length record id for datastore layout tests
#[allow(dead_code)]
pub const UID: &str = "7f3c9a10-5b2e-4d1a-9c44-0123456789ab";

/// A temporary metadata directory populated with property files
#[allow(dead_code)]
pub struct PropertyDir {
    dir: TempDir,
}

#[allow(dead_code)]
impl PropertyDir {
    /// Create a directory containing `props` as `(name, contents)` pairs
    pub fn with(props: &[(&str, &[u8])]) -> std::io::Result<Self> {
        let dir = TempDir::new()?;
        write_props(dir.path(), props)?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn join(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

/// Write each `(name, contents)` pair as a file in `dir`
pub fn write_props(dir: &Path, props: &[(&str, &[u8])]) -> std::io::Result<()> {
    for (name, value) in props {
        fs::write(dir.join(name), value)?;
    }
    Ok(())
}

/// Create `<root>/<uid[..2]>/<uid>/metadata` holding `props`
#[allow(dead_code)]
pub fn record_in_store(root: &Path, uid: &str, props: &[(&str, &[u8])]) -> std::io::Result<PathBuf> {
    let meta = root.join(&uid[..2]).join(uid).join("metadata");
    fs::create_dir_all(&meta)?;
    write_props(&meta, props)?;
    Ok(meta)
}
