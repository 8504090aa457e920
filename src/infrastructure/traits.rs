//! I/O boundary traits for testability
//!
//! These traits abstract external I/O operations, allowing services
//! to be tested with mock implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::domain::{CompanyProfile, Deal};

/// Filesystem abstraction for testability.
pub trait FileSystem: Send + Sync {
    /// Read file contents to string.
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Write string content to file.
    fn write(&self, path: &Path, content: &str) -> io::Result<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a file.
    fn is_file(&self, path: &Path) -> bool;

    /// Rename/move a file.
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;

    /// Create directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;

    /// Create parent directories if needed.
    fn ensure_parent(&self, path: &Path) -> io::Result<()> {
        match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !self.exists(parent) => {
                self.create_dir_all(parent)
            }
            _ => Ok(()),
        }
    }
}

/// Persistence boundary for the buyer's company profile.
///
/// Stands in for the remote profile API: `load` is the "my profile" fetch
/// (`None` when no profile exists yet), `save` the create-or-update post.
pub trait ProfileStore: Send + Sync {
    fn load(&self) -> io::Result<Option<CompanyProfile>>;

    fn save(&self, profile: &CompanyProfile) -> io::Result<()>;

    /// Where the profile lives, for messages.
    fn location(&self) -> String;
}

/// Persistence boundary for the buyer's deal board.
///
/// Stands in for the deals feed: `load` returns an empty board when nothing
/// has been published yet.
pub trait DealStore: Send + Sync {
    fn load(&self) -> io::Result<Vec<Deal>>;

    fn save(&self, deals: &[Deal]) -> io::Result<()>;

    fn location(&self) -> String;
}

/// Pretty-print `value` to `path` via a sibling temp file and rename, so a
/// crash never leaves a truncated file.
fn write_json_atomic<T: serde::Serialize + ?Sized>(
    fs: &dyn FileSystem,
    path: &Path,
    value: &T,
) -> io::Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs.ensure_parent(path)?;
    let tmp = path.with_extension("json.tmp");
    fs.write(&tmp, &(json + "\n"))?;
    fs.rename(&tmp, path)
}

// ============================================================
// REAL IMPLEMENTATIONS
// ============================================================

/// Real filesystem implementation.
#[derive(Debug, Default)]
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        std::fs::read_to_string(path)
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        std::fs::rename(from, to)
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        std::fs::create_dir_all(path)
    }
}

/// Profile kept as pretty-printed JSON in a single file.
pub struct JsonProfileStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self) -> io::Result<Option<CompanyProfile>> {
        if !self.fs.is_file(&self.path) {
            debug!("no profile at {}", self.path.display());
            return Ok(None);
        }
        let content = self.fs.read_to_string(&self.path)?;
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, profile: &CompanyProfile) -> io::Result<()> {
        write_json_atomic(self.fs.as_ref(), &self.path, profile)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Deal board kept as a JSON array in a single file.
pub struct JsonDealStore {
    fs: Arc<dyn FileSystem>,
    path: PathBuf,
}

impl JsonDealStore {
    pub fn new(fs: Arc<dyn FileSystem>, path: PathBuf) -> Self {
        Self { fs, path }
    }
}

impl DealStore for JsonDealStore {
    fn load(&self) -> io::Result<Vec<Deal>> {
        if !self.fs.is_file(&self.path) {
            debug!("no deals at {}", self.path.display());
            return Ok(Vec::new());
        }
        let content = self.fs.read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save(&self, deals: &[Deal]) -> io::Result<()> {
        write_json_atomic(self.fs.as_ref(), &self.path, deals)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
