//! Taxonomy reference data service
//!
//! Loads geography/industry classification trees from JSON files.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt};
use crate::domain::{BuildError, LevelSchema, Taxonomy, TaxonomyBuilder};
use crate::infrastructure::traits::FileSystem;

/// Service for reading taxonomy reference data.
pub struct TaxonomyService {
    fs: Arc<dyn FileSystem>,
}

impl TaxonomyService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Load a taxonomy; `fallback` names the levels when the file does not.
    #[instrument(level = "debug", skip(self, fallback))]
    pub fn load(&self, path: &Path, fallback: &LevelSchema) -> ApplicationResult<Taxonomy> {
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read taxonomy", path)?;
        TaxonomyBuilder::from_json(&content, fallback).map_err(|e| match e {
            BuildError::Parse(e) => ApplicationError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            },
            BuildError::Domain(e) => ApplicationError::Domain(e),
        })
    }

    /// Like [`load`](Self::load), but a missing file means "not available"
    /// rather than an error.
    pub fn load_optional(
        &self,
        path: &Path,
        fallback: &LevelSchema,
    ) -> ApplicationResult<Option<Taxonomy>> {
        if !self.fs.exists(path) {
            debug!("taxonomy not available: {}", path.display());
            return Ok(None);
        }
        self.load(path, fallback).map(Some)
    }
}
