//! Service container for dependency injection
//!
//! Wires up all services with their dependencies.

use std::sync::Arc;

use crate::application::services::{DealService, ProfileService, TaxonomyService};
use crate::application::ApplicationResult;
use crate::config::Settings;
use crate::domain::{CriteriaKind, Taxonomy};
use crate::infrastructure::traits::{
    DealStore, FileSystem, JsonDealStore, JsonProfileStore, ProfileStore, RealFileSystem,
};

/// Container holding all application services.
pub struct ServiceContainer {
    /// Application settings
    pub settings: Arc<Settings>,

    /// Filesystem abstraction
    pub fs: Arc<dyn FileSystem>,

    pub taxonomies: TaxonomyService,
    pub profiles: ProfileService,
    pub deals: DealService,
}

impl ServiceContainer {
    /// Create a new service container with real implementations.
    pub fn new(settings: Settings) -> Self {
        let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
        let store = Arc::new(JsonProfileStore::new(fs.clone(), settings.profile_path()));
        let deals = Arc::new(JsonDealStore::new(fs.clone(), settings.deals_path()));
        Self::with_deps(settings, fs, store, deals)
    }

    /// Create a service container with custom dependencies (for testing).
    pub fn with_deps(
        settings: Settings,
        fs: Arc<dyn FileSystem>,
        store: Arc<dyn ProfileStore>,
        deal_store: Arc<dyn DealStore>,
    ) -> Self {
        let settings = Arc::new(settings);
        let taxonomies = TaxonomyService::new(fs.clone());
        let profiles = ProfileService::new(store);
        let deals = DealService::new(deal_store, fs.clone());

        Self {
            settings,
            fs,
            taxonomies,
            profiles,
            deals,
        }
    }

    /// Reference tree for `kind`, `None` while the data file is missing.
    pub fn taxonomy(&self, kind: CriteriaKind) -> ApplicationResult<Option<Taxonomy>> {
        let path = self.settings.taxonomy_path(kind);
        self.taxonomies
            .load_optional(&path, &Settings::default_schema(kind))
    }
}
