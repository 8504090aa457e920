//! Company profile service
//!
//! Loads the saved profile, bridges its flat criteria labels to pickers and
//! back, and submits the finished profile.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::application::{ApplicationResult, IoResultExt};
use crate::config::SessionConfig;
use crate::domain::{unmatched_labels, CompanyProfile, CriteriaKind, CriteriaPicker, Taxonomy};
use crate::infrastructure::traits::ProfileStore;

/// Service for reading, editing and submitting the company profile.
pub struct ProfileService {
    store: Arc<dyn ProfileStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn ProfileStore>) -> Self {
        Self { store }
    }

    /// The saved profile, or an empty form when none exists yet.
    pub fn load(&self) -> ApplicationResult<CompanyProfile> {
        let profile = self
            .store
            .load()
            .with_context(format!("load profile: {}", self.store.location()))?;
        Ok(profile.unwrap_or_else(|| {
            debug!("no existing profile, starting with an empty form");
            CompanyProfile::default()
        }))
    }

    pub fn save(&self, profile: &CompanyProfile) -> ApplicationResult<()> {
        self.store
            .save(profile)
            .with_context(format!("save profile: {}", self.store.location()))
    }

    /// Picker whose selection is re-derived from the profile's saved labels.
    #[instrument(level = "debug", skip(self, profile, taxonomy))]
    pub fn open_picker(
        &self,
        kind: CriteriaKind,
        profile: &CompanyProfile,
        taxonomy: Option<Taxonomy>,
    ) -> CriteriaPicker {
        let labels = profile.target_criteria.labels(kind);
        if let Some(t) = &taxonomy {
            let stale = unmatched_labels(t, labels);
            if !stale.is_empty() {
                warn!("{} labels not in taxonomy: {:?}", kind.label(), stale);
            }
        }
        CriteriaPicker::with_labels(taxonomy, labels)
    }

    /// Write the picker's flattened labels into the profile.
    ///
    /// An unloaded picker leaves the saved labels alone.
    pub fn commit(&self, kind: CriteriaKind, picker: &CriteriaPicker, profile: &mut CompanyProfile) {
        if !picker.is_loaded() {
            debug!("{} taxonomy not loaded, keeping saved labels", kind.label());
            return;
        }
        profile.target_criteria.set_labels(kind, picker.labels());
    }

    /// Validate and persist the profile on behalf of the session's buyer.
    #[instrument(level = "debug", skip_all)]
    pub fn submit(
        &self,
        session: &SessionConfig,
        profile: &CompanyProfile,
    ) -> ApplicationResult<CompanyProfile> {
        session.require_auth()?;
        profile.validate()?;

        let mut submitted = profile.clone();
        submitted.buyer = session.user_id.clone().or(submitted.buyer);
        self.save(&submitted)?;
        info!(
            "submitted profile to {} with token {}",
            self.store.location(),
            session.redacted_token()
        );
        Ok(submitted)
    }
}
