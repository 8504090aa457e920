//! Session-owned picker: one taxonomy plus the selection made against it.

use tracing::debug;

use crate::domain::arena::Taxonomy;
use crate::domain::error::DomainResult;
use crate::domain::selection::SelectionState;

/// Which criteria field a picker feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaKind {
    Geography,
    Industry,
}

impl CriteriaKind {
    pub fn label(&self) -> &'static str {
        match self {
            CriteriaKind::Geography => "geography",
            CriteriaKind::Industry => "industry",
        }
    }
}

/// Holds the single selection state of a form session.
///
/// The taxonomy may not be loaded yet; until it is, every operation is a
/// no-op and every query is empty.
#[derive(Debug, Clone, Default)]
pub struct CriteriaPicker {
    taxonomy: Option<Taxonomy>,
    state: SelectionState,
}

impl CriteriaPicker {
    pub fn new(taxonomy: Option<Taxonomy>) -> Self {
        Self {
            taxonomy,
            state: SelectionState::new(),
        }
    }

    pub fn with_labels<S: AsRef<str>>(taxonomy: Option<Taxonomy>, labels: &[S]) -> Self {
        let state = match &taxonomy {
            Some(t) => SelectionState::from_labels(t, labels),
            None => SelectionState::new(),
        };
        Self { taxonomy, state }
    }

    pub fn taxonomy(&self) -> Option<&Taxonomy> {
        self.taxonomy.as_ref()
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn is_loaded(&self) -> bool {
        self.taxonomy.is_some()
    }

    pub fn toggle(&mut self, level: usize, id: &str) -> DomainResult<()> {
        match &self.taxonomy {
            Some(t) => {
                self.state = self.state.toggle(t, level, id)?;
                Ok(())
            }
            None => {
                debug!("toggle ignored, taxonomy not loaded");
                Ok(())
            }
        }
    }

    pub fn remove_label(&mut self, label: &str) {
        if let Some(t) = &self.taxonomy {
            self.state = self.state.remove_label(t, label);
        }
    }

    pub fn add_labels<S: AsRef<str>>(&mut self, labels: &[S]) {
        if let Some(t) = &self.taxonomy {
            self.state = self.state.apply_labels(t, labels);
        }
    }

    pub fn labels(&self) -> Vec<String> {
        self.taxonomy
            .as_ref()
            .map(|t| self.state.flatten(t))
            .unwrap_or_default()
    }

    pub fn filter(&self, query: &str) -> Option<Taxonomy> {
        self.taxonomy.as_ref().map(|t| t.filter(query))
    }
}
