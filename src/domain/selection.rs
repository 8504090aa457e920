//! Hierarchical selection state and the reconciliation engine.
//!
//! Every mutation keeps two properties over the taxonomy:
//! - a selected node has all of its descendants selected
//! - a node with children is selected iff all of its direct children are
//!
//! Nodes without children are authoritative: their flag is only ever set
//! directly (by a toggle on them or a cascade from an ancestor), never
//! recomputed.
//!
//! Operations are pure: they return a new [`SelectionState`] and leave the
//! receiver untouched.

use std::collections::BTreeMap;

use generational_arena::Index;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::domain::arena::Taxonomy;
use crate::domain::error::{DomainError, DomainResult};

/// Per-level selection flags keyed by node id. Absent means unselected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    levels: Vec<BTreeMap<String, bool>>,
}

/// Display state of a checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Checked,
    /// Unselected, but some descendant is selected
    Partial,
    Unchecked,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_selected(&self, level: usize, id: &str) -> bool {
        self.levels
            .get(level)
            .and_then(|m| m.get(id))
            .copied()
            .unwrap_or(false)
    }

    pub fn is_node_selected(&self, taxonomy: &Taxonomy, idx: Index) -> bool {
        taxonomy
            .get_node(idx)
            .map(|n| self.is_selected(n.level, &n.data.id))
            .unwrap_or(false)
    }

    /// Number of nodes marked selected on `level`.
    pub fn selected_count(&self, level: usize) -> usize {
        self.levels
            .get(level)
            .map(|m| m.values().filter(|&&v| v).count())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(|m| m.values().all(|&v| !v))
    }

    fn set(&mut self, level: usize, id: &str, value: bool) {
        if self.levels.len() <= level {
            self.levels.resize_with(level + 1, BTreeMap::new);
        }
        self.levels[level].insert(id.to_string(), value);
    }

    fn set_node(&mut self, taxonomy: &Taxonomy, idx: Index, value: bool) {
        if let Some(node) = taxonomy.get_node(idx) {
            self.set(node.level, &node.data.id, value);
        }
    }

    /// Flip one node, cascade the new value to its subtree and reconcile its
    /// ancestors bottom-up.
    ///
    /// Fails with [`DomainError::NodeNotFound`] if `(level, id)` is not in the
    /// taxonomy; the receiver is never modified.
    #[instrument(level = "debug", skip(self, taxonomy))]
    pub fn toggle(&self, taxonomy: &Taxonomy, level: usize, id: &str) -> DomainResult<Self> {
        let idx = taxonomy
            .find(level, id)
            .ok_or_else(|| DomainError::NodeNotFound {
                level,
                id: id.to_string(),
            })?;
        let value = !self.is_node_selected(taxonomy, idx);
        let mut next = self.clone();
        next.assign(taxonomy, idx, value);
        debug!("toggled {}:{} -> {}", level, id, value);
        Ok(next)
    }

    fn assign(&mut self, taxonomy: &Taxonomy, idx: Index, value: bool) {
        self.set_node(taxonomy, idx, value);
        self.cascade(taxonomy, idx, value);
        self.reconcile_ancestors(taxonomy, &taxonomy.ancestors(idx));
    }

    fn cascade(&mut self, taxonomy: &Taxonomy, idx: Index, value: bool) {
        for descendant in taxonomy.descendants(idx) {
            self.set_node(taxonomy, descendant, value);
        }
    }

    /// Recompute each ancestor from its children, immediate parent first.
    ///
    /// `chain` is ordered root first, as returned by [`Taxonomy::ancestors`].
    fn reconcile_ancestors(&mut self, taxonomy: &Taxonomy, chain: &[Index]) {
        for &ancestor in chain.iter().rev() {
            let Some(node) = taxonomy.get_node(ancestor) else {
                continue;
            };
            if node.is_leaf() {
                continue;
            }
            let all = node
                .children
                .iter()
                .all(|&c| self.is_node_selected(taxonomy, c));
            self.set(node.level, &node.data.id, all);
        }
    }

    /// Minimal label list: the shallowest selected node on every selected
    /// path, in tree order.
    #[instrument(level = "debug", skip_all)]
    pub fn flatten(&self, taxonomy: &Taxonomy) -> Vec<String> {
        let mut labels = Vec::new();
        let mut stack: Vec<Index> = taxonomy.roots().iter().rev().copied().collect();

        while let Some(idx) = stack.pop() {
            let Some(node) = taxonomy.get_node(idx) else {
                continue;
            };
            if self.is_selected(node.level, &node.data.id) {
                labels.push(node.data.name.clone());
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        labels
    }

    /// Deselect the first node named `label` together with its subtree and
    /// reconcile its ancestors. Unknown labels leave the state unchanged.
    #[instrument(level = "debug", skip(self, taxonomy))]
    pub fn remove_label(&self, taxonomy: &Taxonomy, label: &str) -> Self {
        match taxonomy.find_by_name(label) {
            Some(idx) => {
                let mut next = self.clone();
                next.assign(taxonomy, idx, false);
                next
            }
            None => {
                debug!("remove: no node named '{}'", label);
                self.clone()
            }
        }
    }

    /// Select every node named in `labels` as if the user had toggled it on.
    ///
    /// Labels that match no node (stale reference data) are skipped.
    #[instrument(level = "debug", skip_all, fields(count = labels.len()))]
    pub fn apply_labels<S: AsRef<str>>(&self, taxonomy: &Taxonomy, labels: &[S]) -> Self {
        let mut next = self.clone();
        for label in labels {
            let label = label.as_ref();
            match taxonomy.find_by_name(label) {
                Some(idx) => next.assign(taxonomy, idx, true),
                None => warn!("skipping saved label not in taxonomy: '{}'", label),
            }
        }
        next
    }

    /// Fresh state populated from a previously saved label list.
    pub fn from_labels<S: AsRef<str>>(taxonomy: &Taxonomy, labels: &[S]) -> Self {
        Self::new().apply_labels(taxonomy, labels)
    }

    /// Checkbox state for rendering `idx`.
    pub fn check_state(&self, taxonomy: &Taxonomy, idx: Index) -> CheckState {
        if self.is_node_selected(taxonomy, idx) {
            CheckState::Checked
        } else if taxonomy
            .descendants(idx)
            .into_iter()
            .any(|d| self.is_node_selected(taxonomy, d))
        {
            CheckState::Partial
        } else {
            CheckState::Unchecked
        }
    }
}

/// Labels from `labels` that match no node in `taxonomy`.
pub fn unmatched_labels<S: AsRef<str>>(taxonomy: &Taxonomy, labels: &[S]) -> Vec<String> {
    labels
        .iter()
        .map(AsRef::as_ref)
        .filter(|l| taxonomy.find_by_name(l).is_none())
        .map(str::to_string)
        .collect()
}
