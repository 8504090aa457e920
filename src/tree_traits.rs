//! termtree rendering of a taxonomy with checkbox marks.

use generational_arena::Index;
use termtree::Tree;

use crate::domain::{CheckState, SelectionState, Taxonomy};

pub trait TaxonomyConvert {
    /// Render under a single root titled `title`; every node shows its
    /// check state, name and id.
    fn to_tree_string(&self, state: &SelectionState, title: &str) -> Tree<String>;
}

fn mark(check: CheckState) -> &'static str {
    match check {
        CheckState::Checked => "[x]",
        CheckState::Partial => "[-]",
        CheckState::Unchecked => "[ ]",
    }
}

impl TaxonomyConvert for Taxonomy {
    fn to_tree_string(&self, state: &SelectionState, title: &str) -> Tree<String> {
        fn build(taxonomy: &Taxonomy, state: &SelectionState, idx: Index) -> Option<Tree<String>> {
            let node = taxonomy.get_node(idx)?;
            let label = format!(
                "{} {} ({})",
                mark(state.check_state(taxonomy, idx)),
                node.data.name,
                node.data.id
            );
            let leaves: Vec<_> = node
                .children
                .iter()
                .filter_map(|&c| build(taxonomy, state, c))
                .collect();
            Some(Tree::new(label).with_leaves(leaves))
        }

        let leaves: Vec<_> = self
            .roots()
            .iter()
            .filter_map(|&r| build(self, state, r))
            .collect();
        Tree::new(title.to_string()).with_leaves(leaves)
    }
}
