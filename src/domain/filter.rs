//! Search projection over a taxonomy.

use std::collections::{HashMap, HashSet};

use generational_arena::Index;
use tracing::{debug, instrument};

use crate::domain::arena::Taxonomy;

impl Taxonomy {
    /// Pruned copy of the tree for display under a search query.
    ///
    /// A node is kept when its name contains `query` (case-insensitive),
    /// when it lies on the path to such a node, or when it sits below one.
    /// A blank query keeps everything. Selection state is not involved:
    /// toggles always go against the unfiltered tree.
    #[instrument(level = "debug", skip(self))]
    pub fn filter(&self, query: &str) -> Taxonomy {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.clone();
        }
        let matches = |name: &str| name.to_lowercase().contains(&needle);

        let mut visible: HashSet<Index> = HashSet::new();
        for (idx, node) in self.iter_postorder() {
            if matches(&node.data.name) || node.children.iter().any(|c| visible.contains(c)) {
                visible.insert(idx);
            }
        }
        for (idx, node) in self.iter() {
            if matches(&node.data.name) {
                visible.extend(self.descendants(idx));
            }
        }

        let mut pruned = Taxonomy::new(self.schema().clone());
        let mut mapping: HashMap<Index, Index> = HashMap::new();
        for (idx, node) in self.iter() {
            if !visible.contains(&idx) {
                continue;
            }
            let parent = node.parent.and_then(|p| mapping.get(&p).copied());
            // Source ids and levels are already valid, so insertion cannot fail
            if let Ok(new_idx) = pruned.insert_node(node.data.clone(), parent) {
                mapping.insert(idx, new_idx);
            }
        }
        debug!("filter '{}': {} of {} nodes", query, pruned.len(), self.len());
        pruned
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::arena::{NodeData, Taxonomy};
    use crate::domain::schema::LevelSchema;

    fn sample() -> Taxonomy {
        let mut t = Taxonomy::new(LevelSchema::industry());
        let it = t
            .insert_node(NodeData::new("45", "Information Technology"), None)
            .unwrap();
        let sw = t
            .insert_node(NodeData::new("4510", "Software & Services"), Some(it))
            .unwrap();
        t.insert_node(NodeData::new("451030", "Software"), Some(sw))
            .unwrap();
        t.insert_node(NodeData::new("451020", "IT Services"), Some(sw))
            .unwrap();
        t.insert_node(NodeData::new("35", "Health Care"), None)
            .unwrap();
        t
    }

    fn names(t: &Taxonomy) -> Vec<String> {
        t.iter().map(|(_, n)| n.data.name.clone()).collect()
    }

    #[test]
    fn given_blank_query_when_filtering_then_returns_full_tree() {
        let t = sample();
        assert_eq!(names(&t.filter("  ")), names(&t));
    }

    #[test]
    fn given_match_on_branch_when_filtering_then_keeps_its_subtree() {
        let t = sample();
        let f = t.filter("software &");
        assert_eq!(
            names(&f),
            vec![
                "Information Technology",
                "Software & Services",
                "Software",
                "IT Services"
            ]
        );
    }

    #[test]
    fn given_no_match_when_filtering_then_returns_empty_tree() {
        let t = sample();
        assert!(t.filter("mining").is_empty());
    }

    #[test]
    fn given_filtered_tree_when_looking_up_ids_then_levels_are_preserved() {
        let t = sample();
        let f = t.filter("it services");
        assert!(f.find(0, "45").is_some());
        assert!(f.find(2, "451020").is_some());
        assert!(f.find(2, "451030").is_none());
    }
}
