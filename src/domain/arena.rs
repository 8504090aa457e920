use std::collections::HashMap;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::schema::LevelSchema;

/// Data payload for taxonomy nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeData {
    /// Identifier, unique within the node's level
    pub id: String,
    /// Display label; also the value written into the flattened selection
    pub name: String,
}

impl NodeData {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for NodeData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Tree node in the arena-based taxonomy.
#[derive(Debug, Clone)]
pub struct TaxonomyNode {
    pub data: NodeData,
    /// Zero-based depth; roots are level 0
    pub level: usize,
    /// Index of parent node in the arena, None for root nodes
    pub parent: Option<Index>,
    /// Indices of child nodes in insertion order
    pub children: Vec<Index>,
}

impl TaxonomyNode {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Arena-based classification tree (geography, industry, ...).
///
/// Holds an ordered forest: several roots, each with ordered children.
/// Nodes are addressed by arena [`Index`] internally and by `(level, id)`
/// from the outside.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    schema: LevelSchema,
    arena: Arena<TaxonomyNode>,
    roots: Vec<Index>,
    /// Per-level id lookup
    ids: Vec<HashMap<String, Index>>,
}

impl Taxonomy {
    pub fn new(schema: LevelSchema) -> Self {
        let ids = vec![HashMap::new(); schema.depth()];
        Self {
            schema,
            arena: Arena::new(),
            roots: Vec::new(),
            ids,
        }
    }

    pub fn schema(&self) -> &LevelSchema {
        &self.schema
    }

    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> DomainResult<Index> {
        if data.id.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "id" });
        }
        if data.name.trim().is_empty() {
            return Err(DomainError::EmptyField { field: "name" });
        }
        let level = match parent {
            Some(p) => {
                self.get_node(p)
                    .ok_or_else(|| DomainError::NodeNotFound {
                        level: 0,
                        id: format!("{p:?}"),
                    })?
                    .level
                    + 1
            }
            None => 0,
        };
        if level >= self.schema.depth() {
            return Err(DomainError::LevelOutOfRange {
                id: data.id,
                level,
                depth: self.schema.depth(),
            });
        }
        if self.ids[level].contains_key(&data.id) {
            return Err(DomainError::DuplicateId { level, id: data.id });
        }

        let id = data.id.clone();
        let node_idx = self.arena.insert(TaxonomyNode {
            data,
            level,
            parent,
            children: Vec::new(),
        });
        self.ids[level].insert(id, node_idx);

        match parent {
            Some(parent_idx) => {
                if let Some(parent) = self.arena.get_mut(parent_idx) {
                    parent.children.push(node_idx);
                }
            }
            None => self.roots.push(node_idx),
        }

        Ok(node_idx)
    }

    pub fn get_node(&self, idx: Index) -> Option<&TaxonomyNode> {
        self.arena.get(idx)
    }

    pub fn roots(&self) -> &[Index] {
        &self.roots
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Look up a node by its level-scoped id.
    pub fn find(&self, level: usize, id: &str) -> Option<Index> {
        self.ids.get(level).and_then(|m| m.get(id)).copied()
    }

    /// First node in pre-order whose name equals `label`.
    ///
    /// Names are not guaranteed unique; the earliest node wins.
    #[instrument(level = "trace", skip(self))]
    pub fn find_by_name(&self, label: &str) -> Option<Index> {
        self.iter()
            .find(|(_, node)| node.data.name == label)
            .map(|(idx, _)| idx)
    }

    /// Ancestors of `idx` ordered from the root down to the immediate parent.
    pub fn ancestors(&self, idx: Index) -> Vec<Index> {
        let mut chain = Vec::new();
        let mut current = self.get_node(idx).and_then(|n| n.parent);
        while let Some(p) = current {
            chain.push(p);
            current = self.get_node(p).and_then(|n| n.parent);
        }
        chain.reverse();
        chain
    }

    /// All descendants of `idx` in pre-order, excluding `idx` itself.
    pub fn descendants(&self, idx: Index) -> Vec<Index> {
        let mut result = Vec::new();
        let mut stack: Vec<Index> = match self.get_node(idx) {
            Some(node) => node.children.iter().rev().copied().collect(),
            None => return result,
        };
        while let Some(current) = stack.pop() {
            if let Some(node) = self.get_node(current) {
                result.push(current);
                stack.extend(node.children.iter().rev());
            }
        }
        result
    }

    pub fn iter(&self) -> TreeIterator<'_> {
        TreeIterator::new(self)
    }

    pub fn iter_postorder(&self) -> PostOrderIterator<'_> {
        PostOrderIterator::new(self)
    }
}

/// Pre-order traversal over all roots, children left to right.
pub struct TreeIterator<'a> {
    taxonomy: &'a Taxonomy,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(taxonomy: &'a Taxonomy) -> Self {
        let stack = taxonomy.roots.iter().rev().copied().collect();
        Self { taxonomy, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a TaxonomyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.taxonomy.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

/// Post-order traversal: every node is yielded after all of its children.
pub struct PostOrderIterator<'a> {
    taxonomy: &'a Taxonomy,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(taxonomy: &'a Taxonomy) -> Self {
        let stack = taxonomy.roots.iter().rev().map(|&r| (r, false)).collect();
        Self { taxonomy, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a TaxonomyNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.taxonomy.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // europe
    // ├── western (region)
    // │   └── benelux
    // └── nordics
    // asia
    fn sample() -> Taxonomy {
        let mut t = Taxonomy::new(LevelSchema::geography());
        let eu = t.insert_node(NodeData::new("eu", "Europe"), None).unwrap();
        let we = t
            .insert_node(NodeData::new("we", "Western Europe"), Some(eu))
            .unwrap();
        t.insert_node(NodeData::new("bnl", "Benelux"), Some(we))
            .unwrap();
        t.insert_node(NodeData::new("nd", "Nordics"), Some(eu))
            .unwrap();
        t.insert_node(NodeData::new("as", "Asia"), None).unwrap();
        t
    }

    #[test]
    fn given_forest_when_iterating_then_yields_preorder() {
        let t = sample();
        let names: Vec<_> = t.iter().map(|(_, n)| n.data.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Europe", "Western Europe", "Benelux", "Nordics", "Asia"]
        );
    }

    #[test]
    fn given_forest_when_iterating_postorder_then_children_come_first() {
        let t = sample();
        let names: Vec<_> = t
            .iter_postorder()
            .map(|(_, n)| n.data.name.as_str())
            .collect();
        assert_eq!(
            names,
            vec!["Benelux", "Western Europe", "Nordics", "Europe", "Asia"]
        );
    }

    #[test]
    fn given_nested_node_when_getting_ancestors_then_returns_root_first() {
        let t = sample();
        let bnl = t.find(2, "bnl").unwrap();
        let chain: Vec<_> = t
            .ancestors(bnl)
            .into_iter()
            .map(|i| t.get_node(i).unwrap().data.id.clone())
            .collect();
        assert_eq!(chain, vec!["eu", "we"]);
    }

    #[test]
    fn given_root_when_getting_descendants_then_returns_subtree_in_order() {
        let t = sample();
        let eu = t.find(0, "eu").unwrap();
        let ids: Vec<_> = t
            .descendants(eu)
            .into_iter()
            .map(|i| t.get_node(i).unwrap().data.id.clone())
            .collect();
        assert_eq!(ids, vec!["we", "bnl", "nd"]);
    }

    #[test]
    fn given_duplicate_id_on_same_level_when_inserting_then_errors() {
        let mut t = sample();
        let result = t.insert_node(NodeData::new("eu", "Europe again"), None);
        assert_eq!(
            result,
            Err(DomainError::DuplicateId {
                level: 0,
                id: "eu".into()
            })
        );
    }

    #[test]
    fn given_same_id_on_other_level_when_inserting_then_accepts() {
        let mut t = sample();
        let asia = t.find(0, "as").unwrap();
        assert!(t.insert_node(NodeData::new("eu", "Eurasia"), Some(asia)).is_ok());
        assert!(t.find(1, "eu").is_some());
    }

    #[test]
    fn given_node_below_schema_depth_when_inserting_then_errors() {
        let mut t = sample();
        let bnl = t.find(2, "bnl").unwrap();
        let result = t.insert_node(NodeData::new("nl", "Netherlands"), Some(bnl));
        assert!(matches!(result, Err(DomainError::LevelOutOfRange { level: 3, .. })));
    }

    #[test]
    fn test_len() {
        let t = sample();
        assert_eq!(t.len(), 5);
        assert!(Taxonomy::new(LevelSchema::geography()).is_empty());
    }
}
