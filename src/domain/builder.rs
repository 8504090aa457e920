//! Taxonomy builder: turns serialized reference data into an arena tree.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::arena::{NodeData, Taxonomy};
use crate::domain::error::DomainResult;
use crate::domain::schema::LevelSchema;

/// Serialized reference data for one taxonomy.
///
/// `nodes` also accepts the legacy top-level keys `continents` and `sectors`
/// so existing geography/industry data files load unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaxonomySpec {
    #[serde(default)]
    pub levels: Vec<String>,
    #[serde(default, alias = "continents", alias = "sectors")]
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeSpec {
    pub id: String,
    pub name: String,
    #[serde(
        default,
        alias = "regions",
        alias = "subRegions",
        alias = "industryGroups",
        alias = "industries",
        alias = "subIndustries",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub children: Vec<NodeSpec>,
}

impl NodeSpec {
    pub fn leaf(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children: Vec::new(),
        }
    }

    pub fn branch(id: impl Into<String>, name: impl Into<String>, children: Vec<NodeSpec>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            children,
        }
    }
}

/// Constructs taxonomies from [`TaxonomySpec`]s.
pub struct TaxonomyBuilder;

impl TaxonomyBuilder {
    /// Build a taxonomy, using the data's own level names if it has any and
    /// `fallback` otherwise.
    pub fn build(spec: &TaxonomySpec, fallback: &LevelSchema) -> DomainResult<Taxonomy> {
        let schema = if spec.levels.is_empty() {
            fallback.clone()
        } else {
            LevelSchema::new(spec.levels.iter().cloned())?
        };
        let mut tree = Taxonomy::new(schema);

        // Reversed so that popping yields nodes in document order
        let mut stack: Vec<(&NodeSpec, Option<_>)> =
            spec.nodes.iter().rev().map(|n| (n, None)).collect();

        while let Some((node, parent_idx)) = stack.pop() {
            let idx = tree.insert_node(NodeData::new(&node.id, &node.name), parent_idx)?;
            for child in node.children.iter().rev() {
                stack.push((child, Some(idx)));
            }
        }

        debug!(
            "built taxonomy '{}' with {} nodes",
            tree.schema(),
            tree.len()
        );
        Ok(tree)
    }

    pub fn from_json(json: &str, fallback: &LevelSchema) -> Result<Taxonomy, BuildError> {
        let spec: TaxonomySpec = serde_json::from_str(json)?;
        Ok(Self::build(&spec, fallback)?)
    }
}

/// Failure to build a taxonomy from serialized data.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("invalid taxonomy data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("{0}")]
    Domain(#[from] crate::domain::DomainError),
}
