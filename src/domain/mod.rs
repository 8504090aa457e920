//! Domain layer: taxonomy trees, selection engine, profile model and deals
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod builder;
pub mod deal;
pub mod error;
pub mod filter;
pub mod picker;
pub mod profile;
pub mod schema;
pub mod selection;

pub use arena::{NodeData, Taxonomy, TaxonomyNode};
pub use builder::{BuildError, NodeSpec, TaxonomyBuilder, TaxonomySpec};
pub use deal::{Deal, DealBoard, DealStatus, Document};
pub use error::{DomainError, DomainResult};
pub use picker::{CriteriaKind, CriteriaPicker};
pub use profile::{CompanyProfile, Contact, TargetCriteria, ValidationError};
pub use schema::LevelSchema;
pub use selection::{unmatched_labels, CheckState, SelectionState};
