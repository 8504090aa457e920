//! taxsel: hierarchical criteria selection for buyer acquisition profiles.
//!
//! The core is [`domain::SelectionState`]: selection over an N-level
//! taxonomy (geography continent > region > sub-region, industry
//! sector > group > industry > sub-industry) that cascades toggles down,
//! reconciles parents up and flattens to the minimal label list stored in
//! a [`domain::CompanyProfile`].

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;
