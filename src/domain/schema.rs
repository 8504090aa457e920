//! Level schema: the ordered names of a taxonomy's levels.

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// Ordered level names, root level first.
///
/// The same selection algorithm runs at any depth; the schema only bounds
/// how deep nodes may be inserted and gives levels a human name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelSchema {
    names: Vec<String>,
}

impl LevelSchema {
    pub fn new<I, S>(names: I) -> DomainResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(DomainError::EmptySchema);
        }
        Ok(Self { names })
    }

    /// continent / region / sub-region
    pub fn geography() -> Self {
        Self {
            names: vec!["continent".into(), "region".into(), "sub-region".into()],
        }
    }

    /// sector / industry-group / industry / sub-industry
    pub fn industry() -> Self {
        Self {
            names: vec![
                "sector".into(),
                "industry-group".into(),
                "industry".into(),
                "sub-industry".into(),
            ],
        }
    }

    pub fn depth(&self) -> usize {
        self.names.len()
    }

    pub fn name(&self, level: usize) -> Option<&str> {
        self.names.get(level).map(String::as_str)
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Resolve a level by name or by zero-based number.
    ///
    /// Names compare case-insensitively and treat `-`, `_` and spaces alike,
    /// so `subRegion`, `sub_region` and `Sub-Region` all resolve.
    pub fn level_of(&self, name: &str) -> DomainResult<usize> {
        if let Ok(level) = name.parse::<usize>() {
            if level < self.depth() {
                return Ok(level);
            }
        }
        let wanted = normalize(name);
        self.names
            .iter()
            .position(|n| normalize(n) == wanted)
            .ok_or_else(|| DomainError::UnknownLevel(name.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

impl fmt::Display for LevelSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.names.join(" > "))
    }
}
