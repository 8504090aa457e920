//! Deals offered to the buyer: status workflow, search and documents.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

/// Dashboard tab a deal is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    Active,
    Pending,
    Passed,
}

impl DealStatus {
    pub const ALL: [DealStatus; 3] = [DealStatus::Active, DealStatus::Pending, DealStatus::Passed];

    /// Heading of the tab, e.g. "Active Deals".
    pub fn title(&self) -> &'static str {
        match self {
            DealStatus::Active => "Active Deals",
            DealStatus::Pending => "Pending Deals",
            DealStatus::Passed => "Passed Deals",
        }
    }
}

impl fmt::Display for DealStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DealStatus::Active => "active",
            DealStatus::Pending => "pending",
            DealStatus::Passed => "passed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: String,
    pub title: String,
    pub status: DealStatus,
    #[serde(default)]
    pub company_description: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub geography: String,
    #[serde(default)]
    pub years_in_business: u32,
    #[serde(default)]
    pub trailing_revenue: f64,
    #[serde(default)]
    pub trailing_ebitda: f64,
    #[serde(default)]
    pub average_growth: f64,
    #[serde(default)]
    pub net_income: f64,
    #[serde(default)]
    pub asking_price: f64,
    #[serde(default)]
    pub business_model: String,
    #[serde(default)]
    pub management_preference: String,
    #[serde(default)]
    pub seller_phone: String,
    #[serde(default)]
    pub seller_email: String,
    #[serde(default)]
    pub documents: Vec<Document>,
}

impl Deal {
    /// Case-insensitive substring match on title, description, industry,
    /// geography and business model. A blank query matches everything.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [
            &self.title,
            &self.company_description,
            &self.industry,
            &self.geography,
            &self.business_model,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
    }
}

/// All deals visible to one buyer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DealBoard {
    deals: Vec<Deal>,
}

impl DealBoard {
    pub fn new(deals: Vec<Deal>) -> Self {
        Self { deals }
    }

    pub fn deals(&self) -> &[Deal] {
        &self.deals
    }

    pub fn get(&self, id: &str) -> DomainResult<&Deal> {
        self.deals
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| DomainError::DealNotFound(id.to_string()))
    }

    fn get_mut(&mut self, id: &str) -> DomainResult<&mut Deal> {
        self.deals
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DomainError::DealNotFound(id.to_string()))
    }

    /// Deals on the `status` tab that match `query`, in board order.
    pub fn filter(&self, status: DealStatus, query: &str) -> Vec<&Deal> {
        self.deals
            .iter()
            .filter(|d| d.status == status && d.matches(query))
            .collect()
    }

    pub fn count_by_status(&self, status: DealStatus) -> usize {
        self.deals.iter().filter(|d| d.status == status).count()
    }

    /// Move a deal to the passed tab, from any status.
    #[instrument(level = "debug", skip(self))]
    pub fn pass(&mut self, id: &str) -> DomainResult<()> {
        let deal = self.get_mut(id)?;
        debug!("pass {}: {} -> passed", id, deal.status);
        deal.status = DealStatus::Passed;
        Ok(())
    }

    /// Accept the terms of access: a pending deal becomes active.
    ///
    /// Approving an active deal is a no-op; a passed deal cannot be approved.
    #[instrument(level = "debug", skip(self))]
    pub fn approve_terms(&mut self, id: &str) -> DomainResult<()> {
        let deal = self.get_mut(id)?;
        match deal.status {
            DealStatus::Pending => {
                deal.status = DealStatus::Active;
                Ok(())
            }
            DealStatus::Active => Ok(()),
            DealStatus::Passed => Err(DomainError::InvalidTransition {
                id: id.to_string(),
                from: DealStatus::Passed.to_string(),
                to: DealStatus::Active.to_string(),
            }),
        }
    }

    /// Attach a document to a deal and return it.
    ///
    /// Ids are `doc-<n>` with `n` one past the highest number on the deal.
    pub fn add_document(&mut self, id: &str, name: &str, url: &str) -> DomainResult<Document> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyField {
                field: "document name",
            });
        }
        let deal = self.get_mut(id)?;
        let next = deal
            .documents
            .iter()
            .filter_map(|d| d.id.strip_prefix("doc-")?.parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;
        let document = Document {
            id: format!("doc-{next}"),
            name: name.to_string(),
            url: url.to_string(),
        };
        deal.documents.push(document.clone());
        Ok(document)
    }

    pub fn remove_document(&mut self, id: &str, document_id: &str) -> DomainResult<Document> {
        let deal = self.get_mut(id)?;
        let pos = deal
            .documents
            .iter()
            .position(|d| d.id == document_id)
            .ok_or_else(|| DomainError::DocumentNotFound {
                deal: id.to_string(),
                document: document_id.to_string(),
            })?;
        Ok(deal.documents.remove(pos))
    }
}
