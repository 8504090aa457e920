//! Buyer company profile: the form the criteria pickers feed into.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::domain::picker::CriteriaKind;

pub const COMPANY_TYPES: &[&str] = &[
    "Private Equity",
    "Holding Company",
    "Family Office",
    "Independent Sponsor",
    "Entrepreneurship through Acquisition",
    "Single Acquisition Search",
    "Strategic Operating Company",
    "Buy Side Mandate",
];

pub const CAPITAL_ENTITIES: &[&str] = &["Fund", "Holding Company", "SPV", "Direct Investment"];

pub const BUSINESS_MODELS: &[&str] = &[
    "Recurring Revenue",
    "Project-Based",
    "Asset Light",
    "Asset Heavy",
];

pub const MANAGEMENT_PREFERENCES: &[&str] = &[
    "Owner(s) Departing",
    "Owner(s) Staying",
    "Management Team Staying",
    "No Preference",
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Preferences {
    pub stop_sending_deals: bool,
    pub dont_show_my_deals: bool,
    pub dont_send_deals_to_my_competitors: bool,
    pub allow_buyer_like_deals: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Agreements {
    pub terms_and_conditions_accepted: bool,
    pub nda_accepted: bool,
    pub fee_agreement_accepted: bool,
}

/// Acquisition criteria. `countries` and `industry_sectors` hold the
/// flattened labels of the geography and industry pickers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TargetCriteria {
    pub countries: Vec<String>,
    pub industry_sectors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revenue_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ebitda_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_size_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_size_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_stake_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_years_in_business: Option<u32>,
    pub preferred_business_models: Vec<String>,
    /// Stored profiles carry this as a string, an array or null
    #[serde(deserialize_with = "string_or_seq")]
    pub management_team_preference: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl TargetCriteria {
    pub fn labels(&self, kind: CriteriaKind) -> &[String] {
        match kind {
            CriteriaKind::Geography => &self.countries,
            CriteriaKind::Industry => &self.industry_sectors,
        }
    }

    pub fn set_labels(&mut self, kind: CriteriaKind, labels: Vec<String>) {
        match kind {
            CriteriaKind::Geography => self.countries = labels,
            CriteriaKind::Industry => self.industry_sectors = labels,
        }
    }

    /// Add or remove one of [`BUSINESS_MODELS`].
    pub fn toggle_business_model(&mut self, model: &str) -> Result<(), ValidationError> {
        toggle_option(
            &mut self.preferred_business_models,
            "business model",
            BUSINESS_MODELS,
            model,
        )
    }

    /// Add or remove one of [`MANAGEMENT_PREFERENCES`].
    pub fn toggle_management_preference(&mut self, preference: &str) -> Result<(), ValidationError> {
        toggle_option(
            &mut self.management_team_preference,
            "management preference",
            MANAGEMENT_PREFERENCES,
            preference,
        )
    }
}

/// Removing always succeeds, including values no longer in `allowed`;
/// adding is limited to `allowed`.
fn toggle_option(
    values: &mut Vec<String>,
    field: &'static str,
    allowed: &[&str],
    value: &str,
) -> Result<(), ValidationError> {
    match values.iter().position(|v| v == value) {
        Some(pos) => {
            values.remove(pos);
        }
        None => {
            check_option(field, allowed, value)?;
            values.push(value.to_string());
        }
    }
    Ok(())
}

fn check_option(field: &'static str, allowed: &[&str], value: &str) -> Result<(), ValidationError> {
    if allowed.contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::UnknownOption {
            field,
            value: value.to_string(),
        })
    }
}

/// Accept `"x"`, `["x", ...]` or `null`; empty strings are dropped.
fn string_or_seq<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    let values = match Option::<OneOrMany>::deserialize(deserializer)? {
        None => Vec::new(),
        Some(OneOrMany::One(s)) => vec![s],
        Some(OneOrMany::Many(v)) => v,
    };
    Ok(values.into_iter().filter(|s| !s.trim().is_empty()).collect())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyProfile {
    pub company_name: String,
    pub website: String,
    pub contacts: Vec<Contact>,
    pub company_type: String,
    pub capital_entity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deals_completed_last5_years: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_deal_size: Option<f64>,
    pub preferences: Preferences,
    pub target_criteria: TargetCriteria,
    pub agreements: Agreements,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
    pub capital_availability: String,
    pub selected_currency: String,
}

impl Default for CompanyProfile {
    fn default() -> Self {
        Self {
            company_name: String::new(),
            website: String::new(),
            contacts: vec![Contact::default()],
            company_type: String::new(),
            capital_entity: String::new(),
            deals_completed_last5_years: None,
            average_deal_size: None,
            preferences: Preferences::default(),
            target_criteria: TargetCriteria::default(),
            agreements: Agreements::default(),
            buyer: None,
            capital_availability: "need_to_raise".into(),
            selected_currency: "USD".into(),
        }
    }
}

/// First problem found when validating a profile for submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Required(&'static str),

    #[error("please enter a valid website URL")]
    InvalidWebsite,

    #[error("at least one contact is required")]
    NoContacts,

    #[error("invalid email format for contact: {0}")]
    InvalidEmail(String),

    #[error("you must accept the {0}")]
    AgreementNotAccepted(&'static str),

    #[error("minimum {0} cannot be greater than maximum {0}")]
    InvertedRange(&'static str),

    #[error("unknown {field}: '{value}'")]
    UnknownOption { field: &'static str, value: String },
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

fn is_valid_website(website: &str) -> bool {
    let rest = website
        .strip_prefix("https://")
        .or_else(|| website.strip_prefix("http://"))
        .unwrap_or(website);
    let host = rest.split(['/', '?', '#']).next().unwrap_or("");
    let host = host.rsplit('@').next().unwrap_or(host);
    let host = host.split(':').next().unwrap_or(host);
    !host.is_empty()
        && host.contains('.')
        && !host.starts_with('.')
        && !host.ends_with('.')
        && host
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '.')
}

fn check_range(name: &'static str, min: Option<f64>, max: Option<f64>) -> Result<(), ValidationError> {
    match (min, max) {
        (Some(lo), Some(hi)) if lo > hi => Err(ValidationError::InvertedRange(name)),
        _ => Ok(()),
    }
}

impl CompanyProfile {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.company_name.trim().is_empty() {
            return Err(ValidationError::Required("company name"));
        }
        if self.website.trim().is_empty() {
            return Err(ValidationError::Required("website"));
        }
        if self.company_type.is_empty() {
            return Err(ValidationError::Required("company type"));
        }
        if self.capital_entity.is_empty() {
            return Err(ValidationError::Required("capital entity"));
        }
        check_option("company type", COMPANY_TYPES, &self.company_type)?;
        check_option("capital entity", CAPITAL_ENTITIES, &self.capital_entity)?;
        if !is_valid_website(self.website.trim()) {
            return Err(ValidationError::InvalidWebsite);
        }

        if self.contacts.is_empty() {
            return Err(ValidationError::NoContacts);
        }
        for contact in &self.contacts {
            if contact.name.trim().is_empty() {
                return Err(ValidationError::Required("contact name"));
            }
            if contact.email.trim().is_empty() {
                return Err(ValidationError::Required("contact email"));
            }
            if contact.phone.trim().is_empty() {
                return Err(ValidationError::Required("contact phone"));
            }
            if !email_regex().is_match(&contact.email) {
                return Err(ValidationError::InvalidEmail(contact.name.clone()));
            }
        }

        if !self.agreements.terms_and_conditions_accepted {
            return Err(ValidationError::AgreementNotAccepted("terms and conditions"));
        }
        if !self.agreements.nda_accepted {
            return Err(ValidationError::AgreementNotAccepted("NDA"));
        }
        if !self.agreements.fee_agreement_accepted {
            return Err(ValidationError::AgreementNotAccepted("fee agreement"));
        }

        let c = &self.target_criteria;
        check_range("revenue", c.revenue_min, c.revenue_max)?;
        check_range("EBITDA", c.ebitda_min, c.ebitda_max)?;
        check_range("transaction size", c.transaction_size_min, c.transaction_size_max)?;
        for model in &c.preferred_business_models {
            check_option("business model", BUSINESS_MODELS, model)?;
        }
        for preference in &c.management_team_preference {
            check_option("management preference", MANAGEMENT_PREFERENCES, preference)?;
        }
        Ok(())
    }
}
