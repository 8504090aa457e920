//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::{CriteriaKind, DealStatus};

/// Hierarchical geography and industry criteria selection for buyer acquisition profiles
#[derive(Parser, Debug)]
#[command(name = "taxsel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    /// Directory with a local .taxsel.toml (default: cwd)
    #[arg(short = 'C', long, global = true, value_hint = ValueHint::DirPath)]
    pub config_dir: Option<PathBuf>,

    /// Profile file (overrides config)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub profile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Deal board tab.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tab {
    Active,
    Pending,
    Passed,
}

impl From<Tab> for DealStatus {
    fn from(t: Tab) -> Self {
        match t {
            Tab::Active => DealStatus::Active,
            Tab::Pending => DealStatus::Pending,
            Tab::Passed => DealStatus::Passed,
        }
    }
}

/// Which picker a command works on.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Criteria {
    #[value(alias = "geo", alias = "countries")]
    Geography,
    #[value(alias = "sectors")]
    Industry,
}

impl From<Criteria> for CriteriaKind {
    fn from(c: Criteria) -> Self {
        match c {
            Criteria::Geography => CriteriaKind::Geography,
            Criteria::Industry => CriteriaKind::Industry,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the taxonomy with selection marks
    Tree {
        #[arg(value_enum)]
        criteria: Criteria,
        /// Only show nodes matching this search
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Toggle a node (cascades to children, reconciles parents)
    Toggle {
        #[arg(value_enum)]
        criteria: Criteria,
        /// Node id
        id: String,
        /// Level name or number (default: shallowest level containing the id)
        #[arg(short, long)]
        level: Option<String>,
    },

    /// Remove a selected label
    Remove {
        #[arg(value_enum)]
        criteria: Criteria,
        /// Label as shown by `labels`
        label: String,
    },

    /// Add labels as if each were toggled on
    Add {
        #[arg(value_enum)]
        criteria: Criteria,
        #[arg(required = true)]
        labels: Vec<String>,
    },

    /// Print the flattened labels that will be submitted
    Labels {
        #[arg(value_enum)]
        criteria: Criteria,
    },

    /// Inspect and submit the company profile
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },

    /// Review deals offered to the buyer
    Deals {
        #[command(subcommand)]
        command: DealCommands,
    },

    /// Log in to or out of the profile API
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommands {
    /// Print the profile as JSON
    Show,
    /// Check the profile is complete enough to submit
    Validate,
    /// Validate and submit the profile for the logged-in buyer
    Submit,
    /// Toggle a preferred business model
    ToggleModel {
        /// e.g. "Recurring Revenue"
        model: String,
    },
    /// Toggle a management team preference
    ToggleManagement {
        /// e.g. "Owner(s) Staying"
        preference: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration
    Show,
    /// Show config file locations
    Path,
    /// Write a template global config (if none exists)
    Init,
}

#[derive(Subcommand, Debug)]
pub enum DealCommands {
    /// List deals on one tab
    List {
        #[arg(short, long, value_enum, default_value = "active")]
        status: Tab,
        /// Search title, description, industry, geography and business model
        #[arg(short, long)]
        query: Option<String>,
    },
    /// Show one deal with its documents
    Show { id: String },
    /// Pass on a deal
    Pass { id: String },
    /// Approve the terms of a pending deal, making it active
    Approve { id: String },
    /// Attach a document to a deal
    Upload {
        id: String,
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },
    /// Delete a document from a deal
    DeleteDoc {
        id: String,
        /// Document id, e.g. doc-1
        document: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum SessionCommands {
    /// Store a bearer token (and buyer id) in the config
    Login {
        token: String,
        #[arg(long)]
        user_id: Option<String>,
        /// Write to the local .taxsel.toml instead of the global config
        #[arg(long)]
        local: bool,
    },
    /// Remove the stored token and buyer id
    Logout {
        /// Write to the local .taxsel.toml instead of the global config
        #[arg(long)]
        local: bool,
    },
    /// Show whether a session is active
    Status,
}
