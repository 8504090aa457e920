//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/taxsel/taxsel.toml`
//! 3. Local config: `<dir>/.taxsel.toml`
//! 4. Environment variables: `TAXSEL_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{CriteriaKind, LevelSchema};

pub const DEFAULT_API_URL: &str = "https://cim-amp.onrender.com";

/// Session with the remote profile API.
///
/// Read once at start-up and passed explicitly to whoever needs it;
/// `login`/`logout` are the only mutations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Base URL of the profile API
    pub api_url: String,
    /// Bearer token of the logged-in buyer
    pub token: Option<String>,
    /// Buyer id stamped onto submitted profiles
    pub user_id: Option<String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.into(),
            token: None,
            user_id: None,
        }
    }
}

impl SessionConfig {
    pub fn is_authenticated(&self) -> bool {
        self.token.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    pub fn login(&mut self, token: &str, user_id: Option<&str>) {
        self.token = Some(token.trim().to_string());
        self.user_id = user_id.map(|u| u.trim().to_string());
    }

    pub fn logout(&mut self) {
        self.token = None;
        self.user_id = None;
    }

    /// First 10 characters of the token, safe for logs.
    pub fn redacted_token(&self) -> String {
        match &self.token {
            Some(t) => format!("{}...", t.chars().take(10).collect::<String>()),
            None => "<none>".into(),
        }
    }

    /// Gate for operations that act on behalf of the buyer.
    pub fn require_auth(&self) -> Result<(), ApplicationError> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ApplicationError::NotAuthenticated)
        }
    }
}

/// Rewrite the `[session]` table of a config file with `session`'s token
/// and user id, keeping every other key. Unset fields are removed.
pub fn with_session(content: &str, session: &SessionConfig) -> Result<String, ApplicationError> {
    let mut doc: toml::Table = toml::from_str(content).map_err(|e| ApplicationError::Config {
        message: format!("parse config: {e}"),
    })?;
    let entry = doc
        .entry("session")
        .or_insert_with(|| toml::Value::Table(toml::Table::new()));
    let toml::Value::Table(table) = entry else {
        return Err(ApplicationError::Config {
            message: "'session' must be a table".into(),
        });
    };
    for (key, value) in [("token", &session.token), ("user_id", &session.user_id)] {
        match value {
            Some(v) => table.insert(key.to_string(), toml::Value::String(v.clone())),
            None => table.remove(key),
        };
    }
    toml::to_string_pretty(&doc).map_err(|e| ApplicationError::Config {
        message: format!("serialize config: {e}"),
    })
}

/// Raw settings for intermediate parsing (`None` → not specified, inherit).
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub base_dir: Option<PathBuf>,
    pub profile: Option<PathBuf>,
    pub geography: Option<PathBuf>,
    pub industry: Option<PathBuf>,
    pub deals: Option<PathBuf>,
    pub session: RawSessionConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSessionConfig {
    pub api_url: Option<String>,
    pub token: Option<String>,
    pub user_id: Option<String>,
}

/// Unified configuration for taxsel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base directory (default: ~/.taxsel)
    pub base_dir: PathBuf,
    /// Profile file (default: base_dir/profile.json)
    pub profile: Option<PathBuf>,
    /// Geography taxonomy file (default: base_dir/geography.json)
    pub geography: Option<PathBuf>,
    /// Industry taxonomy file (default: base_dir/industry.json)
    pub industry: Option<PathBuf>,
    /// Deal board file (default: base_dir/deals.json)
    pub deals: Option<PathBuf>,
    /// Remote API session
    pub session: SessionConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_dir: dirs_default_base_dir(),
            profile: None,
            geography: None,
            industry: None,
            deals: None,
            session: SessionConfig::default(),
        }
    }
}

/// Get the default base directory (~/.taxsel).
fn dirs_default_base_dir() -> PathBuf {
    directories::BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".taxsel"))
        .unwrap_or_else(|| PathBuf::from("~/.taxsel"))
}

/// Get the XDG config directory for taxsel.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "taxsel").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("taxsel.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".taxsel.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn expand(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    shellexpand::full(raw.as_ref())
        .map(|s| PathBuf::from(s.into_owned()))
        .unwrap_or_else(|_| path.to_path_buf())
}

impl Settings {
    pub fn profile_path(&self) -> PathBuf {
        self.profile
            .clone()
            .unwrap_or_else(|| self.base_dir.join("profile.json"))
    }

    pub fn deals_path(&self) -> PathBuf {
        self.deals
            .clone()
            .unwrap_or_else(|| self.base_dir.join("deals.json"))
    }

    pub fn taxonomy_path(&self, kind: CriteriaKind) -> PathBuf {
        let (configured, file) = match kind {
            CriteriaKind::Geography => (&self.geography, "geography.json"),
            CriteriaKind::Industry => (&self.industry, "industry.json"),
        };
        configured.clone().unwrap_or_else(|| self.base_dir.join(file))
    }

    /// Level names used when a taxonomy file does not declare its own.
    pub fn default_schema(kind: CriteriaKind) -> LevelSchema {
        match kind {
            CriteriaKind::Geography => LevelSchema::geography(),
            CriteriaKind::Industry => LevelSchema::industry(),
        }
    }

    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        self.base_dir = expand(&self.base_dir);
        for path in [
            &mut self.profile,
            &mut self.geography,
            &mut self.industry,
            &mut self.deals,
        ]
            .into_iter()
            .flatten()
        {
            *path = expand(path);
        }
    }

    /// Overlay wins if Some, otherwise keep base.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            base_dir: overlay
                .base_dir
                .clone()
                .unwrap_or_else(|| self.base_dir.clone()),
            profile: overlay.profile.clone().or_else(|| self.profile.clone()),
            geography: overlay.geography.clone().or_else(|| self.geography.clone()),
            industry: overlay.industry.clone().or_else(|| self.industry.clone()),
            deals: overlay.deals.clone().or_else(|| self.deals.clone()),
            session: SessionConfig {
                api_url: overlay
                    .session
                    .api_url
                    .clone()
                    .unwrap_or_else(|| self.session.api_url.clone()),
                token: overlay
                    .session
                    .token
                    .clone()
                    .or_else(|| self.session.token.clone()),
                user_id: overlay
                    .session
                    .user_id
                    .clone()
                    .or_else(|| self.session.user_id.clone()),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_dir` - Optional directory holding a `.taxsel.toml`
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_from(global_config_path().as_deref(), local_dir)
    }

    /// Same as [`load`](Self::load) with an explicit global config path.
    pub fn load_from(global: Option<&Path>, local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global {
            if global_path.exists() {
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let raw = load_raw_settings(&local_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.expand_paths();
        Ok(current)
    }

    /// Apply TAXSEL_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(Environment::with_prefix("TAXSEL").separator("__"))
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("base_dir") {
            settings.base_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("profile") {
            settings.profile = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("geography") {
            settings.geography = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("industry") {
            settings.industry = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("deals") {
            settings.deals = Some(PathBuf::from(val));
        }
        if let Ok(val) = config.get_string("session.api_url") {
            settings.session.api_url = val;
        }
        if let Ok(val) = config.get_string("session.token") {
            settings.session.token = Some(val);
        }
        if let Ok(val) = config.get_string("session.user_id") {
            settings.session.user_id = Some(val);
        }

        Ok(settings)
    }

    /// Show the effective configuration as TOML, token redacted.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        let mut shown = self.clone();
        if shown.session.token.is_some() {
            shown.session.token = Some(self.session.redacted_token());
        }
        toml::to_string_pretty(&shown).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        r#"# taxsel configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/taxsel/taxsel.toml
#   Local:  ./.taxsel.toml
#   Env:    TAXSEL_* environment variables (TAXSEL_SESSION__TOKEN, ...)

# Base directory; default locations of profile, taxonomies and deals
# base_dir = "~/.taxsel"

# profile = "~/.taxsel/profile.json"
# geography = "~/.taxsel/geography.json"
# industry = "~/.taxsel/industry.json"
# deals = "~/.taxsel/deals.json"

[session]
# api_url = "https://cim-amp.onrender.com"
# token = "..."
# user_id = "..."
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
