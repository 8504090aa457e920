//! Command dispatch

use std::io;
use std::path::{Path, PathBuf};

use clap::CommandFactory;
use clap_complete::generate;
use itertools::Itertools;
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::cli::args::{
    Cli, Commands, ConfigCommands, Criteria, DealCommands, ProfileCommands, SessionCommands,
};
use crate::cli::output;
use crate::cli::{CliError, CliResult};
use crate::config::{global_config_path, local_config_path, with_session, SessionConfig, Settings};
use crate::domain::{
    CompanyProfile, CriteriaKind, CriteriaPicker, Deal, DealStatus, DomainError, Taxonomy,
};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::{InfraError, InfraResult};
use crate::tree_traits::TaxonomyConvert;

pub fn execute_command(cli: &Cli, container: &ServiceContainer) -> CliResult<()> {
    match &cli.command {
        Some(Commands::Tree { criteria, query }) => cmd_tree(container, *criteria, query.as_deref()),
        Some(Commands::Toggle {
            criteria,
            id,
            level,
        }) => cmd_toggle(container, *criteria, id, level.as_deref()),
        Some(Commands::Remove { criteria, label }) => cmd_remove(container, *criteria, label),
        Some(Commands::Add { criteria, labels }) => cmd_add(container, *criteria, labels),
        Some(Commands::Labels { criteria }) => cmd_labels(container, *criteria),
        Some(Commands::Profile { command }) => cmd_profile(container, command),
        Some(Commands::Deals { command }) => cmd_deals(container, command),
        Some(Commands::Session { command }) => cmd_session(cli, container, command),
        Some(Commands::Config { command }) => cmd_config(cli, container, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => {
            Cli::command()
                .print_help()
                .map_err(|e| InfraError::io("print help", e))?;
            Ok(())
        }
    }
}

/// Saved profile plus a picker re-derived from its labels.
fn open(container: &ServiceContainer, kind: CriteriaKind) -> CliResult<(CompanyProfile, CriteriaPicker)> {
    let profile = container.profiles.load()?;
    let taxonomy = container.taxonomy(kind)?;
    if taxonomy.is_none() {
        output::warning(&format!(
            "{} taxonomy not available: {}",
            kind.label(),
            container.settings.taxonomy_path(kind).display()
        ));
    }
    let picker = container.profiles.open_picker(kind, &profile, taxonomy);
    Ok((profile, picker))
}

fn persist(
    container: &ServiceContainer,
    kind: CriteriaKind,
    picker: &CriteriaPicker,
    mut profile: CompanyProfile,
) -> CliResult<()> {
    container.profiles.commit(kind, picker, &mut profile);
    container.profiles.save(&profile)?;
    let labels = profile.target_criteria.labels(kind);
    if labels.is_empty() {
        output::action(kind.label(), "(nothing selected)");
    } else {
        output::action(kind.label(), &labels.iter().join(", "));
    }
    Ok(())
}

/// Resolve `id` to a level: the named one, or the shallowest that has it.
fn resolve_level(taxonomy: &Taxonomy, id: &str, level: Option<&str>) -> CliResult<usize> {
    if id.trim().is_empty() {
        return Err(CliError::InvalidArgs("node id must not be empty".into()));
    }
    match level {
        Some(name) => Ok(taxonomy.schema().level_of(name)?),
        None => (0..taxonomy.schema().depth())
            .find(|&l| taxonomy.find(l, id).is_some())
            .ok_or_else(|| {
                DomainError::NodeNotFound {
                    level: 0,
                    id: id.to_string(),
                }
                .into()
            }),
    }
}

#[instrument(skip(container))]
fn cmd_tree(container: &ServiceContainer, criteria: Criteria, query: Option<&str>) -> CliResult<()> {
    let kind = CriteriaKind::from(criteria);
    let (_, picker) = open(container, kind)?;
    let Some(taxonomy) = picker.taxonomy() else {
        return Ok(());
    };
    let shown = match query {
        Some(q) => taxonomy.filter(q),
        None => taxonomy.clone(),
    };
    if shown.is_empty() {
        output::info(&format!("no {} entries match", kind.label()));
        return Ok(());
    }
    let title = format!("{} ({})", kind.label(), taxonomy.schema());
    output::info(&shown.to_tree_string(picker.state(), &title));
    Ok(())
}

#[instrument(skip(container))]
fn cmd_toggle(
    container: &ServiceContainer,
    criteria: Criteria,
    id: &str,
    level: Option<&str>,
) -> CliResult<()> {
    let kind = CriteriaKind::from(criteria);
    let (profile, mut picker) = open(container, kind)?;
    if let Some(taxonomy) = picker.taxonomy() {
        let level = resolve_level(taxonomy, id, level)?;
        debug!("toggle {}:{}", level, id);
        picker.toggle(level, id)?;
    }
    persist(container, kind, &picker, profile)
}

#[instrument(skip(container))]
fn cmd_remove(container: &ServiceContainer, criteria: Criteria, label: &str) -> CliResult<()> {
    let kind = CriteriaKind::from(criteria);
    let (profile, mut picker) = open(container, kind)?;
    picker.remove_label(label);
    persist(container, kind, &picker, profile)
}

#[instrument(skip(container))]
fn cmd_add(container: &ServiceContainer, criteria: Criteria, labels: &[String]) -> CliResult<()> {
    let kind = CriteriaKind::from(criteria);
    let (profile, mut picker) = open(container, kind)?;
    if let Some(taxonomy) = picker.taxonomy() {
        for stale in crate::domain::unmatched_labels(taxonomy, labels) {
            output::warning(&format!("no {} entry named '{}'", kind.label(), stale));
        }
    }
    picker.add_labels(labels);
    persist(container, kind, &picker, profile)
}

fn cmd_labels(container: &ServiceContainer, criteria: Criteria) -> CliResult<()> {
    let kind = CriteriaKind::from(criteria);
    let (profile, picker) = open(container, kind)?;
    let labels = if picker.is_loaded() {
        picker.labels()
    } else {
        profile.target_criteria.labels(kind).to_vec()
    };
    for label in labels {
        output::info(&label);
    }
    Ok(())
}

fn cmd_profile(container: &ServiceContainer, command: &ProfileCommands) -> CliResult<()> {
    let profiles = &container.profiles;
    match command {
        ProfileCommands::Show => {
            let profile = profiles.load()?;
            let json = serde_json::to_string_pretty(&profile)
                .map_err(|e| CliError::Usage(format!("cannot render profile: {e}")))?;
            output::info(&json);
        }
        ProfileCommands::Validate => {
            let profile = profiles.load()?;
            profile
                .validate()
                .map_err(ApplicationError::from)?;
            output::success("profile is complete");
        }
        ProfileCommands::Submit => {
            let profile = profiles.load()?;
            let submitted = profiles.submit(&container.settings.session, &profile)?;
            output::success(&format!(
                "profile for '{}' submitted",
                submitted.company_name
            ));
        }
        ProfileCommands::ToggleModel { model } => {
            let mut profile = profiles.load()?;
            profile
                .target_criteria
                .toggle_business_model(model)
                .map_err(ApplicationError::from)?;
            profiles.save(&profile)?;
            output::action(
                "business models",
                &profile.target_criteria.preferred_business_models.iter().join(", "),
            );
        }
        ProfileCommands::ToggleManagement { preference } => {
            let mut profile = profiles.load()?;
            profile
                .target_criteria
                .toggle_management_preference(preference)
                .map_err(ApplicationError::from)?;
            profiles.save(&profile)?;
            output::action(
                "management preference",
                &profile.target_criteria.management_team_preference.iter().join(", "),
            );
        }
    }
    Ok(())
}

/// One line per deal: id, title, where, what, and the headline numbers.
fn deal_summary(deal: &Deal) -> String {
    format!(
        "{:<4} {}  [{}, {}]  asking {}, revenue {}, EBITDA {}",
        deal.id,
        deal.title,
        deal.industry,
        deal.geography,
        output::amount(deal.asking_price),
        output::amount(deal.trailing_revenue),
        output::amount(deal.trailing_ebitda),
    )
}

fn cmd_deals(container: &ServiceContainer, command: &DealCommands) -> CliResult<()> {
    let session = &container.settings.session;
    let deals = &container.deals;
    match command {
        DealCommands::List { status, query } => {
            let status = DealStatus::from(*status);
            let (shown, counts) = deals.list(session, status, query.as_deref().unwrap_or(""))?;
            output::info(&counts.iter().map(|(s, n)| format!("{s}: {n}")).join("  "));
            output::header(status.title());
            if shown.is_empty() {
                output::detail("no deals match");
            }
            for deal in &shown {
                output::detail(&deal_summary(deal));
            }
        }
        DealCommands::Show { id } => {
            let board = deals.board(session)?;
            let deal = board.get(id)?;
            output::header(&format!("{} ({})", deal.title, deal.status));
            output::detail(&deal.company_description);
            output::detail(&format!(
                "{} in {}, {} years, {}",
                deal.industry, deal.geography, deal.years_in_business, deal.business_model
            ));
            output::detail(&format!(
                "revenue {}, EBITDA {}, net income {}, growth {}%",
                output::amount(deal.trailing_revenue),
                output::amount(deal.trailing_ebitda),
                output::amount(deal.net_income),
                deal.average_growth
            ));
            output::detail(&format!("asking {}", output::amount(deal.asking_price)));
            output::detail(&format!("seller: {} {}", deal.seller_email, deal.seller_phone));
            for doc in &deal.documents {
                output::detail(&format!("{:<8} {} ({})", doc.id, doc.name, doc.url));
            }
        }
        DealCommands::Pass { id } => {
            let deal = deals.pass(session, id)?;
            output::action("passed", &deal.title);
        }
        DealCommands::Approve { id } => {
            let deal = deals.approve(session, id)?;
            output::action("approved", &format!("{} is now {}", deal.title, deal.status));
        }
        DealCommands::Upload { id, file } => {
            let doc = deals.upload(session, id, file)?;
            output::success(&format!("uploaded {} as {}", doc.name, doc.id));
        }
        DealCommands::DeleteDoc { id, document } => {
            let doc = deals.remove_document(session, id, document)?;
            output::success(&format!("deleted {} ({})", doc.name, doc.id));
        }
    }
    Ok(())
}

/// Config file a session change is written to.
fn session_config_path(cli: &Cli, local: bool) -> CliResult<PathBuf> {
    if local {
        let dir = cli.config_dir.as_deref().unwrap_or(Path::new("."));
        return Ok(local_config_path(dir));
    }
    global_config_path().ok_or_else(|| CliError::Usage("cannot determine config directory".into()))
}

/// Store `session` in the config file at `path`, creating it if needed.
fn write_session(container: &ServiceContainer, path: &Path, session: &SessionConfig) -> InfraResult<()> {
    let existing = if container.fs.is_file(path) {
        container
            .fs
            .read_to_string(path)
            .map_err(|e| InfraError::io(format!("read {}", path.display()), e))?
    } else {
        String::new()
    };
    let updated = with_session(&existing, session)?;
    container
        .fs
        .ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
    container
        .fs
        .write(path, &updated)
        .map_err(|e| InfraError::io(format!("write {}", path.display()), e))
}

fn cmd_session(cli: &Cli, container: &ServiceContainer, command: &SessionCommands) -> CliResult<()> {
    match command {
        SessionCommands::Login {
            token,
            user_id,
            local,
        } => {
            let mut session = container.settings.session.clone();
            session.login(token, user_id.as_deref());
            if !session.is_authenticated() {
                return Err(CliError::InvalidArgs("token must not be empty".into()));
            }
            let path = session_config_path(cli, *local)?;
            write_session(container, &path, &session)?;
            output::success(&format!(
                "logged in with token {} ({})",
                session.redacted_token(),
                path.display()
            ));
        }
        SessionCommands::Logout { local } => {
            let mut session = container.settings.session.clone();
            session.logout();
            let path = session_config_path(cli, *local)?;
            write_session(container, &path, &session)?;
            output::success(&format!("logged out ({})", path.display()));
        }
        SessionCommands::Status => {
            let session = &container.settings.session;
            if session.is_authenticated() {
                output::action(
                    "logged in",
                    &format!(
                        "token {}, buyer {}",
                        session.redacted_token(),
                        session.user_id.as_deref().unwrap_or("<none>")
                    ),
                );
            } else {
                output::info("not logged in");
            }
            output::detail(&format!("api: {}", session.api_url));
        }
    }
    Ok(())
}

fn cmd_config(cli: &Cli, container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
        }
        ConfigCommands::Path => {
            output::header("Config files");
            match global_config_path() {
                Some(p) => output::detail(&format!("global: {}", p.display())),
                None => output::detail("global: <no config dir>"),
            }
            let local_dir = cli.config_dir.clone().unwrap_or_else(|| ".".into());
            output::detail(&format!("local:  {}", local_config_path(&local_dir).display()));
            output::header("Data files");
            output::detail(&format!(
                "profile:   {}",
                container.settings.profile_path().display()
            ));
            output::detail(&format!(
                "deals:     {}",
                container.settings.deals_path().display()
            ));
            for kind in [CriteriaKind::Geography, CriteriaKind::Industry] {
                output::detail(&format!(
                    "{:<10} {}",
                    format!("{}:", kind.label()),
                    container.settings.taxonomy_path(kind).display()
                ));
            }
        }
        ConfigCommands::Init => {
            let path = global_config_path()
                .ok_or_else(|| CliError::Usage("cannot determine config directory".into()))?;
            if container.fs.exists(&path) {
                return Err(CliError::Usage(format!(
                    "config already exists: {}",
                    path.display()
                )));
            }
            container
                .fs
                .ensure_parent(&path)
                .map_err(|e| InfraError::io(format!("create {}", path.display()), e))?;
            container
                .fs
                .write(&path, &Settings::template())
                .map_err(|e| InfraError::io(format!("write {}", path.display()), e))?;
            output::success(&format!("created {}", path.display()));
        }
    }
    Ok(())
}
