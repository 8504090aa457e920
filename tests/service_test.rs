//! Integration tests for the taxonomy and profile services wired through the
//! service container against a temporary base directory.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use tempfile::TempDir;

use taxsel::application::ApplicationError;
use taxsel::config::{SessionConfig, Settings};
use taxsel::domain::{CompanyProfile, Contact, CriteriaKind, DomainError, LevelSchema};
use taxsel::infrastructure::di::ServiceContainer;
use taxsel::infrastructure::traits::{FileSystem, JsonProfileStore, ProfileStore, RealFileSystem};
use taxsel::util::testing;

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

const RESOURCES: &str = "tests/resources/taxonomies";

/// Container over `base_dir` with both taxonomy fixtures copied in.
fn container_with_taxonomies(base_dir: &Path) -> ServiceContainer {
    for file in ["geography.json", "industry.json"] {
        fs::copy(Path::new(RESOURCES).join(file), base_dir.join(file)).unwrap();
    }
    container(base_dir)
}

fn container(base_dir: &Path) -> ServiceContainer {
    ServiceContainer::new(Settings {
        base_dir: base_dir.to_path_buf(),
        ..Settings::default()
    })
}

fn submittable_profile() -> CompanyProfile {
    let mut p = CompanyProfile {
        company_name: "Acme Capital".into(),
        website: "acme.example.com".into(),
        contacts: vec![Contact {
            name: "Jo Doe".into(),
            email: "jo@acme.example.com".into(),
            phone: "555-0100".into(),
        }],
        company_type: "Family Office".into(),
        capital_entity: "Holding Company".into(),
        ..CompanyProfile::default()
    };
    p.agreements.terms_and_conditions_accepted = true;
    p.agreements.nda_accepted = true;
    p.agreements.fee_agreement_accepted = true;
    p
}

fn logged_in() -> SessionConfig {
    let mut session = SessionConfig::default();
    session.login("eyJhbGciOiJIUzI1NiJ9.payload", Some("buyer-42"));
    session
}

// ============================================================
// TaxonomyService
// ============================================================

#[test]
fn given_taxonomy_files_when_loading_then_builds_both_trees() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container_with_taxonomies(temp.path());

    // Act
    let geo = container.taxonomy(CriteriaKind::Geography).unwrap().unwrap();
    let ind = container.taxonomy(CriteriaKind::Industry).unwrap().unwrap();

    // Assert
    assert_eq!(geo.schema(), &LevelSchema::geography());
    assert_eq!(geo.roots().len(), 3);
    assert_eq!(ind.schema().depth(), 4);
    assert_eq!(ind.schema().level_of("sub-industry").unwrap(), 3);
    assert!(ind.find(3, "45103020").is_some());
}

#[test]
fn given_missing_taxonomy_file_when_loading_then_not_available() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());

    let result = container.taxonomy(CriteriaKind::Industry).unwrap();

    assert!(result.is_none());
}

#[test]
fn given_malformed_taxonomy_file_when_loading_then_parse_error_names_path() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("geography.json");
    fs::write(&path, "{ \"continents\": [ { \"id\": 1 } ] }").unwrap();
    let container = container(temp.path());

    // Act
    let err = container.taxonomy(CriteriaKind::Geography).unwrap_err();

    // Assert
    match err {
        ApplicationError::Parse { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected parse error, got {other:?}"),
    }
}

#[test]
fn given_tree_deeper_than_its_levels_when_loading_then_domain_error() {
    let temp = TempDir::new().unwrap();
    fs::copy(
        Path::new(RESOURCES).join("broken.json"),
        temp.path().join("industry.json"),
    )
    .unwrap();
    let container = container(temp.path());

    let err = container.taxonomy(CriteriaKind::Industry).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(DomainError::LevelOutOfRange { .. })
    ));
}

// ============================================================
// ProfileService: picker round trip
// ============================================================

#[test]
fn given_no_saved_profile_when_loading_then_empty_form() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());

    let profile = container.profiles.load().unwrap();

    assert_eq!(profile, CompanyProfile::default());
}

#[test]
fn given_picker_edits_when_committed_and_saved_then_reopen_restores_selection() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container_with_taxonomies(temp.path());
    let mut profile = container.profiles.load().unwrap();
    let geo = container.taxonomy(CriteriaKind::Geography).unwrap();
    let mut picker = container
        .profiles
        .open_picker(CriteriaKind::Geography, &profile, geo);

    // Act
    picker.toggle(1, "we").unwrap();
    picker.toggle(2, "ne").unwrap();
    container
        .profiles
        .commit(CriteriaKind::Geography, &picker, &mut profile);
    container.profiles.save(&profile).unwrap();

    // Assert: saved as flat labels
    let saved = container.profiles.load().unwrap();
    assert_eq!(
        saved.target_criteria.countries,
        vec!["Western Europe", "New England"]
    );

    // Assert: reopening derives the same selection
    let geo = container.taxonomy(CriteriaKind::Geography).unwrap();
    let reopened = container
        .profiles
        .open_picker(CriteriaKind::Geography, &saved, geo);
    assert!(reopened.state().is_selected(2, "fr"));
    assert!(reopened.state().is_selected(2, "bnl"));
    assert!(reopened.state().is_selected(2, "ne"));
    assert!(!reopened.state().is_selected(1, "ne"));
    assert_eq!(reopened.labels(), saved.target_criteria.countries);
}

#[test]
fn given_stale_saved_label_when_reopening_and_committing_then_label_is_dropped() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container_with_taxonomies(temp.path());
    let mut profile = CompanyProfile::default();
    profile.target_criteria.industry_sectors = vec!["Software".into(), "Buggy Whips".into()];

    // Act
    let ind = container.taxonomy(CriteriaKind::Industry).unwrap();
    let picker = container
        .profiles
        .open_picker(CriteriaKind::Industry, &profile, ind);
    container
        .profiles
        .commit(CriteriaKind::Industry, &picker, &mut profile);

    // Assert
    assert_eq!(profile.target_criteria.industry_sectors, vec!["Software"]);
}

#[test]
fn given_unavailable_taxonomy_when_committing_then_saved_labels_are_kept() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());
    let mut profile = CompanyProfile::default();
    profile.target_criteria.countries = vec!["Europe".into()];

    // Act
    let mut picker = container
        .profiles
        .open_picker(CriteriaKind::Geography, &profile, None);
    picker.toggle(0, "eu").unwrap();
    picker.remove_label("Europe");
    container
        .profiles
        .commit(CriteriaKind::Geography, &picker, &mut profile);

    // Assert
    assert!(picker.labels().is_empty());
    assert_eq!(profile.target_criteria.countries, vec!["Europe"]);
}

// ============================================================
// ProfileService: submit
// ============================================================

#[test]
fn given_no_session_when_submitting_then_not_authenticated() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());

    let err = container
        .profiles
        .submit(&SessionConfig::default(), &submittable_profile())
        .unwrap_err();

    assert!(matches!(err, ApplicationError::NotAuthenticated));
    assert!(!temp.path().join("profile.json").exists());
}

#[test]
fn given_incomplete_profile_when_submitting_then_validation_error_and_nothing_saved() {
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());
    let mut profile = submittable_profile();
    profile.agreements.fee_agreement_accepted = false;

    let err = container.profiles.submit(&logged_in(), &profile).unwrap_err();

    assert!(matches!(err, ApplicationError::Validation(_)));
    assert!(!temp.path().join("profile.json").exists());
}

#[test]
fn given_valid_profile_when_submitting_then_stamped_with_buyer_and_saved() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let container = container(temp.path());

    // Act
    let submitted = container
        .profiles
        .submit(&logged_in(), &submittable_profile())
        .unwrap();

    // Assert
    assert_eq!(submitted.buyer.as_deref(), Some("buyer-42"));
    let saved = container.profiles.load().unwrap();
    assert_eq!(saved, submitted);
}

// ============================================================
// JsonProfileStore
// ============================================================

#[test]
fn given_nested_path_when_saving_then_creates_parents_and_leaves_no_temp_file() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested/dir/profile.json");
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let store = JsonProfileStore::new(fs, path.clone());

    // Act
    store.save(&submittable_profile()).unwrap();

    // Assert
    assert!(path.is_file());
    assert!(!path.with_extension("json.tmp").exists());
    let loaded = store.load().unwrap().unwrap();
    assert_eq!(loaded.company_name, "Acme Capital");
}

#[test]
fn given_legacy_string_preference_on_disk_when_loading_then_reads_as_list() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("profile.json");
    fs::write(
        &path,
        r#"{"companyName": "Acme", "targetCriteria": {"managementTeamPreference": "Retain"}}"#,
    )
    .unwrap();
    let store = JsonProfileStore::new(Arc::new(RealFileSystem), path);

    let loaded = store.load().unwrap().unwrap();

    assert_eq!(
        loaded.target_criteria.management_team_preference,
        vec!["Retain"]
    );
}

#[test]
fn given_corrupt_profile_when_loading_through_service_then_operation_failed() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("profile.json"), "not json").unwrap();
    let container = container(temp.path());

    let err = container.profiles.load().unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}
