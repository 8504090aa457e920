//! Tests for the company profile model: wire format and submission checks.

use rstest::rstest;
use serde_json::json;

use taxsel::domain::{CompanyProfile, Contact, CriteriaKind, ValidationError};

fn complete_profile() -> CompanyProfile {
    let mut p = CompanyProfile {
        company_name: "Acme Capital".into(),
        website: "https://acme.example.com".into(),
        contacts: vec![Contact {
            name: "Jo Doe".into(),
            email: "jo@acme.example.com".into(),
            phone: "+1 555 0100".into(),
        }],
        company_type: "Private Equity".into(),
        capital_entity: "Fund".into(),
        ..CompanyProfile::default()
    };
    p.agreements.terms_and_conditions_accepted = true;
    p.agreements.nda_accepted = true;
    p.agreements.fee_agreement_accepted = true;
    p
}

// ============================================================
// Wire format
// ============================================================

#[rstest]
#[case(json!("Retain"), vec!["Retain"])]
#[case(json!(["Retain", "Replace"]), vec!["Retain", "Replace"])]
#[case(json!(null), vec![])]
#[case(json!(""), vec![])]
#[case(json!(["", "Flexible"]), vec!["Flexible"])]
fn given_management_preference_shape_when_deserializing_then_normalizes_to_list(
    #[case] value: serde_json::Value,
    #[case] expected: Vec<&str>,
) {
    // Arrange
    let raw = json!({
        "companyName": "Acme",
        "targetCriteria": { "managementTeamPreference": value }
    });

    // Act
    let profile: CompanyProfile = serde_json::from_value(raw).unwrap();

    // Assert
    assert_eq!(profile.target_criteria.management_team_preference, expected);
}

#[test]
fn given_missing_fields_when_deserializing_then_form_defaults_apply() {
    let profile: CompanyProfile = serde_json::from_value(json!({})).unwrap();

    assert_eq!(profile.selected_currency, "USD");
    assert_eq!(profile.capital_availability, "need_to_raise");
    assert!(profile.target_criteria.countries.is_empty());
}

#[test]
fn given_profile_when_serializing_then_uses_camel_case_keys() {
    let mut profile = complete_profile();
    profile.target_criteria.countries = vec!["Europe".into()];
    profile.target_criteria.industry_sectors = vec!["Software".into()];

    let value = serde_json::to_value(&profile).unwrap();

    assert_eq!(value["companyName"], "Acme Capital");
    assert_eq!(value["targetCriteria"]["countries"], json!(["Europe"]));
    assert_eq!(value["targetCriteria"]["industrySectors"], json!(["Software"]));
    assert_eq!(value["agreements"]["ndaAccepted"], true);
    assert!(value.get("buyer").is_none());
}

#[test]
fn given_criteria_kind_when_setting_labels_then_targets_matching_field() {
    let mut profile = CompanyProfile::default();

    profile
        .target_criteria
        .set_labels(CriteriaKind::Industry, vec!["Health Care".into()]);

    assert_eq!(
        profile.target_criteria.labels(CriteriaKind::Industry),
        ["Health Care"]
    );
    assert!(profile.target_criteria.labels(CriteriaKind::Geography).is_empty());
}

#[test]
fn given_business_model_when_toggled_twice_then_removed_again() {
    let mut profile = CompanyProfile::default();

    profile.target_criteria.toggle_business_model("Recurring Revenue").unwrap();
    profile.target_criteria.toggle_business_model("Project-Based").unwrap();
    assert_eq!(
        profile.target_criteria.preferred_business_models,
        vec!["Recurring Revenue", "Project-Based"]
    );

    profile.target_criteria.toggle_business_model("Recurring Revenue").unwrap();
    assert_eq!(
        profile.target_criteria.preferred_business_models,
        vec!["Project-Based"]
    );
}

#[test]
fn given_management_preference_when_toggled_then_list_updates() {
    let mut profile = CompanyProfile::default();

    let criteria = &mut profile.target_criteria;
    criteria.toggle_management_preference("Owner(s) Staying").unwrap();
    criteria.toggle_management_preference("No Preference").unwrap();
    criteria.toggle_management_preference("Owner(s) Staying").unwrap();

    assert_eq!(criteria.management_team_preference, vec!["No Preference"]);
}

#[test]
fn given_unknown_business_model_when_toggled_then_rejected_and_list_unchanged() {
    let mut profile = CompanyProfile::default();

    let result = profile.target_criteria.toggle_business_model("Bogus Model");

    assert_eq!(
        result,
        Err(ValidationError::UnknownOption {
            field: "business model",
            value: "Bogus Model".into()
        })
    );
    assert!(profile.target_criteria.preferred_business_models.is_empty());
}

#[test]
fn given_legacy_preference_on_profile_when_toggled_then_it_is_removed() {
    // Arrange: older profiles stored free-text preferences
    let mut profile: CompanyProfile = serde_json::from_value(json!({
        "targetCriteria": { "managementTeamPreference": "Retain" }
    }))
    .unwrap();

    // Act
    let result = profile.target_criteria.toggle_management_preference("Retain");

    // Assert
    assert!(result.is_ok());
    assert!(profile.target_criteria.management_team_preference.is_empty());
}

// ============================================================
// Validation
// ============================================================

#[test]
fn given_complete_profile_when_validating_then_ok() {
    assert_eq!(complete_profile().validate(), Ok(()));
}

#[test]
fn given_empty_form_when_validating_then_company_name_required_first() {
    assert_eq!(
        CompanyProfile::default().validate(),
        Err(ValidationError::Required("company name"))
    );
}

#[rstest]
#[case("localhost")]
#[case("not a url")]
#[case("https://")]
fn given_bad_website_when_validating_then_invalid_website(#[case] website: &str) {
    let mut p = complete_profile();
    p.website = website.into();

    assert_eq!(p.validate(), Err(ValidationError::InvalidWebsite));
}

#[test]
fn given_no_contacts_when_validating_then_no_contacts() {
    let mut p = complete_profile();
    p.contacts.clear();

    assert_eq!(p.validate(), Err(ValidationError::NoContacts));
}

#[test]
fn given_malformed_email_when_validating_then_names_the_contact() {
    let mut p = complete_profile();
    p.contacts[0].email = "jo-at-acme".into();

    assert_eq!(
        p.validate(),
        Err(ValidationError::InvalidEmail("Jo Doe".into()))
    );
}

#[test]
fn given_missing_nda_when_validating_then_agreement_not_accepted() {
    let mut p = complete_profile();
    p.agreements.nda_accepted = false;

    assert_eq!(p.validate(), Err(ValidationError::AgreementNotAccepted("NDA")));
}

#[test]
fn given_inverted_revenue_range_when_validating_then_inverted_range() {
    let mut p = complete_profile();
    p.target_criteria.revenue_min = Some(10.0);
    p.target_criteria.revenue_max = Some(5.0);

    assert_eq!(p.validate(), Err(ValidationError::InvertedRange("revenue")));
}

#[rstest]
#[case::company_type("company type")]
#[case::capital_entity("capital entity")]
fn given_value_outside_option_list_when_validating_then_unknown_option(#[case] field: &'static str) {
    // Arrange
    let mut p = complete_profile();
    match field {
        "company type" => p.company_type = "Not A Real Type".into(),
        _ => p.capital_entity = "Made Up".into(),
    }

    // Act
    let result = p.validate();

    // Assert
    assert!(matches!(
        result,
        Err(ValidationError::UnknownOption { field: f, .. }) if f == field
    ));
}

#[test]
fn given_free_text_criteria_options_when_validating_then_unknown_option() {
    let mut p = complete_profile();
    p.target_criteria.management_team_preference = vec!["Retain".into()];

    assert_eq!(
        p.validate(),
        Err(ValidationError::UnknownOption {
            field: "management preference",
            value: "Retain".into()
        })
    );
}

#[test]
fn given_listed_criteria_options_when_validating_then_ok() {
    let mut p = complete_profile();
    p.target_criteria.preferred_business_models = vec!["Asset Light".into()];
    p.target_criteria.management_team_preference = vec!["No Preference".into()];

    assert!(p.validate().is_ok());
}

#[test]
fn given_open_ended_range_when_validating_then_ok() {
    let mut p = complete_profile();
    p.target_criteria.ebitda_min = Some(1.0);

    assert!(p.validate().is_ok());
}
