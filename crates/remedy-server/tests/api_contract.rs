//! Response contract tests: validates that prediction and catalog payloads
//! carry the field names and types the web form and API clients read.
//!
//! These build response values directly and inspect their JSON; no server
//! or data directory is needed.

use remedy_infer::Stage;
use remedy_reference::DiseaseProfile;
use remedy_runtime::{
    CatalogAudit, CatalogSummary, PredictionResponse, BLANK_INPUT_MESSAGE, NO_PREDICTION_MESSAGE,
};

fn sample_profile() -> DiseaseProfile {
    DiseaseProfile {
        description: "Fungal infection is a common skin condition.".into(),
        precautions: vec!["bath twice".into(), "keep infected area dry".into()],
        medications: vec!["Antifungal Cream".into()],
        diet: vec!["Probiotics".into()],
        workout: vec!["Avoid sugary foods".into()],
        specialist: "Dermatologist".into(),
    }
}

/// Successful prediction: disease plus the flattened care profile.
/// { symptoms, matchedSymptoms, disease, stage, score?, description,
///   precautions[], medications[], diet[], workout[], specialist }
#[test]
fn test_prediction_shape() {
    let response = PredictionResponse {
        symptoms: "itching, skin rash".into(),
        matched_symptoms: vec!["itching".into(), "skin_rash".into()],
        disease: Some("Fungal infection".into()),
        stage: Some(Stage::WeightedScoring),
        score: Some(0.9),
        profile: Some(sample_profile()),
        message: None,
    };
    let json = serde_json::to_value(&response).unwrap();

    assert_eq!(json["symptoms"], "itching, skin rash");
    assert!(json["matchedSymptoms"].is_array());
    assert!(json["disease"].is_string());
    assert_eq!(json["stage"], "weighted_scoring");
    assert!(json["score"].is_number());
    assert!(json["description"].is_string());
    assert!(json["precautions"].is_array());
    assert!(json["medications"].is_array());
    assert!(json["diet"].is_array());
    assert!(json["workout"].is_array());
    assert_eq!(json["specialist"], "Dermatologist");
    assert!(json.get("message").is_none());
    assert!(json.get("profile").is_none());
}

/// Rule-based stages carry no score.
#[test]
fn test_rule_stage_omits_score() {
    let response = PredictionResponse {
        symptoms: "fever".into(),
        matched_symptoms: vec!["high_fever".into()],
        disease: Some("Viral Infection".into()),
        stage: Some(Stage::SingleSymptomOverride),
        profile: Some(sample_profile()),
        ..Default::default()
    };
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["stage"], "single_symptom_override");
    assert!(json.get("score").is_none());
}

/// Blank input and no-prediction responses: disease is null, message is set,
/// the submitted text is echoed and no profile fields appear.
#[test]
fn test_message_shapes() {
    for (input, message) in [("", BLANK_INPUT_MESSAGE), ("qwerty", NO_PREDICTION_MESSAGE)] {
        let json = serde_json::to_value(PredictionResponse::with_message(input, message)).unwrap();
        assert!(json["disease"].is_null());
        assert_eq!(json["message"], message);
        assert_eq!(json["symptoms"], input);
        assert!(json["matchedSymptoms"].as_array().unwrap().is_empty());
        assert!(json.get("description").is_none());
        assert!(json.get("stage").is_none());
    }
}

#[test]
fn test_internal_error_shape() {
    let json = serde_json::to_value(PredictionResponse::internal_error("cough", "boom")).unwrap();
    assert!(json["disease"].is_null());
    assert_eq!(
        json["message"],
        "An error occurred: boom. Please try again with valid symptoms."
    );
}

/// GET /api/catalog: { diseases, symptoms, links, oracleAvailable, loadedAt }
#[test]
fn test_catalog_summary_shape() {
    let summary = CatalogSummary {
        diseases: 41,
        symptoms: 131,
        links: 304,
        oracle_available: true,
        loaded_at: "2026-01-01T00:00:00+00:00".into(),
    };
    let json = serde_json::to_value(&summary).unwrap();
    assert!(json["diseases"].is_number());
    assert!(json["symptoms"].is_number());
    assert!(json["links"].is_number());
    assert!(json["oracleAvailable"].is_boolean());
    assert!(json["loadedAt"].is_string());
}

#[test]
fn test_catalog_audit_shape() {
    let audit = CatalogAudit {
        checked: 45,
        unresolved: vec!["Psoriasis".into()],
    };
    assert!(!audit.is_clean());
    let json = serde_json::to_value(&audit).unwrap();
    assert_eq!(json["checked"], 45);
    assert_eq!(json["unresolved"][0], "Psoriasis");
}
