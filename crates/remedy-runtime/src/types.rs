//! Runtime types.

use remedy_infer::Stage;
use remedy_reference::DiseaseProfile;
use serde::Serialize;

/// Shown when the submitted text is blank or the form placeholder.
pub const BLANK_INPUT_MESSAGE: &str =
    "Please enter your symptoms. Symptoms should be comma-separated (e.g., itching, fever, headache)";

/// Shown when no stage produced a disease.
pub const NO_PREDICTION_MESSAGE: &str =
    "Unable to predict disease. Please try again with different symptoms.";

pub fn internal_error_message(detail: &str) -> String {
    format!("An error occurred: {}. Please try again with valid symptoms.", detail)
}

/// Result of one prediction request.
///
/// On success `disease` and the profile fields are set; otherwise `disease`
/// is null and `message` explains why. `symptoms` always echoes the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResponse {
    pub symptoms: String,
    pub matched_symptoms: Vec<String>,
    pub disease: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<Stage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(flatten)]
    pub profile: Option<DiseaseProfile>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl PredictionResponse {
    pub fn with_message(symptoms: &str, message: impl Into<String>) -> Self {
        Self {
            symptoms: symptoms.to_string(),
            message: Some(message.into()),
            ..Default::default()
        }
    }

    pub fn internal_error(symptoms: &str, detail: &str) -> Self {
        Self::with_message(symptoms, internal_error_message(detail))
    }

    pub fn is_prediction(&self) -> bool {
        self.disease.is_some()
    }
}

/// Catalog counts reported by `GET /api/catalog`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub diseases: usize,
    pub symptoms: usize,
    pub links: usize,
    pub oracle_available: bool,
    pub loaded_at: String,
}

/// Scorer diseases checked against the reference data.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogAudit {
    pub checked: usize,
    pub unresolved: Vec<String>,
}

impl CatalogAudit {
    pub fn is_clean(&self) -> bool {
        self.unresolved.is_empty()
    }
}
