//! Prediction pipeline: raw text → symptoms → disease → care profile.
//!
//! Symptom extraction falls back step by step until something is recognized:
//! 1. Whole cleaned text at the primary threshold
//! 2. Each comma-separated piece at the relaxed threshold
//! 3. Whole cleaned text at the relaxed threshold
//! 4. The cleaned text itself as one unrecognized token

use std::sync::Arc;

use remedy_core::MatchSettings;
use remedy_infer::{DiseaseOracle, DiseaseScorer};
use remedy_match::{clean_speech_input, MatchResult, SymptomMatcher};
use tracing::{debug, info};

use crate::catalog::Catalog;
use crate::types::{PredictionResponse, BLANK_INPUT_MESSAGE, NO_PREDICTION_MESSAGE};

/// Form placeholder text, treated as blank input.
pub const PLACEHOLDER_INPUT: &str = "Symptoms";

const PIECE_TRIM: &[char] = &['[', ']', '\'', '"', ' '];

/// Whether `raw` carries no symptoms at all.
pub fn is_blank_input(raw: &str) -> bool {
    let trimmed = raw.trim();
    trimmed.is_empty() || trimmed == PLACEHOLDER_INPUT
}

/// End-to-end predictor. Holds thresholds and the oracle; the catalog is passed per call.
pub struct Pipeline {
    settings: MatchSettings,
    oracle: Arc<dyn DiseaseOracle>,
}

impl Pipeline {
    pub fn new(settings: MatchSettings, oracle: Arc<dyn DiseaseOracle>) -> Self {
        Self { settings, oracle }
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    pub fn oracle(&self) -> &dyn DiseaseOracle {
        self.oracle.as_ref()
    }

    /// Recognize symptoms in already-cleaned text, relaxing the match step by step.
    pub fn extract_symptoms(&self, catalog: &Catalog, cleaned: &str) -> MatchResult {
        let matcher = SymptomMatcher::new(catalog.index());

        let matched = matcher.find_matches(cleaned, self.settings.primary_threshold);
        if !matched.is_empty() {
            return matched;
        }

        let mut matched = MatchResult::default();
        for piece in cleaned.split(',') {
            let piece = piece.trim().trim_matches(PIECE_TRIM);
            if piece.is_empty() {
                continue;
            }
            matched.extend(matcher.find_matches(piece, self.settings.relaxed_threshold));
        }
        if !matched.is_empty() {
            debug!("Matched by comma-separated pieces: {:?}", matched.as_slice());
            return matched;
        }

        let whole = cleaned.trim().to_lowercase();
        if whole.is_empty() {
            return matched;
        }
        if whole != PLACEHOLDER_INPUT.to_lowercase() {
            matched = matcher.find_matches(&whole, self.settings.relaxed_threshold);
            if !matched.is_empty() {
                return matched;
            }
        }

        debug!("No vocabulary match, passing {:?} through", whole);
        matched.push(whole);
        matched
    }

    /// Predict a disease for raw user text. Never fails; problems become a message.
    pub fn run(&self, catalog: &Catalog, raw: &str) -> PredictionResponse {
        if is_blank_input(raw) {
            return PredictionResponse::with_message(raw, BLANK_INPUT_MESSAGE);
        }

        let cleaned = clean_speech_input(raw);
        let symptoms = self.extract_symptoms(catalog, &cleaned);

        let scorer = DiseaseScorer::new(catalog.index(), self.oracle.as_ref())
            .with_min_oracle_confidence(self.settings.oracle_min_confidence);

        let Some(verdict) = scorer.predict(&symptoms) else {
            info!("No prediction for {:?}", raw);
            return PredictionResponse {
                symptoms: raw.to_string(),
                matched_symptoms: symptoms.into_vec(),
                message: Some(NO_PREDICTION_MESSAGE.to_string()),
                ..Default::default()
            };
        };

        info!(
            "Predicted {:?} via {} from {:?}",
            verdict.disease,
            verdict.stage,
            symptoms.as_slice()
        );

        let profile = catalog.reference().profile(&verdict.disease);
        PredictionResponse {
            symptoms: raw.to_string(),
            matched_symptoms: symptoms.into_vec(),
            disease: Some(verdict.disease),
            stage: Some(verdict.stage),
            score: verdict.score,
            profile: Some(profile),
            message: None,
        }
    }
}
