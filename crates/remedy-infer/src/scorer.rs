//! Disease scoring chain.
//!
//! Matched symptoms pass through `Stage::all()` in order; the first stage
//! that produces a disease wins. Stages:
//! 1. Cluster override: symptoms from two or more common groups
//! 2. Single-symptom override: one common symptom on its own
//! 3. Weighted scoring against the disease/symptom index
//! 4. Statistical fallback via a `DiseaseOracle`
//! 5. Common-symptom default

use std::collections::BTreeMap;

use remedy_match::{MatchResult, SymptomIndex};
use serde::Serialize;
use tracing::debug;

use crate::oracle::DiseaseOracle;

pub const VIRAL_INFECTION: &str = "Viral Infection";
pub const COMMON_COLD: &str = "Common Cold";
pub const VIRAL_RESPIRATORY_INFECTION: &str = "Viral Respiratory Infection";
pub const SINUSITIS: &str = "Sinusitis";

/// A weighted score must exceed this to be accepted.
pub const MIN_WEIGHTED_SCORE: f64 = 0.1;

const COVERAGE_WEIGHT: f64 = 0.3;
const PRECISION_WEIGHT: f64 = 0.7;

/// Disease-specific additive bonuses: (disease, trigger symptoms, bonus).
const SCORE_BONUSES: &[(&str, &[&str], f64)] = &[
    (COMMON_COLD, &["fever", "high_fever", "cold", "cough", "chills", "fatigue"], 0.2),
    ("Migraine", &["headache"], 0.15),
    ("Malaria", &["fever", "high_fever", "chills"], 0.1),
    ("Typhoid", &["fever", "high_fever", "chills"], 0.1),
];

/// Symptoms that default to Common Cold when nothing else applies.
const COMMON_SYMPTOMS: &[&str] = &["fever", "headache", "cough", "cold", "flu", "high_fever"];

/// Decision stages, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    ClusterOverride,
    SingleSymptomOverride,
    WeightedScoring,
    StatisticalFallback,
    CommonSymptomDefault,
}

impl Stage {
    pub fn all() -> &'static [Stage] {
        &[
            Self::ClusterOverride,
            Self::SingleSymptomOverride,
            Self::WeightedScoring,
            Self::StatisticalFallback,
            Self::CommonSymptomDefault,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ClusterOverride => "cluster_override",
            Self::SingleSymptomOverride => "single_symptom_override",
            Self::WeightedScoring => "weighted_scoring",
            Self::StatisticalFallback => "statistical_fallback",
            Self::CommonSymptomDefault => "common_symptom_default",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Families of common symptoms used by the two override stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymptomGroup {
    Fever,
    Cold,
    Cough,
    Headache,
}

impl SymptomGroup {
    pub const ALL: [SymptomGroup; 4] = [Self::Fever, Self::Cold, Self::Cough, Self::Headache];

    pub fn members(self) -> &'static [&'static str] {
        match self {
            Self::Fever => &["fever", "high_fever"],
            Self::Cold => &["cold", "chills"],
            Self::Cough => &["cough"],
            Self::Headache => &["headache"],
        }
    }

    /// Disease assigned when this group's symptom is the only one present.
    pub fn single_symptom_disease(self) -> &'static str {
        match self {
            Self::Fever => VIRAL_INFECTION,
            Self::Cold => COMMON_COLD,
            Self::Cough => VIRAL_RESPIRATORY_INFECTION,
            Self::Headache => SINUSITIS,
        }
    }

    pub fn of(symptom: &str) -> Option<SymptomGroup> {
        Self::ALL
            .into_iter()
            .find(|group| group.members().contains(&symptom))
    }

    fn present_in(self, symptoms: &MatchResult) -> bool {
        symptoms.iter().any(|s| self.members().contains(&s))
    }
}

/// Outcome of the scoring chain.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub disease: String,
    pub stage: Stage,
    /// Weighted score or oracle confidence, when the stage computes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl Verdict {
    fn rule(disease: &str, stage: Stage) -> Self {
        Self {
            disease: disease.to_string(),
            stage,
            score: None,
        }
    }
}

/// Weighted score per disease with at least one matched symptom, in index order.
pub type ScoreTable = BTreeMap<String, f64>;

/// Runs the decision chain over a symptom index and an optional oracle.
pub struct DiseaseScorer<'a> {
    index: &'a SymptomIndex,
    oracle: &'a dyn DiseaseOracle,
    min_oracle_confidence: f64,
}

impl<'a> DiseaseScorer<'a> {
    pub fn new(index: &'a SymptomIndex, oracle: &'a dyn DiseaseOracle) -> Self {
        Self {
            index,
            oracle,
            min_oracle_confidence: 0.1,
        }
    }

    pub fn with_min_oracle_confidence(mut self, confidence: f64) -> Self {
        self.min_oracle_confidence = confidence;
        self
    }

    /// Pick a disease for `symptoms`, or None when no stage applies.
    pub fn predict(&self, symptoms: &MatchResult) -> Option<Verdict> {
        if symptoms.is_empty() {
            return None;
        }
        for &stage in Stage::all() {
            if let Some(verdict) = self.evaluate(stage, symptoms) {
                debug!(
                    "Stage {} chose {:?} for {:?}",
                    stage,
                    verdict.disease,
                    symptoms.as_slice()
                );
                return Some(verdict);
            }
        }
        debug!("No stage produced a disease for {:?}", symptoms.as_slice());
        None
    }

    /// Run a single stage in isolation.
    pub fn evaluate(&self, stage: Stage, symptoms: &MatchResult) -> Option<Verdict> {
        match stage {
            Stage::ClusterOverride => cluster_override(symptoms),
            Stage::SingleSymptomOverride => single_symptom_override(symptoms),
            Stage::WeightedScoring => self.weighted(symptoms),
            Stage::StatisticalFallback => self.statistical(symptoms),
            Stage::CommonSymptomDefault => common_symptom_default(symptoms),
        }
    }

    /// Coverage/precision score for every disease sharing a symptom with `symptoms`.
    pub fn score_table(&self, symptoms: &MatchResult) -> ScoreTable {
        let mut table = ScoreTable::new();
        if symptoms.is_empty() {
            return table;
        }
        let matched = symptoms.len() as f64;

        for (disease, disease_symptoms) in self.index.diseases() {
            if disease_symptoms.is_empty() {
                continue;
            }
            let hits = symptoms
                .iter()
                .filter(|s| disease_symptoms.contains(*s))
                .count();
            if hits == 0 {
                continue;
            }
            let coverage = hits as f64 / disease_symptoms.len() as f64;
            let precision = hits as f64 / matched;
            let score = COVERAGE_WEIGHT * coverage + PRECISION_WEIGHT * precision + bonus(disease, symptoms);
            table.insert(disease.to_string(), score);
        }
        table
    }

    fn weighted(&self, symptoms: &MatchResult) -> Option<Verdict> {
        let mut best: Option<(String, f64)> = None;
        for (disease, score) in self.score_table(symptoms) {
            if best.as_ref().map_or(true, |(_, s)| score > *s) {
                best = Some((disease, score));
            }
        }
        best.filter(|(_, score)| *score > MIN_WEIGHTED_SCORE)
            .map(|(disease, score)| Verdict {
                disease,
                stage: Stage::WeightedScoring,
                score: Some(score),
            })
    }

    fn statistical(&self, symptoms: &MatchResult) -> Option<Verdict> {
        if symptoms.is_empty() || !self.oracle.is_available() {
            return None;
        }
        let prediction = self.oracle.predict(symptoms.as_slice())?;
        if prediction.confidence < self.min_oracle_confidence {
            debug!(
                "Oracle suggestion {:?} below confidence floor ({:.3})",
                prediction.disease, prediction.confidence
            );
            return None;
        }
        Some(Verdict {
            disease: prediction.disease,
            stage: Stage::StatisticalFallback,
            score: Some(prediction.confidence),
        })
    }
}

fn bonus(disease: &str, symptoms: &MatchResult) -> f64 {
    let disease = disease.trim();
    SCORE_BONUSES
        .iter()
        .filter(|(name, triggers, _)| {
            *name == disease && symptoms.iter().any(|s| triggers.contains(&s))
        })
        .map(|(_, _, bonus)| bonus)
        .sum()
}

fn cluster_override(symptoms: &MatchResult) -> Option<Verdict> {
    let groups = SymptomGroup::ALL
        .into_iter()
        .filter(|group| group.present_in(symptoms))
        .count();
    (groups >= 2).then(|| Verdict::rule(VIRAL_INFECTION, Stage::ClusterOverride))
}

fn single_symptom_override(symptoms: &MatchResult) -> Option<Verdict> {
    if symptoms.len() != 1 {
        return None;
    }
    let symptom = symptoms.iter().next()?;
    SymptomGroup::of(symptom)
        .map(|group| Verdict::rule(group.single_symptom_disease(), Stage::SingleSymptomOverride))
}

fn common_symptom_default(symptoms: &MatchResult) -> Option<Verdict> {
    symptoms
        .iter()
        .any(|s| COMMON_SYMPTOMS.contains(&s))
        .then(|| Verdict::rule(COMMON_COLD, Stage::CommonSymptomDefault))
}
