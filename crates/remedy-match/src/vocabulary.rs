//! Symptom vocabulary and the disease ⇄ symptom indexes.
//!
//! Built once from the reference symptom table and never mutated. Ordered
//! collections keep iteration deterministic, which the scorer's tie-break and
//! the matcher's best-candidate selection both rely on.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// One row of the reference symptom table: a disease and its raw symptom cells.
#[derive(Debug, Clone, Default)]
pub struct SymptomRow {
    pub disease: String,
    pub symptoms: Vec<String>,
}

impl SymptomRow {
    pub fn new(disease: impl Into<String>, symptoms: &[&str]) -> Self {
        Self {
            disease: disease.into(),
            symptoms: symptoms.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Immutable symptom vocabulary with forward and inverse disease indexes.
#[derive(Debug, Clone, Default)]
pub struct SymptomIndex {
    vocabulary: BTreeSet<String>,
    disease_symptoms: BTreeMap<String, BTreeSet<String>>,
    symptom_diseases: BTreeMap<String, BTreeSet<String>>,
}

/// Summary counts for an index.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexStats {
    pub diseases: usize,
    pub symptoms: usize,
    pub links: usize,
}

impl SymptomIndex {
    /// Build the index from table rows. Rows for the same disease are merged.
    ///
    /// Symptom cells are trimmed and lowercased; empty and `nan` cells are skipped.
    /// Disease names are kept verbatim since they are the scorer's canonical spelling.
    pub fn build<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = SymptomRow>,
    {
        let mut index = Self::default();

        for row in rows {
            let entry = index
                .disease_symptoms
                .entry(row.disease.clone())
                .or_default();

            for raw in &row.symptoms {
                let Some(symptom) = canonical_symptom(raw) else {
                    continue;
                };
                index.vocabulary.insert(symptom.clone());
                index
                    .symptom_diseases
                    .entry(symptom.clone())
                    .or_default()
                    .insert(row.disease.clone());
                entry.insert(symptom);
            }
        }

        let stats = index.stats();
        tracing::debug!(
            "Built symptom index: {} diseases, {} symptoms, {} links",
            stats.diseases,
            stats.symptoms,
            stats.links
        );
        index
    }

    /// The closed set of canonical symptoms.
    pub fn vocabulary(&self) -> &BTreeSet<String> {
        &self.vocabulary
    }

    pub fn contains(&self, symptom: &str) -> bool {
        self.vocabulary.contains(symptom)
    }

    /// Diseases with their documented symptom sets, in canonical name order.
    pub fn diseases(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.disease_symptoms
            .iter()
            .map(|(d, s)| (d.as_str(), s))
    }

    pub fn symptoms_for(&self, disease: &str) -> Option<&BTreeSet<String>> {
        self.disease_symptoms.get(disease)
    }

    pub fn diseases_for(&self, symptom: &str) -> Option<&BTreeSet<String>> {
        self.symptom_diseases.get(symptom)
    }

    pub fn is_empty(&self) -> bool {
        self.disease_symptoms.is_empty()
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            diseases: self.disease_symptoms.len(),
            symptoms: self.vocabulary.len(),
            links: self.disease_symptoms.values().map(|s| s.len()).sum(),
        }
    }
}

/// Canonical form of a symptom cell, or None for blank and `nan` cells.
pub fn canonical_symptom(raw: &str) -> Option<String> {
    let symptom = raw.trim().to_lowercase();
    if symptom.is_empty() || symptom == "nan" {
        None
    } else {
        Some(symptom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SymptomIndex {
        SymptomIndex::build(vec![
            SymptomRow::new("Fungal infection", &["itching", " skin_rash", " nodal_skin_eruptions"]),
            SymptomRow::new("Allergy", &[" continuous_sneezing", " shivering", " chills", ""]),
            SymptomRow::new("Fungal infection", &["itching", " dischromic _patches", "nan"]),
            SymptomRow::new("Diabetes ", &["fatigue", " weight_loss"]),
        ])
    }

    #[test]
    fn test_build_merges_rows_and_cleans_cells() {
        let index = sample();
        let fungal = index.symptoms_for("Fungal infection").unwrap();
        assert_eq!(fungal.len(), 4);
        assert!(fungal.contains("skin_rash"));
        assert!(fungal.contains("dischromic _patches"));
        assert!(!index.contains("nan"));
        assert!(!index.contains(""));
        // Disease spelling is preserved, trailing space included.
        assert!(index.symptoms_for("Diabetes ").is_some());
        assert!(index.symptoms_for("Diabetes").is_none());
    }

    #[test]
    fn test_vocabulary_and_disease_sets_agree() {
        let index = sample();
        let from_diseases: BTreeSet<String> = index
            .diseases()
            .flat_map(|(_, s)| s.iter().cloned())
            .collect();
        assert_eq!(&from_diseases, index.vocabulary());

        for symptom in index.vocabulary() {
            for disease in index.diseases_for(symptom).unwrap() {
                assert!(index.symptoms_for(disease).unwrap().contains(symptom));
            }
        }
    }

    #[test]
    fn test_stats() {
        let stats = sample().stats();
        assert_eq!(stats.diseases, 3);
        assert_eq!(stats.symptoms, 9);
        assert_eq!(stats.links, 9);
    }

    #[test]
    fn test_empty_index() {
        let index = SymptomIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.vocabulary().is_empty());
    }
}
