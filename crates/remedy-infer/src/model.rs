//! Linear softmax oracle loaded from a JSON model bundle.
//!
//! The bundle is produced offline from the disease/symptom table. It carries
//! the symptom→feature mapping, the class labels and one weight row per class.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use ndarray::{Array1, Array2};
use remedy_core::{Error, Result};
use serde::{Deserialize, Serialize};

use crate::oracle::{DiseaseOracle, OraclePrediction};

/// On-disk model bundle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub symptom_to_index: HashMap<String, usize>,
    /// Optional inverse mapping, checked against `symptom_to_index` when present.
    #[serde(default)]
    pub index_to_symptom: BTreeMap<usize, String>,
    pub diseases: Vec<String>,
    /// `diseases.len()` rows of `symptom_to_index.len()` weights.
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl ModelBundle {
    fn validate(&self) -> Result<()> {
        let features = self.symptom_to_index.len();
        let classes = self.diseases.len();

        if features == 0 || classes == 0 {
            return Err(Error::Model("bundle has no features or no classes".into()));
        }
        if let Some((symptom, idx)) = self.symptom_to_index.iter().find(|&(_, &i)| i >= features) {
            return Err(Error::Model(format!(
                "feature index {} for '{}' out of range (0..{})",
                idx, symptom, features
            )));
        }
        for (idx, symptom) in &self.index_to_symptom {
            if self.symptom_to_index.get(symptom) != Some(idx) {
                return Err(Error::Model(format!(
                    "index_to_symptom[{}] = '{}' disagrees with symptom_to_index",
                    idx, symptom
                )));
            }
        }
        if self.weights.len() != classes || self.weights.iter().any(|row| row.len() != features) {
            return Err(Error::Model(format!(
                "weights must be {} x {}",
                classes, features
            )));
        }
        if self.bias.len() != classes {
            return Err(Error::Model(format!(
                "bias has {} entries, expected {}",
                self.bias.len(),
                classes
            )));
        }
        Ok(())
    }
}

/// Multi-hot encode `symptoms`. Symptoms without a feature index are ignored.
pub fn encode_symptoms(symptoms: &[String], symptom_to_index: &HashMap<String, usize>, features: usize) -> Array1<f32> {
    let mut vector = Array1::zeros(features);
    for symptom in symptoms {
        if let Some(&idx) = symptom_to_index.get(symptom.as_str()) {
            if idx < features {
                vector[idx] = 1.0;
            }
        }
    }
    vector
}

fn softmax(logits: &Array1<f32>) -> Array1<f32> {
    let max = logits.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
    let exp = logits.mapv(|v| (v - max).exp());
    let sum = exp.sum();
    exp / sum
}

/// Softmax classifier over multi-hot symptom vectors.
pub struct LinearOracle {
    symptom_to_index: HashMap<String, usize>,
    diseases: Vec<String>,
    weights: Array2<f32>,
    bias: Array1<f32>,
}

impl LinearOracle {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::NotFound(format!("model bundle {}", path.display())));
        }
        let data = std::fs::read_to_string(path)?;
        let bundle: ModelBundle = serde_json::from_str(&data)?;
        Self::from_bundle(bundle)
    }

    pub fn from_bundle(bundle: ModelBundle) -> Result<Self> {
        bundle.validate()?;

        let classes = bundle.diseases.len();
        let features = bundle.symptom_to_index.len();
        let flat: Vec<f32> = bundle.weights.into_iter().flatten().collect();
        let weights = Array2::from_shape_vec((classes, features), flat)
            .map_err(|e| Error::Model(e.to_string()))?;

        Ok(Self {
            symptom_to_index: bundle.symptom_to_index,
            diseases: bundle.diseases,
            weights,
            bias: Array1::from_vec(bundle.bias),
        })
    }

    pub fn class_count(&self) -> usize {
        self.diseases.len()
    }

    /// Class probabilities for a symptom set, in `diseases` order.
    pub fn probabilities(&self, symptoms: &[String]) -> Array1<f32> {
        let x = encode_symptoms(symptoms, &self.symptom_to_index, self.feature_count());
        let logits = self.weights.dot(&x) + &self.bias;
        softmax(&logits)
    }
}

impl DiseaseOracle for LinearOracle {
    fn predict(&self, symptoms: &[String]) -> Option<OraclePrediction> {
        let probs = self.probabilities(symptoms);

        let mut best: Option<(usize, f32)> = None;
        for (i, &p) in probs.iter().enumerate() {
            if best.map_or(true, |(_, bp)| p > bp) {
                best = Some((i, p));
            }
        }

        let (idx, confidence) = best?;
        if !confidence.is_finite() {
            return None;
        }
        Some(OraclePrediction {
            disease: self.diseases[idx].clone(),
            confidence: confidence as f64,
        })
    }

    fn feature_count(&self) -> usize {
        self.weights.ncols()
    }

    fn is_available(&self) -> bool {
        true
    }
}
