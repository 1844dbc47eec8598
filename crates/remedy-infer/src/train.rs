//! Offline training of the linear oracle from the disease/symptom table.
//!
//! Each table row is one sample. Features are the sorted symptom vocabulary,
//! classes are the sorted distinct disease labels. Weights are fitted with
//! full-batch gradient descent on softmax cross-entropy.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;

use ndarray::{Array1, Array2, Axis};
use remedy_core::{Error, Result};
use remedy_match::{canonical_symptom, SymptomRow};
use serde::Serialize;
use tracing::info;

use crate::model::ModelBundle;

#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub epochs: usize,
    pub learning_rate: f32,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            epochs: 300,
            learning_rate: 0.5,
        }
    }
}

/// Training summary reported by `remedy train`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainReport {
    pub samples: usize,
    pub features: usize,
    pub classes: usize,
    pub training_accuracy: f64,
}

/// Fit a model bundle on `rows`.
pub fn train_bundle(rows: &[SymptomRow], options: TrainOptions) -> Result<(ModelBundle, TrainReport)> {
    let samples: Vec<(&str, Vec<String>)> = rows
        .iter()
        .map(|row| {
            let symptoms: Vec<String> = row.symptoms.iter().filter_map(|s| canonical_symptom(s)).collect();
            (row.disease.as_str(), symptoms)
        })
        .filter(|(_, symptoms)| !symptoms.is_empty())
        .collect();
    if samples.is_empty() {
        return Err(Error::Dataset("no training rows with symptoms".into()));
    }

    let vocabulary: BTreeSet<&str> = samples
        .iter()
        .flat_map(|(_, symptoms)| symptoms.iter().map(String::as_str))
        .collect();
    let symptom_to_index: HashMap<String, usize> = vocabulary
        .iter()
        .enumerate()
        .map(|(i, s)| (s.to_string(), i))
        .collect();
    let diseases: Vec<String> = samples
        .iter()
        .map(|(d, _)| d.to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let class_of: HashMap<&str, usize> = diseases
        .iter()
        .enumerate()
        .map(|(i, d)| (d.as_str(), i))
        .collect();

    let (n, f, c) = (samples.len(), symptom_to_index.len(), diseases.len());
    let mut x = Array2::<f32>::zeros((n, f));
    let mut y = Array2::<f32>::zeros((n, c));
    let mut labels = Vec::with_capacity(n);
    for (i, (disease, symptoms)) in samples.iter().enumerate() {
        for symptom in symptoms {
            x[[i, symptom_to_index[symptom]]] = 1.0;
        }
        let class = class_of[disease];
        y[[i, class]] = 1.0;
        labels.push(class);
    }

    let mut w = Array2::<f32>::zeros((c, f));
    let mut b = Array1::<f32>::zeros(c);
    let scale = 1.0 / n as f32;
    for _ in 0..options.epochs {
        let probs = row_softmax(x.dot(&w.t()) + &b);
        let diff = probs - &y;
        let grad_w = diff.t().dot(&x) * scale;
        let grad_b = diff.sum_axis(Axis(0)) * scale;
        w.scaled_add(-options.learning_rate, &grad_w);
        b.scaled_add(-options.learning_rate, &grad_b);
    }

    let probs = row_softmax(x.dot(&w.t()) + &b);
    let correct = probs
        .rows()
        .into_iter()
        .zip(&labels)
        .filter(|(row, label)| argmax(row.iter().copied()) == Some(**label))
        .count();

    let report = TrainReport {
        samples: n,
        features: f,
        classes: c,
        training_accuracy: correct as f64 / n as f64,
    };
    info!(
        "Trained oracle on {} samples: {} features, {} classes, accuracy {:.3}",
        report.samples, report.features, report.classes, report.training_accuracy
    );

    let index_to_symptom: BTreeMap<usize, String> = symptom_to_index
        .iter()
        .map(|(s, &i)| (i, s.clone()))
        .collect();
    let bundle = ModelBundle {
        symptom_to_index,
        index_to_symptom,
        diseases,
        weights: w.rows().into_iter().map(|row| row.to_vec()).collect(),
        bias: b.to_vec(),
    };
    Ok((bundle, report))
}

/// Write a bundle as JSON, creating the parent directory.
pub fn save_bundle(bundle: &ModelBundle, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string(bundle)?)?;
    info!("Model bundle written to {}", path.display());
    Ok(())
}

fn row_softmax(mut logits: Array2<f32>) -> Array2<f32> {
    for mut row in logits.rows_mut() {
        let max = row.fold(f32::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max).exp());
        let sum = row.sum();
        row /= sum;
    }
    logits
}

fn argmax(values: impl Iterator<Item = f32>) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, v) in values.enumerate() {
        if best.map_or(true, |(_, bv)| v > bv) {
            best = Some((i, v));
        }
    }
    best.map(|(i, _)| i)
}
