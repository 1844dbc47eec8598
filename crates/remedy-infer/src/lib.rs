//! Remedy Infer: disease scoring chain and statistical fallback.
//!
//! `scorer` turns a set of matched symptoms into a disease through an ordered
//! list of decision stages. The last rule-based stage may consult a
//! `DiseaseOracle`: when a trained model bundle is present `LinearOracle`
//! serves it, otherwise `NoopOracle` disables the statistical stage. Bundles
//! are produced by `train` from the same symptom table.

pub mod model;
pub mod oracle;
pub mod scorer;
pub mod train;

pub use model::{encode_symptoms, LinearOracle, ModelBundle};
pub use oracle::{DiseaseOracle, NoopOracle, OraclePrediction};
pub use scorer::{DiseaseScorer, ScoreTable, Stage, SymptomGroup, Verdict};
pub use train::{save_bundle, train_bundle, TrainOptions, TrainReport};

use std::path::Path;
use std::sync::Arc;

/// Create the best available oracle for the given model bundle path.
///
/// Falls back to `NoopOracle` when the bundle is missing or invalid, which
/// leaves the rule-based stages fully functional.
pub fn create_oracle(model_path: &Path) -> Arc<dyn DiseaseOracle> {
    match LinearOracle::load(model_path) {
        Ok(oracle) => {
            tracing::info!(
                "Using statistical oracle ({} symptoms, {} diseases)",
                oracle.feature_count(),
                oracle.class_count()
            );
            Arc::new(oracle)
        }
        Err(e) => {
            tracing::warn!("Statistical oracle unavailable: {}. Rule-based scoring only.", e);
            Arc::new(NoopOracle)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_bundle_yields_noop() {
        let dir = tempfile::tempdir().unwrap();
        let oracle = create_oracle(&dir.path().join("disease_model.json"));
        assert!(!oracle.is_available());
        assert!(oracle.predict(&["itching".to_string()]).is_none());
    }
}
