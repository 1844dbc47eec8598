//! Statistical oracle trait and the disabled implementation.
//!
//! Implementations:
//! - `LinearOracle`: softmax classifier loaded from an offline-trained bundle
//! - `NoopOracle`: always declines, used when no bundle is available

use serde::Serialize;

/// Top-class output of an oracle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OraclePrediction {
    pub disease: String,
    /// Probability of `disease`, in `0.0..=1.0`.
    pub confidence: f64,
}

/// Trait for statistical disease predictors.
pub trait DiseaseOracle: Send + Sync {
    /// Predict the most likely disease for a symptom set.
    /// Returns None if the oracle is not available.
    fn predict(&self, symptoms: &[String]) -> Option<OraclePrediction>;

    /// Length of the multi-hot feature vector.
    fn feature_count(&self) -> usize;

    /// Check if the oracle is available (model loaded).
    fn is_available(&self) -> bool;
}

/// Oracle that never predicts (rule-based scoring only).
pub struct NoopOracle;

impl DiseaseOracle for NoopOracle {
    fn predict(&self, _symptoms: &[String]) -> Option<OraclePrediction> {
        None
    }

    fn feature_count(&self) -> usize {
        0
    }

    fn is_available(&self) -> bool {
        false
    }
}
