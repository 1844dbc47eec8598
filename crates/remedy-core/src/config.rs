//! Configuration and data file layout.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths to every reference file Remedy reads at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataPaths {
    /// Root data directory (e.g., `data/`).
    pub root: PathBuf,
    /// Disease → symptom columns (`data/dataset/symptoms_df.csv`).
    pub symptoms: PathBuf,
    /// Disease descriptions (`data/dataset/description.csv`).
    pub descriptions: PathBuf,
    /// Four precaution columns per disease (`data/dataset/precautions_df.csv`).
    pub precautions: PathBuf,
    /// Serialized medication lists (`data/dataset/medications.csv`).
    pub medications: PathBuf,
    /// Serialized diet lists (`data/dataset/diets.csv`).
    pub diets: PathBuf,
    /// One workout suggestion per row (`data/dataset/workout_df.csv`).
    pub workouts: PathBuf,
    /// Trained classifier bundle (`data/models/disease_model.json`).
    pub model: PathBuf,
    /// Optional name-fix / specialist / substitute overrides (`data/overrides.json`).
    pub overrides: PathBuf,
}

impl DataPaths {
    /// Lay out data paths under a root directory. Nothing is created; all files are read-only.
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref().to_path_buf();
        let dataset = root.join("dataset");
        Self {
            symptoms: dataset.join("symptoms_df.csv"),
            descriptions: dataset.join("description.csv"),
            precautions: dataset.join("precautions_df.csv"),
            medications: dataset.join("medications.csv"),
            diets: dataset.join("diets.csv"),
            workouts: dataset.join("workout_df.csv"),
            model: root.join("models").join("disease_model.json"),
            overrides: root.join("overrides.json"),
            root,
        }
    }
}

/// Fuzzy-matching thresholds used by the input fallback ladder.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MatchSettings {
    /// Threshold for the first pass over the whole cleaned input.
    pub primary_threshold: f64,
    /// Lower threshold for per-fragment and whole-text retries.
    pub relaxed_threshold: f64,
    /// Minimum top-class probability accepted from the statistical oracle.
    pub oracle_min_confidence: f64,
}

impl Default for MatchSettings {
    fn default() -> Self {
        Self {
            primary_threshold: 0.7,
            relaxed_threshold: 0.6,
            oracle_min_confidence: 0.1,
        }
    }
}

impl MatchSettings {
    /// Read threshold overrides from the environment, keeping defaults for unset values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            primary_threshold: env_threshold("REMEDY_MATCH_THRESHOLD")
                .unwrap_or(defaults.primary_threshold),
            relaxed_threshold: env_threshold("REMEDY_RELAXED_THRESHOLD")
                .unwrap_or(defaults.relaxed_threshold),
            oracle_min_confidence: env_threshold("REMEDY_ORACLE_MIN_CONFIDENCE")
                .unwrap_or(defaults.oracle_min_confidence),
        }
    }
}

fn env_threshold(key: &str) -> Option<f64> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse::<f64>() {
        Ok(v) if (0.0..=1.0).contains(&v) => Some(v),
        _ => {
            tracing::warn!("Ignoring {}={:?}: expected a number in 0.0..=1.0", key, raw);
            None
        }
    }
}

/// Top-level Remedy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemedyConfig {
    /// HTTP server port.
    pub port: u16,
    /// Reference data paths.
    pub data_paths: DataPaths,
    /// Matcher and oracle thresholds.
    pub matching: MatchSettings,
}

impl RemedyConfig {
    /// Create configuration from environment and defaults.
    pub fn from_env(data_dir: impl AsRef<Path>) -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(5000);

        Self {
            port,
            data_paths: DataPaths::new(data_dir),
            matching: MatchSettings::from_env(),
        }
    }
}
