//! Disease-name fixes, specialist referrals and substitute records.
//!
//! All three are plain data. The bundled defaults ship with the crate and a
//! data-directory `overrides.json` with the same shape is merged on top.

use std::collections::HashMap;
use std::path::Path;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const BUNDLED_JSON: &str = include_str!("../data/overrides.json");

static BUNDLED: Lazy<ReferenceOverrides> = Lazy::new(|| {
    serde_json::from_str(BUNDLED_JSON).expect("bundled overrides.json must parse")
});

/// Hand-authored metadata for diseases the reference tables do not describe well.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubstituteRecord {
    pub description: String,
    #[serde(default)]
    pub precautions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default)]
    pub diet: Vec<String>,
    #[serde(default)]
    pub workout: Vec<String>,
}

/// Lookup tables bridging scorer labels to reference data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReferenceOverrides {
    /// Trimmed scorer label → reference-table key.
    #[serde(default)]
    pub name_fixes: HashMap<String, String>,
    /// Disease → specialist.
    #[serde(default)]
    pub specialists: HashMap<String, String>,
    #[serde(default = "default_specialist")]
    pub default_specialist: String,
    /// Disease label → substitute record, preferred over table rows.
    #[serde(default)]
    pub substitutes: HashMap<String, SubstituteRecord>,
}

fn default_specialist() -> String {
    "General Physician".into()
}

impl Default for ReferenceOverrides {
    fn default() -> Self {
        Self {
            name_fixes: HashMap::new(),
            specialists: HashMap::new(),
            default_specialist: default_specialist(),
            substitutes: HashMap::new(),
        }
    }
}

impl ReferenceOverrides {
    /// The defaults compiled into the crate.
    pub fn bundled() -> Self {
        BUNDLED.clone()
    }

    /// Bundled defaults merged with `path` if it exists and parses.
    pub fn load(path: &Path) -> Self {
        let mut overrides = Self::bundled();

        let Ok(data) = std::fs::read_to_string(path) else {
            return overrides;
        };
        match serde_json::from_str::<ReferenceOverrides>(&data) {
            Ok(local) => {
                info!("Applying reference overrides from {}", path.display());
                overrides.merge(local);
            }
            Err(e) => warn!("Ignoring {}: {}", path.display(), e),
        }
        overrides
    }

    /// Entries from `other` replace same-named entries here.
    pub fn merge(&mut self, other: ReferenceOverrides) {
        self.name_fixes.extend(other.name_fixes);
        self.specialists.extend(other.specialists);
        self.substitutes.extend(other.substitutes);
        if !other.default_specialist.is_empty() {
            self.default_specialist = other.default_specialist;
        }
    }

    /// Map a scorer label onto the spelling used by the reference tables.
    pub fn normalize_disease_name(&self, name: &str) -> String {
        let trimmed = name.trim();
        self.name_fixes
            .get(trimmed)
            .cloned()
            .unwrap_or_else(|| trimmed.to_string())
    }

    pub fn substitute(&self, name: &str) -> Option<&SubstituteRecord> {
        self.substitutes
            .get(name)
            .or_else(|| self.substitutes.get(name.trim()))
    }

    /// Specialist for a disease label, trying the label as given, trimmed, then normalized.
    pub fn specialist(&self, name: &str) -> &str {
        self.specialists
            .get(name)
            .or_else(|| self.specialists.get(name.trim()))
            .or_else(|| self.specialists.get(&self.normalize_disease_name(name)))
            .map(String::as_str)
            .unwrap_or(&self.default_specialist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_parses() {
        let o = ReferenceOverrides::bundled();
        assert_eq!(o.default_specialist, "General Physician");
        for label in ["Viral Infection", "Viral Respiratory Infection", "Sinusitis", "Common Cold"] {
            let record = o.substitute(label).unwrap();
            assert!(!record.description.is_empty());
            assert!(record.precautions.len() <= 4);
        }
    }

    #[test]
    fn test_normalize_disease_name() {
        let o = ReferenceOverrides::bundled();
        assert_eq!(o.normalize_disease_name("Peptic ulcer diseae"), "Peptic ulcer disease");
        assert_eq!(o.normalize_disease_name("Diabetes"), "Diabetes ");
        assert_eq!(o.normalize_disease_name("Diabetes "), "Diabetes ");
        assert_eq!(o.normalize_disease_name("Sinusitis"), "Common Cold");
        assert_eq!(o.normalize_disease_name("  Malaria "), "Malaria");
    }

    #[test]
    fn test_specialist_lookup() {
        let o = ReferenceOverrides::bundled();
        assert_eq!(o.specialist("Migraine"), "Neurologist");
        assert_eq!(o.specialist("Hypertension "), "Cardiologist");
        assert_eq!(o.specialist("Sinusitis"), "ENT Specialist");
        assert_eq!(o.specialist("Something rare"), "General Physician");
    }

    #[test]
    fn test_load_merges_local_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(
            &path,
            r#"{"specialists": {"Migraine": "Headache Clinic"}, "default_specialist": "Family Doctor"}"#,
        )
        .unwrap();

        let o = ReferenceOverrides::load(&path);
        assert_eq!(o.specialist("Migraine"), "Headache Clinic");
        assert_eq!(o.specialist("Acne"), "Dermatologist");
        assert_eq!(o.specialist("Unknown"), "Family Doctor");
    }

    #[test]
    fn test_load_ignores_bad_or_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = ReferenceOverrides::load(&dir.path().join("missing.json"));
        assert_eq!(missing.specialists.len(), ReferenceOverrides::bundled().specialists.len());

        let path = dir.path().join("overrides.json");
        std::fs::write(&path, "{not json").unwrap();
        let bad = ReferenceOverrides::load(&path);
        assert_eq!(bad.default_specialist, "General Physician");
    }
}
