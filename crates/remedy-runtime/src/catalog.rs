//! Catalog: the immutable data snapshot every prediction runs against.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use remedy_core::{DataPaths, Result};
use remedy_infer::scorer::{COMMON_COLD, SINUSITIS, VIRAL_INFECTION, VIRAL_RESPIRATORY_INFECTION};
use remedy_match::SymptomIndex;
use remedy_reference::{load_symptom_rows, ReferenceData};
use tracing::{info, warn};

use crate::types::{CatalogAudit, CatalogSummary};

/// Labels the scorer can emit without a symptom table row.
const SYNTHETIC_LABELS: &[&str] = &[VIRAL_INFECTION, COMMON_COLD, VIRAL_RESPIRATORY_INFECTION, SINUSITIS];

/// Symptom index plus reference tables, loaded together and never mutated.
#[derive(Debug, Clone)]
pub struct Catalog {
    index: SymptomIndex,
    reference: ReferenceData,
    root: PathBuf,
    loaded_at: DateTime<Utc>,
}

impl Catalog {
    /// Load the catalog from a data directory. The symptom table is required.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let rows = load_symptom_rows(&paths.symptoms)?;
        let index = SymptomIndex::build(rows);
        if index.is_empty() {
            warn!("Symptom table {} has no usable rows", paths.symptoms.display());
        }
        let reference = ReferenceData::load(paths)?;

        let stats = index.stats();
        info!(
            "Catalog loaded from {}: {} diseases, {} symptoms",
            paths.root.display(),
            stats.diseases,
            stats.symptoms
        );

        Ok(Self::from_parts(index, reference, &paths.root))
    }

    pub fn from_parts(index: SymptomIndex, reference: ReferenceData, root: &Path) -> Self {
        Self {
            index,
            reference,
            root: root.to_path_buf(),
            loaded_at: Utc::now(),
        }
    }

    pub fn index(&self) -> &SymptomIndex {
        &self.index
    }

    pub fn reference(&self) -> &ReferenceData {
        &self.reference
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn summary(&self, oracle_available: bool) -> CatalogSummary {
        let stats = self.index.stats();
        CatalogSummary {
            diseases: stats.diseases,
            symptoms: stats.symptoms,
            links: stats.links,
            oracle_available,
            loaded_at: self.loaded_at.to_rfc3339(),
        }
    }

    /// Check that every disease the scorer can emit resolves to reference data.
    pub fn audit(&self) -> CatalogAudit {
        let mut audit = CatalogAudit::default();
        let labels = self
            .index
            .diseases()
            .map(|(disease, _)| disease)
            .chain(SYNTHETIC_LABELS.iter().copied());

        for disease in labels {
            audit.checked += 1;
            if !self.reference.resolves(disease) {
                audit.unresolved.push(disease.to_string());
            }
        }

        if !audit.is_clean() {
            warn!(
                "{} of {} diseases have no reference data: {:?}",
                audit.unresolved.len(),
                audit.checked,
                audit.unresolved
            );
        }
        audit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tests::write_dataset;

    #[test]
    fn test_load_and_summary() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_dataset(dir.path());
        let catalog = Catalog::load(&paths).unwrap();

        let summary = catalog.summary(false);
        assert_eq!(summary.diseases, 4);
        assert!(summary.symptoms > 10);
        assert!(!summary.oracle_available);
        assert_eq!(catalog.root(), dir.path());
    }

    #[test]
    fn test_missing_symptom_table_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Catalog::load(&DataPaths::new(dir.path())).is_err());
    }

    #[test]
    fn test_audit() {
        let dir = tempfile::tempdir().unwrap();
        let paths = write_dataset(dir.path());
        let catalog = Catalog::load(&paths).unwrap();

        let audit = catalog.audit();
        assert_eq!(audit.checked, 4 + SYNTHETIC_LABELS.len());
        // Every fixture disease has a description except Psoriasis.
        assert_eq!(audit.unresolved, vec!["Psoriasis"]);
        assert!(!audit.is_clean());
    }
}
