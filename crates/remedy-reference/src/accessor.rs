//! Reference data accessor: per-disease care profile assembly.

use std::collections::HashMap;

use remedy_core::{DataPaths, Result};
use serde::Serialize;
use tracing::info;

use crate::list_literal::parse_list_cell;
use crate::overrides::ReferenceOverrides;
use crate::table::{cell, CsvTable};

/// Description used when a disease has no description row.
pub const DESCRIPTION_NOT_AVAILABLE: &str = "Description not available";

/// Maximum number of precautions reported per disease.
pub const MAX_PRECAUTIONS: usize = 4;

/// Everything shown to the user alongside a predicted disease.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseProfile {
    pub description: String,
    pub precautions: Vec<String>,
    pub medications: Vec<String>,
    pub diet: Vec<String>,
    pub workout: Vec<String>,
    pub specialist: String,
}

/// Read-only reference tables keyed by the disease spelling used in each file.
#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    descriptions: HashMap<String, String>,
    precautions: HashMap<String, Vec<String>>,
    medications: HashMap<String, Vec<String>>,
    diets: HashMap<String, Vec<String>>,
    workouts: HashMap<String, Vec<String>>,
    overrides: ReferenceOverrides,
}

impl ReferenceData {
    /// Load every reference table under `paths`. Absent tables load empty.
    pub fn load(paths: &DataPaths) -> Result<Self> {
        let data = Self::from_tables(
            &CsvTable::load_optional(&paths.descriptions)?,
            &CsvTable::load_optional(&paths.precautions)?,
            &CsvTable::load_optional(&paths.medications)?,
            &CsvTable::load_optional(&paths.diets)?,
            &CsvTable::load_optional(&paths.workouts)?,
            ReferenceOverrides::load(&paths.overrides),
        );

        info!(
            "Loaded reference data: {} descriptions, {} precautions, {} medications, {} diets, {} workout groups",
            data.descriptions.len(),
            data.precautions.len(),
            data.medications.len(),
            data.diets.len(),
            data.workouts.len()
        );
        Ok(data)
    }

    pub fn from_tables(
        descriptions: &CsvTable,
        precautions: &CsvTable,
        medications: &CsvTable,
        diets: &CsvTable,
        workouts: &CsvTable,
        overrides: ReferenceOverrides,
    ) -> Self {
        Self {
            descriptions: first_text(descriptions, "Description"),
            precautions: first_row_columns(precautions, "Precaution_", MAX_PRECAUTIONS),
            medications: first_list(medications, "Medication"),
            diets: first_list(diets, "Diet"),
            workouts: all_rows(workouts, "workout"),
            overrides,
        }
    }

    pub fn overrides(&self) -> &ReferenceOverrides {
        &self.overrides
    }

    /// Assemble the care profile for a predicted disease label. Never fails.
    pub fn profile(&self, disease: &str) -> DiseaseProfile {
        let specialist = self.overrides.specialist(disease).to_string();

        if let Some(record) = self.overrides.substitute(disease) {
            return DiseaseProfile {
                description: record.description.clone(),
                precautions: record.precautions.clone(),
                medications: record.medications.clone(),
                diet: record.diet.clone(),
                workout: record.workout.clone(),
                specialist,
            };
        }

        let key = self.overrides.normalize_disease_name(disease);
        DiseaseProfile {
            description: lookup(&self.descriptions, &key)
                .cloned()
                .unwrap_or_else(|| DESCRIPTION_NOT_AVAILABLE.to_string()),
            precautions: lookup(&self.precautions, &key).cloned().unwrap_or_default(),
            medications: lookup(&self.medications, &key).cloned().unwrap_or_default(),
            diet: lookup(&self.diets, &key).cloned().unwrap_or_default(),
            workout: lookup(&self.workouts, &key).cloned().unwrap_or_default(),
            specialist,
        }
    }

    /// Whether `disease` resolves to a substitute record or a description row.
    pub fn resolves(&self, disease: &str) -> bool {
        self.overrides.substitute(disease).is_some()
            || lookup(
                &self.descriptions,
                &self.overrides.normalize_disease_name(disease),
            )
            .is_some()
    }
}

/// Exact key first, then a whitespace-insensitive match on the key.
fn lookup<'m, T>(map: &'m HashMap<String, T>, key: &str) -> Option<&'m T> {
    map.get(key).or_else(|| {
        let wanted = key.trim();
        map.iter()
            .find(|(k, _)| k.trim() == wanted)
            .map(|(_, v)| v)
    })
}

fn disease_column(table: &CsvTable) -> Option<usize> {
    table.column("Disease")
}

fn first_text(table: &CsvTable, column: &str) -> HashMap<String, String> {
    let mut out = HashMap::new();
    let (Some(d), Some(c)) = (disease_column(table), table.column(column)) else {
        return out;
    };
    for record in table.rows() {
        if let (Some(disease), Some(value)) = (cell(record, d), cell(record, c)) {
            out.entry(disease.to_string())
                .or_insert_with(|| value.trim().to_string());
        }
    }
    out
}

fn first_row_columns(table: &CsvTable, prefix: &str, limit: usize) -> HashMap<String, Vec<String>> {
    let mut out = HashMap::new();
    let Some(d) = disease_column(table) else {
        return out;
    };
    let columns = table.columns_with_prefix(prefix);
    for record in table.rows() {
        let Some(disease) = cell(record, d) else {
            continue;
        };
        out.entry(disease.to_string()).or_insert_with(|| {
            columns
                .iter()
                .filter_map(|&i| cell(record, i))
                .map(|v| v.trim().to_string())
                .take(limit)
                .collect()
        });
    }
    out
}

fn first_list(table: &CsvTable, column: &str) -> HashMap<String, Vec<String>> {
    first_text(table, column)
        .into_iter()
        .map(|(disease, raw)| (disease, parse_list_cell(&raw)))
        .collect()
}

fn all_rows(table: &CsvTable, column: &str) -> HashMap<String, Vec<String>> {
    let mut out: HashMap<String, Vec<String>> = HashMap::new();
    let (Some(d), Some(c)) = (disease_column(table), table.column(column)) else {
        return out;
    };
    for record in table.rows() {
        if let (Some(disease), Some(value)) = (cell(record, d), cell(record, c)) {
            out.entry(disease.to_string())
                .or_default()
                .push(value.trim().to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(csv: &str) -> CsvTable {
        CsvTable::from_reader(csv.as_bytes()).unwrap()
    }

    fn sample() -> ReferenceData {
        ReferenceData::from_tables(
            &table(
                "Disease,Description\n\
                 Fungal infection,Fungal infection is a common skin condition.\n\
                 Diabetes ,Diabetes is a chronic condition.\n\
                 Peptic ulcer disease,Sores in the stomach lining.\n",
            ),
            &table(
                ",Disease,Precaution_1,Precaution_2,Precaution_3,Precaution_4\n\
                 0,Fungal infection,bath twice,use detol or neem in bathing water,keep infected area dry,use clean cloths\n\
                 1,Diabetes ,have balanced diet,exercise,,\n",
            ),
            &table(
                "Disease,Medication\n\
                 Fungal infection,\"['Antifungal Cream', 'Fluconazole', 'Terbinafine']\"\n\
                 Diabetes ,Insulin therapy\n",
            ),
            &table(
                "Disease,Diet\n\
                 Fungal infection,\"['Antifungal Diet', 'Probiotics']\"\n",
            ),
            &table(
                ",disease,workout\n\
                 0,Fungal infection,Avoid sugary foods\n\
                 1,Fungal infection,Consume probiotics\n\
                 2,Fungal infection,\n\
                 3,Diabetes ,Regular exercise\n",
            ),
            ReferenceOverrides::bundled(),
        )
    }

    #[test]
    fn test_full_profile() {
        let data = sample();
        let p = data.profile("Fungal infection");
        assert_eq!(p.description, "Fungal infection is a common skin condition.");
        assert_eq!(p.precautions.len(), 4);
        assert_eq!(p.precautions[0], "bath twice");
        assert_eq!(p.medications, vec!["Antifungal Cream", "Fluconazole", "Terbinafine"]);
        assert_eq!(p.diet, vec!["Antifungal Diet", "Probiotics"]);
        assert_eq!(p.workout, vec!["Avoid sugary foods", "Consume probiotics"]);
        assert_eq!(p.specialist, "Dermatologist");
    }

    #[test]
    fn test_name_normalization_bridges_spellings() {
        let data = sample();
        let p = data.profile("Diabetes");
        assert_eq!(p.description, "Diabetes is a chronic condition.");
        assert_eq!(p.precautions, vec!["have balanced diet", "exercise"]);
        // Unparseable list cell becomes a single item.
        assert_eq!(p.medications, vec!["Insulin therapy"]);
        assert_eq!(p.specialist, "Endocrinologist");

        let typo = data.profile("Peptic ulcer diseae");
        assert_eq!(typo.description, "Sores in the stomach lining.");
    }

    #[test]
    fn test_substitutes_take_precedence() {
        let data = sample();
        let p = data.profile("Sinusitis");
        assert!(p.description.starts_with("Sinusitis is an inflammation"));
        assert_eq!(p.specialist, "ENT Specialist");
        assert_eq!(data.profile("Viral Respiratory Infection").specialist, "Pulmonologist");
        assert!(data.resolves("Viral Infection"));
    }

    #[test]
    fn test_missing_disease_falls_back() {
        let data = sample();
        let p = data.profile("Unknown disease");
        assert_eq!(p.description, DESCRIPTION_NOT_AVAILABLE);
        assert!(p.precautions.is_empty());
        assert!(p.medications.is_empty());
        assert!(p.diet.is_empty());
        assert!(p.workout.is_empty());
        assert_eq!(p.specialist, "General Physician");
        assert!(!data.resolves("Unknown disease"));
    }

    #[test]
    fn test_empty_tables() {
        let data = ReferenceData::default();
        let p = data.profile("Fungal infection");
        assert_eq!(p.description, DESCRIPTION_NOT_AVAILABLE);
    }

    #[test]
    fn test_load_from_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let paths = DataPaths::new(dir.path());
        std::fs::create_dir_all(paths.descriptions.parent().unwrap()).unwrap();
        std::fs::write(&paths.descriptions, "Disease,Description\nAcne,Skin condition.\n").unwrap();

        let data = ReferenceData::load(&paths).unwrap();
        assert_eq!(data.profile("Acne").description, "Skin condition.");
        assert!(data.profile("Acne").workout.is_empty());
    }
}
