//! Header-addressed CSV tables.

use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use remedy_core::{Error, Result};
use remedy_match::SymptomRow;

/// An in-memory CSV table whose columns are looked up by header name.
#[derive(Debug, Clone, Default)]
pub struct CsvTable {
    headers: Vec<String>,
    rows: Vec<StringRecord>,
}

impl CsvTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
            .map_err(|e| Error::Dataset(format!("{}: {}", path.display(), e)))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers = reader
            .headers()
            .map_err(|e| Error::Dataset(e.to_string()))?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();

        let rows = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|e| Error::Dataset(e.to_string()))?;

        Ok(Self { headers, rows })
    }

    /// Load a table that may legitimately be absent. Missing files yield an empty table.
    pub fn load_optional(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::warn!("Reference table missing: {}", path.display());
            return Ok(Self::default());
        }
        Self::from_path(path)
    }

    /// Index of the column named `name` (case-insensitive).
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(name))
    }

    /// Indices of every column whose name starts with `prefix` (case-insensitive), in order.
    pub fn columns_with_prefix(&self, prefix: &str) -> Vec<usize> {
        let prefix = prefix.to_ascii_lowercase();
        self.headers
            .iter()
            .enumerate()
            .filter(|(_, h)| h.to_ascii_lowercase().starts_with(&prefix))
            .map(|(i, _)| i)
            .collect()
    }

    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Non-blank cell at `idx`, untrimmed.
pub(crate) fn cell(record: &StringRecord, idx: usize) -> Option<&str> {
    record.get(idx).filter(|v| !v.trim().is_empty())
}

/// Read the disease/symptom table into rows for `SymptomIndex::build`.
pub fn load_symptom_rows(path: &Path) -> Result<Vec<SymptomRow>> {
    let table = CsvTable::from_path(path)?;
    symptom_rows(&table)
        .map_err(|e| Error::Dataset(format!("{}: {}", path.display(), e)))
}

pub(crate) fn symptom_rows(table: &CsvTable) -> Result<Vec<SymptomRow>> {
    let disease_col = table
        .column("Disease")
        .ok_or_else(|| Error::Dataset("missing Disease column".into()))?;
    let symptom_cols = table.columns_with_prefix("Symptom_");
    if symptom_cols.is_empty() {
        return Err(Error::Dataset("no Symptom_* columns".into()));
    }

    let rows = table
        .rows()
        .iter()
        .filter_map(|record| {
            let disease = cell(record, disease_col)?;
            let symptoms = symptom_cols
                .iter()
                .filter_map(|&i| cell(record, i))
                .map(str::to_string)
                .collect();
            Some(SymptomRow {
                disease: disease.to_string(),
                symptoms,
            })
        })
        .collect();

    Ok(rows)
}
