//! Remedy Reference: read-only disease metadata.
//!
//! Loads the flat reference tables, bridges naming mismatches between the
//! scorer's disease labels and the table keys, and assembles the per-disease
//! care profile returned with every prediction.

pub mod accessor;
pub mod list_literal;
pub mod overrides;
pub mod table;

pub use accessor::{DiseaseProfile, ReferenceData, DESCRIPTION_NOT_AVAILABLE};
pub use list_literal::{parse_list_cell, parse_list_literal};
pub use overrides::{ReferenceOverrides, SubstituteRecord};
pub use table::{load_symptom_rows, CsvTable};
