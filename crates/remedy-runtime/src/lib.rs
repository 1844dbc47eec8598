//! Remedy runtime: catalog snapshot and end-to-end prediction.
//!
//! A `Catalog` bundles the symptom index and reference tables loaded from one
//! data directory. `Pipeline` turns raw user text into a `PredictionResponse`
//! against a catalog snapshot.

pub mod catalog;
pub mod pipeline;
pub mod types;

pub use catalog::Catalog;
pub use pipeline::Pipeline;
pub use types::*;
