//! Remedy Core: shared error type and configuration.

pub mod config;
pub mod error;

pub use config::{DataPaths, MatchSettings, RemedyConfig};
pub use error::{Error, Result};
