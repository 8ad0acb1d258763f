//! Morphological analyzer for tmorph.
//!
//! Loads a named analyzer automaton from an archive, turns surface forms
//! into sorted human-readable analyses, and generates surface forms back
//! from structured analyses.
//!
//! - [`config`] -- Analyzer configuration and defaults
//! - [`error`] -- Error type for loading and analysis
//! - [`analyzer`] -- The [`MorphAnalyzer`] handle

pub mod analyzer;
pub mod config;
pub mod error;

pub use analyzer::{AnalysisReport, MorphAnalyzer, analyze_config, turkish_lowercase};
pub use config::AnalyzerConfig;
pub use error::AnalyzerError;
