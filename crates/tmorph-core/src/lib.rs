//! Shared types for tmorph.
//!
//! - [`analysis`] -- Structured morphological analysis and its human-readable form
//! - [`decompose`] -- Parser from the human-readable form back to [`analysis::Analysis`]
//! - [`validate`] -- Structural well-formedness checks

pub mod analysis;
pub mod decompose;
pub mod validate;

pub use analysis::{Affix, Analysis, Feature, InflectionalGroup};
pub use decompose::AnalysisError;
