use std::path::PathBuf;

use tmorph_core::AnalysisError;
use tmorph_fst::FstError;

/// Error type for analyzer loading and word analysis.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    /// The archive could not be read or is malformed.
    #[error("failed to load archive {}: {source}", path.display())]
    ArchiveLoad {
        path: PathBuf,
        #[source]
        source: FstError,
    },

    /// The archive has no automaton under the requested name.
    #[error("archive {} has no automaton named '{name}'", path.display())]
    MissingAutomaton { name: String, path: PathBuf },

    /// The word could not be turned into an input acceptor.
    #[error("failed to compile word '{word}': {source}")]
    WordCompile {
        word: String,
        #[source]
        source: FstError,
    },

    /// Path enumeration failed (unresolved symbol, missing symbol table,
    /// cycle, too many analyses).
    #[error(transparent)]
    Analysis(#[from] FstError),

    /// A rendered analysis is not in the human-readable analysis format, or
    /// an analysis handed to generation is ill-formed.
    #[error(transparent)]
    Decompose(#[from] AnalysisError),
}
