// Analyzer configuration.

use std::path::PathBuf;

use tmorph_fst::MAX_ANALYSIS_COUNT;
use tmorph_fst::paths::EnumerationOptions;

/// Name of the analyzer automaton inside the default archive.
pub const DEFAULT_AUTOMATON_NAME: &str = "turkish_morphological_analyzer";

/// File name of the default archive.
pub const DEFAULT_ARCHIVE_FILE: &str = "turkish.far";

/// Everything needed to analyze one word from an archive on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzerConfig {
    /// Surface form to analyze.
    pub word: String,

    /// Archive holding the analyzer automaton.
    pub archive_path: PathBuf,

    /// Name of the analyzer automaton within the archive.
    pub automaton_name: String,

    /// Enumeration limits and query-state behavior.
    pub limits: EnumerationOptions,

    /// Keep `+[Proper=True]`/`+[Proper=False]` in the output.
    pub use_proper_feature: bool,
}

impl AnalyzerConfig {
    /// Config for `word` with every other field at its default.
    pub fn for_word(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            word: String::new(),
            archive_path: PathBuf::from(DEFAULT_ARCHIVE_FILE),
            automaton_name: DEFAULT_AUTOMATON_NAME.to_string(),
            limits: EnumerationOptions {
                max_analyses: Some(MAX_ANALYSIS_COUNT),
                accept_final_query_state: false,
            },
            use_proper_feature: true,
        }
    }
}
