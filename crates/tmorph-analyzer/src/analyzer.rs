// MorphAnalyzer: surface form in, sorted human-readable analyses out.
//
// Per word:
//   1. compile the word's UTF-8 bytes into a linear acceptor that shares the
//      analyzer's symbol table
//   2. sort the acceptor's arcs by output label and compose it with the
//      analyzer automaton
//   3. project the composition onto its output labels
//   4. enumerate accepting paths from the start state and render them
//
// Generation runs the other way: the analysis is split into the analyzer's
// output symbols, compiled into a label acceptor, composed onto the
// analyzer's output side, and the surface bytes are read off the input tape.
//
// The analyzer automaton is owned and never mutated after loading, so one
// handle can serve any number of words.

use std::path::Path;

use serde::Serialize;
use tmorph_core::Analysis;
use tmorph_core::analysis::strip_proper_feature;
use tmorph_fst::archive::Archive;
use tmorph_fst::compile::{compile_bytes, compile_labels};
use tmorph_fst::compose::compose;
use tmorph_fst::fst::{ArcSortType, ProjectType, Tape, VectorFst};
use tmorph_fst::paths::{EnumerationOptions, PathEnumerator};
use tmorph_fst::render::{Rendered, render};
use tmorph_fst::symbols::SymbolTable;
use tmorph_fst::{Automaton, FstError};

use crate::config::AnalyzerConfig;
use crate::error::AnalyzerError;

/// Result of analyzing one word, in the shape the CLI serializes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalysisReport {
    pub word: String,
    pub accepted: bool,
    pub analyses: Vec<String>,
}

impl AnalysisReport {
    pub fn new(word: &str, rendered: Rendered) -> Self {
        Self {
            word: word.to_string(),
            accepted: rendered.is_accepted(),
            analyses: rendered.into_analyses(),
        }
    }
}

/// Handle owning an analyzer automaton.
pub struct MorphAnalyzer {
    fst: VectorFst,
    limits: EnumerationOptions,
    use_proper_feature: bool,
}

impl MorphAnalyzer {
    /// Wrap an analyzer automaton with default limits, keeping the proper
    /// feature.
    pub fn new(fst: VectorFst) -> Self {
        Self {
            fst,
            limits: EnumerationOptions::default(),
            use_proper_feature: true,
        }
    }

    /// Take the automaton named `name` out of `archive`.
    ///
    /// `path` only labels errors.
    pub fn from_archive(mut archive: Archive, name: &str, path: &Path) -> Result<Self, AnalyzerError> {
        let fst = archive
            .take(name)
            .ok_or_else(|| AnalyzerError::MissingAutomaton {
                name: name.to_string(),
                path: path.to_path_buf(),
            })?;
        tracing::debug!(
            automaton = name,
            states = fst.num_states(),
            arcs = fst.num_arcs(),
            "loaded analyzer automaton"
        );
        Ok(Self::new(fst))
    }

    /// Load the archive and automaton named by `config` and apply its limits
    /// and proper-feature setting.
    pub fn open(config: &AnalyzerConfig) -> Result<Self, AnalyzerError> {
        let path = config.archive_path.as_path();
        let archive = Archive::open(path).map_err(|source| AnalyzerError::ArchiveLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::from_archive(archive, &config.automaton_name, path)?
            .with_limits(config.limits)
            .with_proper_feature(config.use_proper_feature))
    }

    pub fn with_limits(mut self, limits: EnumerationOptions) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_proper_feature(mut self, use_proper_feature: bool) -> Self {
        self.use_proper_feature = use_proper_feature;
        self
    }

    pub fn automaton(&self) -> &VectorFst {
        &self.fst
    }

    /// Analyze `word`.
    ///
    /// Returns [`Rendered::NotAccepted`] when no analysis exists. Analyses are
    /// sorted bytewise and duplicates are kept.
    pub fn analyze(&self, word: &str) -> Result<Rendered, AnalyzerError> {
        let mut input = compile_bytes(word, self.fst.symbols()).map_err(|source| {
            AnalyzerError::WordCompile {
                word: word.to_string(),
                source,
            }
        })?;
        input.arc_sort(ArcSortType::Output);

        let mut output = compose(&input, &self.fst);
        output.project(ProjectType::Output);

        let paths = PathEnumerator::with_options(&output, self.limits).enumerate(output.start())?;
        let rendered = render(&paths);
        tracing::debug!(word, analyses = rendered.analyses().len(), "analyzed word");

        if self.use_proper_feature {
            Ok(rendered)
        } else {
            Ok(rendered.map_analyses(|analysis| strip_proper_feature(&analysis)))
        }
    }

    /// Analyze `word` and decompose every analysis into its structured form.
    pub fn analyze_structured(&self, word: &str) -> Result<Vec<Analysis>, AnalyzerError> {
        self.analyze(word)?
            .into_analyses()
            .iter()
            .map(|analysis| analysis.parse::<Analysis>().map_err(AnalyzerError::from))
            .collect()
    }

    pub fn report(&self, word: &str) -> Result<AnalysisReport, AnalyzerError> {
        Ok(AnalysisReport::new(word, self.analyze(word)?))
    }

    /// Generate the surface form of `analysis`.
    ///
    /// The analysis must be structurally well-formed. A missing proper
    /// marker on the last group is filled in from its part-of-speech tag.
    /// Returns `None` when the analyzer has no symbol for part of the
    /// analysis or no path produces it. Surface forms are lowercased with
    /// Turkish casing rules; when several remain, the bytewise smallest is
    /// returned.
    pub fn generate(&self, analysis: &Analysis) -> Result<Option<String>, AnalyzerError> {
        analysis.validate()?;
        let analysis = analysis.clone().with_default_proper();
        let symbols = self.fst.symbols().ok_or(FstError::MissingSymbolTable)?;

        let mut labels = Vec::new();
        for symbol in analysis.symbols() {
            let Some(label) = symbols.find_label(&symbol) else {
                tracing::debug!(
                    analysis = %analysis,
                    symbol = symbol.as_str(),
                    "analysis symbol not in analyzer"
                );
                return Ok(None);
            };
            labels.push(label);
        }

        let mut input = compile_labels(labels, Some(symbols));
        input.arc_sort(ArcSortType::Input);
        let output = compose(&self.fst, &input);

        let paths = PathEnumerator::with_options(&output, self.limits)
            .on_tape(Tape::Input)
            .enumerate(output.start())?;
        let mut surfaces: Vec<String> = paths
            .iter()
            .map(|path| turkish_lowercase(&surface_text(path, symbols)))
            .collect();
        surfaces.sort_unstable();
        surfaces.dedup();
        tracing::debug!(analysis = %analysis, surface_forms = surfaces.len(), "generated");
        Ok(surfaces.into_iter().next())
    }
}

/// Decode the input side of a path. Symbols whose label is a byte value
/// contribute that byte; any other symbol contributes its text.
fn surface_text(path: &[&str], symbols: &SymbolTable) -> String {
    let mut bytes = Vec::new();
    for text in path {
        match symbols.find_label(text).and_then(|label| u8::try_from(label).ok()) {
            Some(byte) => bytes.push(byte),
            None => bytes.extend_from_slice(text.as_bytes()),
        }
    }
    String::from_utf8_lossy(&bytes).into_owned()
}

/// Lowercase with the Turkish dotted and dotless i: `İ` becomes `i` and `I`
/// becomes `ı`.
pub fn turkish_lowercase(text: &str) -> String {
    text.replace('İ', "i").replace('I', "ı").to_lowercase()
}

/// Open the analyzer named by `config` and analyze `config.word`.
pub fn analyze_config(config: &AnalyzerConfig) -> Result<Rendered, AnalyzerError> {
    MorphAnalyzer::open(config)?.analyze(&config.word)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tmorph_fst::symbols::SymbolTable;
    use tmorph_fst::text::parse_att;
    use tmorph_fst::{FstError, MAX_ANALYSIS_COUNT};

    /// Two readings of "ev" and one of "evi".
    fn analyzer() -> MorphAnalyzer {
        let mut symbols = SymbolTable::with_epsilon();
        for byte in [b'e', b'v', b'i'] {
            symbols.add_pair(u32::from(byte), &char::from(byte).to_string());
        }
        for text in ["(ev[NN]", "+[Case=Nom]", "+[Case=Acc]", ")+[Proper=False]", ")+[Proper=True]"] {
            symbols.add_symbol(text);
        }
        let source = "\
0 1 e (ev[NN]
1 2 v <eps>
2 3 <eps> +[Case=Nom]
2 4 i +[Case=Acc]
3 5 <eps> )+[Proper=False]
3 5 <eps> )+[Proper=True]
4 5 <eps> )+[Proper=False]
5
";
        MorphAnalyzer::new(parse_att(source, &symbols, false).unwrap())
    }

    #[test]
    fn analyze_accepted_word() {
        let rendered = analyzer().analyze("ev").unwrap();
        assert_eq!(
            rendered.analyses(),
            ["(ev[NN]+[Case=Nom])+[Proper=False]", "(ev[NN]+[Case=Nom])+[Proper=True]"]
        );
    }

    #[test]
    fn analyze_unknown_word() {
        assert_eq!(analyzer().analyze("ve").unwrap(), Rendered::NotAccepted);
        assert_eq!(analyzer().analyze("").unwrap(), Rendered::NotAccepted);
    }

    #[test]
    fn strip_proper_keeps_duplicates() {
        let rendered = analyzer().with_proper_feature(false).analyze("ev").unwrap();
        assert_eq!(rendered.analyses(), ["(ev[NN]+[Case=Nom])", "(ev[NN]+[Case=Nom])"]);
    }

    #[test]
    fn structured_analyses() {
        let analyses = analyzer().analyze_structured("evi").unwrap();
        assert_eq!(analyses.len(), 1);
        assert_eq!(analyses[0].root(), Some("ev"));
        assert_eq!(analyses[0].igs[0].inflections[0].feature.value, "Acc");
        assert_eq!(analyses[0].igs[0].proper, Some(false));
    }

    #[test]
    fn nul_byte_fails_to_compile() {
        let err = analyzer().analyze("e\0v").unwrap_err();
        assert!(matches!(err, AnalyzerError::WordCompile { .. }));
    }

    #[test]
    fn limit_is_applied() {
        let limits = EnumerationOptions {
            max_analyses: Some(1),
            ..EnumerationOptions::default()
        };
        let err = analyzer().with_limits(limits).analyze("ev").unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Analysis(FstError::TooManyAnalyses { limit: 1 })
        ));
        assert_eq!(EnumerationOptions::default().max_analyses, Some(MAX_ANALYSIS_COUNT));
    }

    #[test]
    fn report_shape() {
        let report = analyzer().report("vi").unwrap();
        assert_eq!(
            report,
            AnalysisReport {
                word: "vi".to_string(),
                accepted: false,
                analyses: Vec::new(),
            }
        );
    }

    fn generate(human_readable: &str) -> Option<String> {
        let analysis: Analysis = human_readable.parse().unwrap();
        analyzer().generate(&analysis).unwrap()
    }

    #[test]
    fn generate_surface_forms() {
        assert_eq!(generate("(ev[NN]+[Case=Nom])+[Proper=False]").as_deref(), Some("ev"));
        assert_eq!(generate("(ev[NN]+[Case=Nom])+[Proper=True]").as_deref(), Some("ev"));
        assert_eq!(generate("(ev[NN]+[Case=Acc])+[Proper=False]").as_deref(), Some("evi"));
    }

    #[test]
    fn generate_fills_in_proper_marker() {
        assert_eq!(generate("(ev[NN]+[Case=Acc])").as_deref(), Some("evi"));
    }

    #[test]
    fn generate_without_path_or_symbol() {
        // Every symbol exists, but no path combines them.
        assert_eq!(generate("(ev[NN]+[Case=Acc])+[Proper=True]"), None);
        // "+[Case=Loc]" is not a symbol of the analyzer.
        assert_eq!(generate("(ev[NN]+[Case=Loc])+[Proper=False]"), None);
        assert_eq!(generate("(kitap[NN]+[Case=Nom])"), None);
    }

    #[test]
    fn generate_rejects_ill_formed_analysis() {
        let err = analyzer().generate(&Analysis::default()).unwrap_err();
        assert!(matches!(
            err,
            AnalyzerError::Decompose(tmorph_core::AnalysisError::Invalid(_))
        ));
    }

    #[test]
    fn generate_and_analyze_agree() {
        let analyzer = analyzer();
        for analysis in analyzer.analyze_structured("evi").unwrap() {
            assert_eq!(analyzer.generate(&analysis).unwrap().as_deref(), Some("evi"));
        }
    }

    #[test]
    fn turkish_lowercase_handles_dotted_i() {
        assert_eq!(turkish_lowercase("IŞIK"), "ışık");
        assert_eq!(turkish_lowercase("İSTANBUL"), "istanbul");
        assert_eq!(turkish_lowercase("ev"), "ev");
    }

    #[test]
    fn surface_text_decodes_byte_labels() {
        let mut symbols = SymbolTable::with_epsilon();
        symbols.add_pair(0xC5, "b197");
        symbols.add_pair(0x9F, "b159");
        symbols.add_pair(u32::from(b'a'), "a");
        symbols.add_pair(1000, "xyz");
        let path = ["b197", "b159", "a", "xyz"];
        assert_eq!(surface_text(&path, &symbols), "şaxyz");
    }

    #[test]
    fn missing_automaton_in_archive() {
        let err = MorphAnalyzer::from_archive(Archive::new(), "nope", Path::new("x.far"))
            .err()
            .unwrap();
        assert!(matches!(err, AnalyzerError::MissingAutomaton { ref name, .. } if name == "nope"));
    }
}
