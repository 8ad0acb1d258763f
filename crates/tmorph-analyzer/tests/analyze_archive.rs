// End-to-end analysis through an archive written to disk.

use std::path::PathBuf;

use tempfile::TempDir;
use tmorph_analyzer::config::DEFAULT_AUTOMATON_NAME;
use tmorph_core::Analysis;
use tmorph_analyzer::{AnalyzerConfig, AnalyzerError, MorphAnalyzer, analyze_config};
use tmorph_fst::archive::Archive;
use tmorph_fst::paths::EnumerationOptions;
use tmorph_fst::render::Rendered;
use tmorph_fst::symbols::SymbolTable;
use tmorph_fst::text::parse_att;
use tmorph_fst::{FstError, VectorFst};

const ARABA_LOC: &str =
    "(araba[NN]+lAr[PersonNumber=A3pl]+[Possessive=Pnon]+DA[Case=Loc])";
const YASA_ABL: &str = "(yaşa[VB]+[Polarity=Pos])([NOMP]-DHk[Derivation=PastNom]\
                        +lAr[PersonNumber=A3pl]+Hm[Possessive=P1sg]+NDAn[Case=Abl]\
                        +[Copula=PresCop]+[PersonNumber=V3pl])";

const PROPER_FALSE: &str = ")+[Proper=False]";
const PROPER_TRUE: &str = ")+[Proper=True]";

/// Analyzer for "arabalarda" and "yaşadıklarımdanlar".
///
/// Every surface byte gets its own arc. The analysis symbols ride on the
/// first arcs, one per arc, and the proper feature closes the path on a
/// trailing epsilon arc.
fn toy_analyzer() -> VectorFst {
    let words = [
        ("arabalarda", ARABA_LOC, &[PROPER_FALSE, PROPER_TRUE][..]),
        ("yaşadıklarımdanlar", YASA_ABL, &[PROPER_FALSE][..]),
    ];

    let mut symbols = SymbolTable::with_epsilon();
    for byte in 1..=u8::MAX {
        symbols.add_pair(u32::from(byte), &format!("b{byte}"));
    }
    symbols.add_symbol(PROPER_FALSE);
    symbols.add_symbol(PROPER_TRUE);

    let mut source = String::new();
    let mut next = 1;
    for (word, analysis, propers) in words {
        let outputs = analysis.parse::<Analysis>().unwrap().symbols();
        for output in &outputs {
            symbols.add_symbol(output);
        }
        let mut state = 0;
        for (i, byte) in word.bytes().enumerate() {
            let output = outputs.get(i).map_or("<eps>", String::as_str);
            source.push_str(&format!("{state} {next} b{byte} {output}\n"));
            state = next;
            next += 1;
        }
        let accept = next;
        next += 1;
        for proper in propers {
            source.push_str(&format!("{state} {accept} <eps> {proper}\n"));
        }
        source.push_str(&format!("{accept}\n"));
    }
    parse_att(&source, &symbols, false).unwrap()
}

fn write_archive(name: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turkish.far");
    let mut archive = Archive::new();
    archive.insert(name, toy_analyzer()).unwrap();
    archive.write(&path).unwrap();
    (dir, path)
}

fn config(word: &str, path: PathBuf) -> AnalyzerConfig {
    AnalyzerConfig {
        archive_path: path,
        ..AnalyzerConfig::for_word(word)
    }
}

#[test]
fn analyzes_from_archive() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let rendered = analyze_config(&config("arabalarda", path)).unwrap();
    assert_eq!(
        rendered.analyses(),
        [
            format!("{ARABA_LOC}+[Proper=False]"),
            format!("{ARABA_LOC}+[Proper=True]"),
        ]
    );
}

#[test]
fn multibyte_word_with_derivation() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let analyzer = MorphAnalyzer::open(&config("yaşadıklarımdanlar", path)).unwrap();
    let analyses = analyzer.analyze_structured("yaşadıklarımdanlar").unwrap();
    assert_eq!(analyses.len(), 1);
    assert_eq!(analyses[0].igs.len(), 2);
    assert_eq!(analyses[0].root(), Some("yaşa"));
    assert_eq!(analyses[0].final_pos(), Some("NOMP"));
    assert_eq!(analyses[0].to_string(), format!("{YASA_ABL}+[Proper=False]"));
}

#[test]
fn handle_serves_many_words() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let analyzer = MorphAnalyzer::open(&config("", path)).unwrap();
    assert!(analyzer.analyze("arabalarda").unwrap().is_accepted());
    assert_eq!(analyzer.analyze("araba").unwrap(), Rendered::NotAccepted);
    assert!(analyzer.analyze("yaşadıklarımdanlar").unwrap().is_accepted());
}

#[test]
fn not_accepted_word() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let rendered = analyze_config(&config("kitaplar", path)).unwrap();
    assert_eq!(rendered, Rendered::NotAccepted);
}

#[test]
fn proper_feature_stripped() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let config = AnalyzerConfig {
        use_proper_feature: false,
        ..config("arabalarda", path)
    };
    let rendered = analyze_config(&config).unwrap();
    assert_eq!(rendered.analyses(), [ARABA_LOC, ARABA_LOC]);
}

#[test]
fn missing_automaton() {
    let (_dir, path) = write_archive("english_analyzer");
    let err = analyze_config(&config("arabalarda", path)).unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::MissingAutomaton { ref name, .. } if name == DEFAULT_AUTOMATON_NAME
    ));
}

#[test]
fn custom_automaton_name() {
    let (_dir, path) = write_archive("english_analyzer");
    let config = AnalyzerConfig {
        automaton_name: "english_analyzer".to_string(),
        ..config("arabalarda", path)
    };
    assert!(analyze_config(&config).unwrap().is_accepted());
}

#[test]
fn missing_archive_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = analyze_config(&config("arabalarda", dir.path().join("absent.far"))).unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::ArchiveLoad {
            source: FstError::Io(_),
            ..
        }
    ));
}

#[test]
fn corrupt_archive_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("turkish.far");
    std::fs::write(&path, b"definitely not an archive").unwrap();
    let err = analyze_config(&config("arabalarda", path)).unwrap_err();
    assert!(matches!(err, AnalyzerError::ArchiveLoad { .. }));
}

#[test]
fn missing_symbol_table_surfaces_as_analysis_error() {
    let mut fst = toy_analyzer();
    fst.set_symbols(None);
    let err = MorphAnalyzer::new(fst).analyze("arabalarda").unwrap_err();
    assert!(matches!(err, AnalyzerError::Analysis(FstError::MissingSymbolTable)));
}

fn generate(human_readable: &str) -> Option<String> {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let analyzer = MorphAnalyzer::open(&config("", path)).unwrap();
    let analysis: Analysis = human_readable.parse().unwrap();
    analyzer.generate(&analysis).unwrap()
}

#[test]
fn generates_surface_form() {
    assert_eq!(generate(ARABA_LOC).as_deref(), Some("arabalarda"));
    assert_eq!(
        generate(&format!("{ARABA_LOC}+[Proper=True]")).as_deref(),
        Some("arabalarda")
    );
}

#[test]
fn generates_multibyte_surface_form() {
    assert_eq!(generate(YASA_ABL).as_deref(), Some("yaşadıklarımdanlar"));
}

#[test]
fn generation_of_unknown_root_is_empty() {
    assert_eq!(generate("(kitap[NN]+[Case=Nom])"), None);
    assert_eq!(generate(&format!("{YASA_ABL}+[Proper=True]")), None);
}

#[test]
fn analysis_round_trips_through_generation() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let analyzer = MorphAnalyzer::open(&config("", path)).unwrap();
    for word in ["arabalarda", "yaşadıklarımdanlar"] {
        for analysis in analyzer.analyze_structured(word).unwrap() {
            assert_eq!(analyzer.generate(&analysis).unwrap().as_deref(), Some(word));
        }
    }
}

#[test]
fn cap_from_config() {
    let (_dir, path) = write_archive(DEFAULT_AUTOMATON_NAME);
    let config = AnalyzerConfig {
        limits: EnumerationOptions {
            max_analyses: Some(1),
            ..EnumerationOptions::default()
        },
        ..config("arabalarda", path)
    };
    let err = analyze_config(&config).unwrap_err();
    assert!(matches!(
        err,
        AnalyzerError::Analysis(FstError::TooManyAnalyses { limit: 1 })
    ));
}
