// tmorph-analyze: Morphological analysis of words.
//
// Analyzes each --word (or each stdin line when none is given) and prints
// its sorted analyses, or a not-accepted notice.
//
// Usage:
//   tmorph-analyze --word WORD [--far-path PATH] [--fst-name NAME]
//                  [--no-proper] [--format text|json] [--max-analyses N]

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use clap::Parser;
use tmorph_analyzer::config::DEFAULT_AUTOMATON_NAME;
use tmorph_analyzer::{AnalyzerConfig, MorphAnalyzer};
use tmorph_cli::{OutputFormat, write_report};
use tmorph_fst::MAX_ANALYSIS_COUNT;
use tmorph_fst::paths::EnumerationOptions;

#[derive(Parser)]
#[command(name = "tmorph-analyze")]
#[command(about = "Morphological analysis of Turkish words")]
#[command(version)]
struct Cli {
    /// Word to analyze (repeatable). Reads stdin, one word per line, when absent
    #[arg(short, long)]
    word: Vec<String>,

    /// Archive holding the analyzer automaton, or a directory containing turkish.far
    #[arg(long)]
    far_path: Option<PathBuf>,

    /// Name of the analyzer automaton within the archive
    #[arg(long, default_value = DEFAULT_AUTOMATON_NAME)]
    fst_name: String,

    /// Drop +[Proper=True]/+[Proper=False] from the analyses
    #[arg(long)]
    no_proper: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Fail when a word has more analyses than this (0 disables the cap)
    #[arg(long, default_value_t = MAX_ANALYSIS_COUNT, env = "TMORPH_MAX_ANALYSES")]
    max_analyses: usize,
}

fn main() {
    tmorph_cli::init_tracing();
    let cli = Cli::parse();

    let archive_path = tmorph_cli::find_archive(cli.far_path.as_deref())
        .unwrap_or_else(|e| tmorph_cli::fatal(&e));

    let config = AnalyzerConfig {
        archive_path,
        automaton_name: cli.fst_name.clone(),
        limits: EnumerationOptions {
            max_analyses: (cli.max_analyses > 0).then_some(cli.max_analyses),
            ..EnumerationOptions::default()
        },
        use_proper_feature: !cli.no_proper,
        ..AnalyzerConfig::default()
    };
    let analyzer = MorphAnalyzer::open(&config).unwrap_or_else(|e| tmorph_cli::fatal(&e.to_string()));

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());

    let mut analyze_word = |word: &str| {
        let report = analyzer
            .report(word)
            .unwrap_or_else(|e| tmorph_cli::fatal(&e.to_string()));
        if let Err(e) = write_report(&mut out, cli.format, &report) {
            tmorph_cli::fatal(&format!("failed to write output: {e}"));
        }
    };

    if cli.word.is_empty() {
        for line in io::stdin().lock().lines() {
            let line = line.unwrap_or_else(|e| tmorph_cli::fatal(&format!("error reading stdin: {e}")));
            let word = line.trim();
            if word.is_empty() {
                continue;
            }
            analyze_word(word);
        }
    } else {
        for word in &cli.word {
            analyze_word(word);
        }
    }

    if let Err(e) = out.flush() {
        tmorph_cli::fatal(&format!("failed to flush output: {e}"));
    }
}
