// tmorph-far: Build and inspect analyzer archives.
//
// Usage:
//   tmorph-far build --symbols SYMS --fst NAME=FILE [--fst NAME=FILE ...] -o OUT
//   tmorph-far list ARCHIVE

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tmorph_fst::archive::Archive;
use tmorph_fst::symbols::SymbolTable;
use tmorph_fst::text::parse_att;
use tmorph_fst::{Automaton, FstError};

#[derive(Parser)]
#[command(name = "tmorph-far")]
#[command(about = "Build and inspect tmorph automaton archives")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile AT&T text automata into an archive
    Build {
        /// Symbol table text file (`symbol key` per line)
        #[arg(short, long)]
        symbols: PathBuf,

        /// Automaton to add, as NAME=FILE (repeatable)
        #[arg(long = "fst", required = true, value_parser = tmorph_cli::parse_named_path)]
        fsts: Vec<(String, PathBuf)>,

        /// Arc lines carry a single label
        #[arg(long)]
        acceptor: bool,

        /// Output archive path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// List the automata in an archive
    List {
        /// Archive path
        archive: PathBuf,
    },
}

fn read_text(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|e| format!("failed to read {}: {e}", path.display()))
}

fn build(
    symbols_path: &Path,
    fsts: &[(String, PathBuf)],
    acceptor: bool,
    output: &Path,
) -> Result<(), String> {
    let symbols = SymbolTable::parse_text(&read_text(symbols_path)?)
        .map_err(|e| format!("{}: {e}", symbols_path.display()))?;

    let mut archive = Archive::new();
    for (name, path) in fsts {
        let fst = parse_att(&read_text(path)?, &symbols, acceptor)
            .map_err(|e| format!("{}: {e}", path.display()))?;
        tracing::info!(
            name = name.as_str(),
            states = fst.num_states(),
            arcs = fst.num_arcs(),
            "compiled automaton"
        );
        archive.insert(name.clone(), fst).map_err(|e| e.to_string())?;
    }

    archive
        .write(output)
        .map_err(|e: FstError| format!("failed to write {}: {e}", output.display()))
}

fn list(path: &Path) -> Result<(), String> {
    let archive = Archive::open(path).map_err(|e| format!("{}: {e}", path.display()))?;
    for name in archive.names() {
        if let Some(fst) = archive.get(name) {
            let start = fst
                .start()
                .map_or_else(|| "none".to_string(), |s| s.to_string());
            let symbols = fst.symbols().map_or(0, SymbolTable::len);
            println!(
                "{name}\tstates={}\tarcs={}\tstart={start}\tsymbols={symbols}",
                fst.num_states(),
                fst.num_arcs()
            );
        }
    }
    Ok(())
}

fn main() {
    tmorph_cli::init_tracing();
    let cli = Cli::parse();

    let result = match &cli.command {
        Commands::Build {
            symbols,
            fsts,
            acceptor,
            output,
        } => build(symbols, fsts, *acceptor, output),
        Commands::List { archive } => list(archive),
    };

    if let Err(e) = result {
        tmorph_cli::fatal(&e);
    }
}
