//! Weighted finite-state automaton engine for tmorph.
//!
//! This crate holds the automata a morphological analyzer is made of, the
//! operations that turn an input word into an analysis automaton, and the
//! traversal that reads analyses back out of it.
//!
//! # Architecture
//!
//! - [`weight`] -- Tropical weights (only the zero predicate matters here)
//! - [`symbols`] -- Symbol table (label-to-text and text-to-label mapping)
//! - [`fst`] -- Index-addressed mutable automaton and its in-place operations
//! - [`compile`] -- Word-to-acceptor compilation
//! - [`compose`] -- Composition of two automata
//! - [`text`] -- AT&T text format reader
//! - [`format`] -- Archive header parsing and validation
//! - [`record`] -- Fixed-size state/arc records of the archive body
//! - [`archive`] -- Archive of named automata
//! - [`paths`] -- Accepting-path enumeration
//! - [`render`] -- Rendering of enumerated paths into sorted strings

pub mod archive;
pub mod compile;
pub mod compose;
pub mod format;
pub mod fst;
pub mod paths;
pub mod record;
pub mod render;
pub mod symbols;
pub mod text;
pub mod weight;

pub use fst::{Arc, Tape, VectorFst};
pub use paths::{PathEnumerator, Sequence};
pub use render::Rendered;
pub use symbols::SymbolTable;
pub use weight::TropicalWeight;

/// Arc label. Label 0 is epsilon ("no symbol").
pub type Label = u32;

/// State id: an index into the automaton's state arena.
pub type StateId = u32;

/// The epsilon label.
pub const EPSILON: Label = 0;

/// Default cap on the number of analyses a single enumeration may produce.
pub const MAX_ANALYSIS_COUNT: usize = 100_000;

/// Error type for automaton loading, construction and traversal.
#[derive(Debug, thiserror::Error)]
pub enum FstError {
    #[error("invalid magic number in archive header")]
    InvalidMagic,
    #[error("unsupported archive version {0}")]
    UnsupportedVersion(u16),
    #[error("archive too short: expected at least {expected} bytes, got {actual}")]
    TooShort { expected: usize, actual: usize },
    #[error("invalid symbol table: {0}")]
    InvalidSymbolTable(String),
    #[error("invalid automaton '{name}': {reason}")]
    InvalidAutomaton { name: String, reason: String },
    #[error("duplicate automaton name '{0}' in archive")]
    DuplicateName(String),
    #[error("line {line}: {reason}")]
    InvalidText { line: usize, reason: String },
    #[error("cannot compile input: {0}")]
    InvalidInput(String),
    #[error("automaton has no symbol table")]
    MissingSymbolTable,
    #[error("cannot find the symbol for label {label} in the symbol table")]
    UnresolvedSymbol { label: Label },
    #[error("state {state} out of range ({num_states} states)")]
    StateOutOfRange { state: StateId, num_states: usize },
    #[error("cycle through state {state} reached during path enumeration")]
    Cycle { state: StateId },
    #[error("too many analyses: more than {limit}")]
    TooManyAnalyses { limit: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read-only view of an automaton, as needed by path enumeration.
///
/// Implementations must return arcs in a stable order. The order only
/// influences the order in which paths are discovered, never the rendered
/// output, which is always sorted.
pub trait Automaton {
    /// The start state, or `None` if the automaton has none.
    fn start(&self) -> Option<StateId>;

    /// Number of states. Valid state ids are `0..num_states()`.
    fn num_states(&self) -> usize;

    /// Outgoing arcs of `state`. Panics if `state` is out of range.
    fn arcs(&self, state: StateId) -> &[Arc];

    /// Whether `state` is accepting, i.e. its final weight is not zero.
    /// Panics if `state` is out of range.
    fn is_final(&self, state: StateId) -> bool;

    /// Resolve a nonzero label to its symbol text.
    ///
    /// A label missing from the symbol table means the automaton and its
    /// symbols do not belong together; callers treat this as fatal.
    fn resolve(&self, label: Label) -> Result<&str, FstError>;
}
