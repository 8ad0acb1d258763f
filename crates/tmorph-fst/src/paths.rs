// Accepting-path enumeration.
//
// Walks an acyclic automaton depth-first and collects, for every path that
// reaches an accepting state, the symbols emitted along it. Results are
// memoized per state, so converging paths (diamonds) share the work done
// below the point where they meet.
//
// Traversal shape, which callers rely on:
// - Only arc destinations are tested for acceptance. The queried state's own
//   finality is ignored unless `accept_final_query_state` is set.
// - Reaching an accepting destination completes exactly one path; arcs
//   leaving that destination are not followed.
// - Epsilon arcs (label 0) are traversed but emit nothing.
// - Labels are read from one tape, the input tape unless told otherwise.
// - Identical sequences reached through different paths are all kept.

use std::rc::Rc;

use hashbrown::HashMap;

use crate::fst::Tape;
use crate::{Automaton, EPSILON, FstError, MAX_ANALYSIS_COUNT, StateId};

/// Symbols emitted along one accepting path, borrowed from the symbol table.
pub type Sequence<'a> = Vec<&'a str>;

/// Knobs for [`PathEnumerator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationOptions {
    /// Fail with [`FstError::TooManyAnalyses`] once any intermediate or final
    /// result holds more sequences than this. `None` disables the cap.
    pub max_analyses: Option<usize>,
    /// Also report the empty sequence when the queried state is itself
    /// accepting. Off by default: a start state that is final with no arcs
    /// then yields no sequences at all.
    pub accept_final_query_state: bool,
}

impl Default for EnumerationOptions {
    fn default() -> Self {
        Self {
            max_analyses: Some(MAX_ANALYSIS_COUNT),
            accept_final_query_state: false,
        }
    }
}

enum Slot<'a> {
    /// On the current DFS stack; reaching it again means a cycle.
    Visiting,
    Done(Rc<[Sequence<'a>]>),
}

/// Enumerates the symbol sequences of all accepting paths from a state.
///
/// The enumerator reads the arc's input label unless [`on_tape`] picks the
/// output side; on a projected automaton both labels are the same. Results
/// are cached by state id for the lifetime of the enumerator, which is sound
/// because the automaton is borrowed immutably.
///
/// [`on_tape`]: PathEnumerator::on_tape
pub struct PathEnumerator<'a, A: Automaton + ?Sized> {
    fsa: &'a A,
    options: EnumerationOptions,
    tape: Tape,
    memo: HashMap<StateId, Slot<'a>>,
    memo_hits: usize,
}

impl<'a, A: Automaton + ?Sized> PathEnumerator<'a, A> {
    pub fn new(fsa: &'a A) -> Self {
        Self::with_options(fsa, EnumerationOptions::default())
    }

    pub fn with_options(fsa: &'a A, options: EnumerationOptions) -> Self {
        Self {
            fsa,
            options,
            tape: Tape::Input,
            memo: HashMap::new(),
            memo_hits: 0,
        }
    }

    /// Read labels from `tape`. Cached results are dropped when the tape
    /// changes.
    pub fn on_tape(mut self, tape: Tape) -> Self {
        if tape != self.tape {
            self.memo.clear();
        }
        self.tape = tape;
        self
    }

    /// All symbol sequences along accepting paths leaving `state`, in arc
    /// order. `None` yields no sequences.
    ///
    /// Fails without partial results if `state` is not a state of the
    /// automaton, if a reachable nonzero label has no symbol, if a cycle is
    /// reached, or if the analysis cap is exceeded.
    pub fn enumerate(&mut self, state: Option<StateId>) -> Result<Vec<Sequence<'a>>, FstError> {
        let Some(state) = state else {
            return Ok(Vec::new());
        };
        let num_states = self.fsa.num_states();
        if state as usize >= num_states {
            return Err(FstError::StateOutOfRange { state, num_states });
        }

        let result = self.paths_from(state).and_then(|paths| {
            let mut sequences = Vec::with_capacity(paths.len() + 1);
            if self.options.accept_final_query_state && self.fsa.is_final(state) {
                sequences.push(Vec::new());
            }
            sequences.extend(paths.iter().cloned());
            self.check_limit(sequences.len())?;
            Ok(sequences)
        });

        match &result {
            Ok(sequences) => tracing::debug!(
                state,
                sequences = sequences.len(),
                memoized_states = self.memo.len(),
                memo_hits = self.memo_hits,
                "enumerated accepting paths"
            ),
            Err(err) => {
                tracing::debug!(state, error = %err, "path enumeration failed");
                // Drop half-finished `Visiting` slots so the enumerator stays usable.
                self.memo.clear();
            }
        }
        result
    }

    fn paths_from(&mut self, state: StateId) -> Result<Rc<[Sequence<'a>]>, FstError> {
        match self.memo.get(&state) {
            Some(Slot::Done(paths)) => {
                let paths = Rc::clone(paths);
                self.memo_hits += 1;
                return Ok(paths);
            }
            Some(Slot::Visiting) => return Err(FstError::Cycle { state }),
            None => {}
        }
        self.memo.insert(state, Slot::Visiting);

        let fsa = self.fsa;
        let mut paths: Vec<Sequence<'a>> = Vec::new();
        for arc in fsa.arcs(state) {
            let label = arc.label(self.tape);
            let symbol = if label == EPSILON {
                None
            } else {
                Some(fsa.resolve(label)?)
            };

            if fsa.is_final(arc.nextstate) {
                paths.push(symbol.into_iter().collect());
            } else {
                let tails = self.paths_from(arc.nextstate)?;
                paths.extend(tails.iter().map(|tail| prepend(symbol, tail)));
            }
            self.check_limit(paths.len())?;
        }

        tracing::trace!(state, paths = paths.len(), "state expanded");
        let paths: Rc<[Sequence<'a>]> = paths.into();
        self.memo.insert(state, Slot::Done(Rc::clone(&paths)));
        Ok(paths)
    }

    fn check_limit(&self, count: usize) -> Result<(), FstError> {
        match self.options.max_analyses {
            Some(limit) if count > limit => Err(FstError::TooManyAnalyses { limit }),
            _ => Ok(()),
        }
    }
}

fn prepend<'a>(symbol: Option<&'a str>, tail: &[&'a str]) -> Sequence<'a> {
    let mut sequence = Vec::with_capacity(tail.len() + 1);
    sequence.extend(symbol);
    sequence.extend_from_slice(tail);
    sequence
}

/// Enumerate accepting paths from the automaton's start state with default
/// options.
pub fn accepting_paths<A: Automaton + ?Sized>(fsa: &A) -> Result<Vec<Sequence<'_>>, FstError> {
    PathEnumerator::new(fsa).enumerate(fsa.start())
}
