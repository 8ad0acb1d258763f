// Mutable automaton stored as an index-addressed arena of states.

use crate::symbols::SymbolTable;
use crate::weight::TropicalWeight;
use crate::{Automaton, FstError, Label, StateId};

/// A labeled, weighted arc. The destination is a plain state id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc {
    pub ilabel: Label,
    pub olabel: Label,
    pub weight: TropicalWeight,
    pub nextstate: StateId,
}

impl Arc {
    pub fn new(ilabel: Label, olabel: Label, weight: TropicalWeight, nextstate: StateId) -> Self {
        Self {
            ilabel,
            olabel,
            weight,
            nextstate,
        }
    }

    /// An acceptor arc: same label on both tapes, weight one.
    pub fn acceptor(label: Label, nextstate: StateId) -> Self {
        Self::new(label, label, TropicalWeight::one(), nextstate)
    }

    pub fn label(&self, tape: Tape) -> Label {
        match tape {
            Tape::Input => self.ilabel,
            Tape::Output => self.olabel,
        }
    }
}

/// One side of a transducer's arcs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tape {
    #[default]
    Input,
    Output,
}

#[derive(Debug, Clone, PartialEq)]
struct State {
    final_weight: TropicalWeight,
    arcs: Vec<Arc>,
}

/// Which tape arcs are sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArcSortType {
    Input,
    Output,
}

/// Which tape survives a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Input,
    Output,
}

/// Mutable weighted transducer.
///
/// States live in a `Vec` and refer to each other by index, so cycles in the
/// graph never turn into ownership cycles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VectorFst {
    states: Vec<State>,
    start: Option<StateId>,
    symbols: Option<SymbolTable>,
}

impl VectorFst {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a non-final state with no arcs and return its id.
    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State {
            final_weight: TropicalWeight::zero(),
            arcs: Vec::new(),
        });
        id
    }

    pub fn set_start(&mut self, state: StateId) {
        debug_assert!((state as usize) < self.states.len());
        self.start = Some(state);
    }

    pub fn clear_start(&mut self) {
        self.start = None;
    }

    pub fn set_final(&mut self, state: StateId, weight: TropicalWeight) {
        self.states[state as usize].final_weight = weight;
    }

    pub fn add_arc(&mut self, state: StateId, arc: Arc) {
        debug_assert!((arc.nextstate as usize) < self.states.len());
        self.states[state as usize].arcs.push(arc);
    }

    pub fn final_weight(&self, state: StateId) -> TropicalWeight {
        self.states[state as usize].final_weight
    }

    pub fn num_states(&self) -> usize {
        self.states.len()
    }

    pub fn num_arcs(&self) -> usize {
        self.states.iter().map(|s| s.arcs.len()).sum()
    }

    pub fn symbols(&self) -> Option<&SymbolTable> {
        self.symbols.as_ref()
    }

    pub fn set_symbols(&mut self, symbols: Option<SymbolTable>) {
        self.symbols = symbols;
    }

    /// Check that the start state and every arc destination exist.
    pub fn validate(&self, name: &str) -> Result<(), FstError> {
        let count = self.states.len();
        if let Some(start) = self.start {
            if start as usize >= count {
                return Err(FstError::InvalidAutomaton {
                    name: name.to_string(),
                    reason: format!("start state {start} out of range ({count} states)"),
                });
            }
        }
        for (state, s) in self.states.iter().enumerate() {
            if let Some(arc) = s.arcs.iter().find(|a| a.nextstate as usize >= count) {
                return Err(FstError::InvalidAutomaton {
                    name: name.to_string(),
                    reason: format!(
                        "arc from state {state} targets state {} out of range ({count} states)",
                        arc.nextstate
                    ),
                });
            }
        }
        Ok(())
    }

    /// Stable-sort every state's arcs by one tape's label.
    pub fn arc_sort(&mut self, sort_type: ArcSortType) {
        for state in &mut self.states {
            match sort_type {
                ArcSortType::Input => state.arcs.sort_by_key(|a| a.ilabel),
                ArcSortType::Output => state.arcs.sort_by_key(|a| a.olabel),
            }
        }
    }

    /// Copy one tape's labels onto the other, turning the transducer into an
    /// acceptor.
    pub fn project(&mut self, project_type: ProjectType) {
        for state in &mut self.states {
            for arc in &mut state.arcs {
                match project_type {
                    ProjectType::Input => arc.olabel = arc.ilabel,
                    ProjectType::Output => arc.ilabel = arc.olabel,
                }
            }
        }
    }

    /// Remove states that are not both reachable from the start state and
    /// able to reach a final state.
    ///
    /// If no state survives, the automaton is left empty with no start state.
    pub fn connect(&mut self) {
        let count = self.states.len();
        let Some(start) = self.start else {
            self.states.clear();
            return;
        };

        let mut accessible = vec![false; count];
        let mut stack = vec![start];
        accessible[start as usize] = true;
        while let Some(state) = stack.pop() {
            for arc in &self.states[state as usize].arcs {
                let next = arc.nextstate as usize;
                if !accessible[next] {
                    accessible[next] = true;
                    stack.push(arc.nextstate);
                }
            }
        }

        // Reverse adjacency for the coaccessibility sweep.
        let mut incoming: Vec<Vec<StateId>> = vec![Vec::new(); count];
        for (state, s) in self.states.iter().enumerate() {
            for arc in &s.arcs {
                incoming[arc.nextstate as usize].push(state as StateId);
            }
        }
        let mut coaccessible = vec![false; count];
        let mut stack: Vec<StateId> = (0..count)
            .filter(|&s| !self.states[s].final_weight.is_zero())
            .map(|s| s as StateId)
            .collect();
        for &state in &stack {
            coaccessible[state as usize] = true;
        }
        while let Some(state) = stack.pop() {
            for &prev in &incoming[state as usize] {
                if !coaccessible[prev as usize] {
                    coaccessible[prev as usize] = true;
                    stack.push(prev);
                }
            }
        }

        let mut remap: Vec<Option<StateId>> = vec![None; count];
        let mut next_id: StateId = 0;
        for state in 0..count {
            if accessible[state] && coaccessible[state] {
                remap[state] = Some(next_id);
                next_id += 1;
            }
        }

        let old_states = std::mem::take(&mut self.states);
        for (state, mut s) in old_states.into_iter().enumerate() {
            if remap[state].is_none() {
                continue;
            }
            s.arcs.retain(|a| remap[a.nextstate as usize].is_some());
            for arc in &mut s.arcs {
                if let Some(id) = remap[arc.nextstate as usize] {
                    arc.nextstate = id;
                }
            }
            self.states.push(s);
        }
        self.start = remap[start as usize];
        if self.start.is_none() {
            self.states.clear();
        }
    }
}

impl Automaton for VectorFst {
    fn start(&self) -> Option<StateId> {
        self.start
    }

    fn num_states(&self) -> usize {
        self.states.len()
    }

    fn arcs(&self, state: StateId) -> &[Arc] {
        &self.states[state as usize].arcs
    }

    fn is_final(&self, state: StateId) -> bool {
        !self.states[state as usize].final_weight.is_zero()
    }

    fn resolve(&self, label: Label) -> Result<&str, FstError> {
        let symbols = self.symbols.as_ref().ok_or(FstError::MissingSymbolTable)?;
        symbols
            .find(label)
            .ok_or(FstError::UnresolvedSymbol { label })
    }
}
