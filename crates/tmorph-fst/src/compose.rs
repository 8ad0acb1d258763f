// Composition of two weighted transducers.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::fst::{Arc, VectorFst};
use crate::{Automaton, EPSILON, StateId};

/// Filter state of the epsilon-sequencing filter.
///
/// Without a filter, a path on which `a` emits an output epsilon and `b`
/// reads an input epsilon could be matched in two interleavings and would
/// show up twice in the result. The filter only lets `a` move alone while
/// `b` has not moved alone since the last matched step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Filter {
    Open,
    Blocked,
}

type Tuple = (StateId, StateId, Filter);

/// Compose `a` with `b`: the result maps `x` to `z` iff `a` maps `x` to some
/// `y` and `b` maps `y` to `z`, with weights multiplied.
///
/// The result carries `b`'s symbol table and is connected, so it has no start
/// state when no path accepts.
pub fn compose(a: &VectorFst, b: &VectorFst) -> VectorFst {
    let mut out = VectorFst::new();
    out.set_symbols(b.symbols().cloned());

    let (Some(start_a), Some(start_b)) = (a.start(), b.start()) else {
        return out;
    };

    let mut ids: HashMap<Tuple, StateId> = HashMap::new();
    let mut queue: VecDeque<Tuple> = VecDeque::new();

    let start: Tuple = (start_a, start_b, Filter::Open);
    let start_id = out.add_state();
    ids.insert(start, start_id);
    out.set_start(start_id);
    queue.push_back(start);

    while let Some(tuple) = queue.pop_front() {
        let (sa, sb, filter) = tuple;
        let id = ids[&tuple];

        let final_weight = a.final_weight(sa).times(b.final_weight(sb));
        if !final_weight.is_zero() {
            out.set_final(id, final_weight);
        }

        let arcs_a = a.arcs(sa);
        let arcs_b = b.arcs(sb);
        let no_output_eps = arcs_a.iter().all(|arc| arc.olabel != EPSILON);
        let all_output_eps =
            !a.is_final(sa) && arcs_a.iter().all(|arc| arc.olabel == EPSILON);

        let mut moves: Vec<(Arc, Tuple)> = Vec::new();

        // Matched moves on a non-epsilon middle label.
        for arc_a in arcs_a.iter().filter(|arc| arc.olabel != EPSILON) {
            for arc_b in arcs_b.iter().filter(|arc| arc.ilabel == arc_a.olabel) {
                moves.push((
                    Arc::new(
                        arc_a.ilabel,
                        arc_b.olabel,
                        arc_a.weight.times(arc_b.weight),
                        0,
                    ),
                    (arc_a.nextstate, arc_b.nextstate, Filter::Open),
                ));
            }
        }

        // `a` moves alone on an output epsilon.
        if filter == Filter::Open {
            for arc_a in arcs_a.iter().filter(|arc| arc.olabel == EPSILON) {
                moves.push((
                    Arc::new(arc_a.ilabel, EPSILON, arc_a.weight, 0),
                    (arc_a.nextstate, sb, Filter::Open),
                ));
            }
        }

        // `b` moves alone on an input epsilon.
        if !all_output_eps {
            let next_filter = if no_output_eps {
                Filter::Open
            } else {
                Filter::Blocked
            };
            for arc_b in arcs_b.iter().filter(|arc| arc.ilabel == EPSILON) {
                moves.push((
                    Arc::new(EPSILON, arc_b.olabel, arc_b.weight, 0),
                    (sa, arc_b.nextstate, next_filter),
                ));
            }
        }

        for (mut arc, next) in moves {
            let next_id = match ids.get(&next) {
                Some(&existing) => existing,
                None => {
                    let fresh = out.add_state();
                    ids.insert(next, fresh);
                    queue.push_back(next);
                    fresh
                }
            };
            arc.nextstate = next_id;
            out.add_arc(id, arc);
        }
    }

    tracing::debug!(
        states = out.num_states(),
        arcs = out.num_arcs(),
        "composed automaton before connect"
    );
    out.connect();
    out
}
