// AT&T text format reader.
//
// One arc or final state per line, fields separated by whitespace:
//
//   src dst ilabel olabel [weight]    arc
//   src dst label [weight]            acceptor arc (acceptor mode only)
//   state [weight]                    final state
//
// Labels are written as symbols and resolved through the supplied symbol
// table. The source state of the first line is the start state. A missing
// weight means weight one. Each line names at most two states, so state ids
// must stay below twice the line count.

use crate::fst::{Arc, VectorFst};
use crate::symbols::SymbolTable;
use crate::weight::TropicalWeight;
use crate::{Automaton, FstError, Label, StateId};

/// Parse AT&T text into an automaton that carries `symbols`.
///
/// With `acceptor` set, arc lines have a single label field.
pub fn parse_att(source: &str, symbols: &SymbolTable, acceptor: bool) -> Result<VectorFst, FstError> {
    let arc_fields = if acceptor { 3 } else { 4 };
    let max_states = source.lines().count().saturating_mul(2);
    let mut fst = VectorFst::new();

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.is_empty() {
            continue;
        }
        let invalid = |reason: String| FstError::InvalidText {
            line: line_no,
            reason,
        };

        let src = parse_state(fields[0], line_no, max_states)?;
        ensure_state(&mut fst, src);
        if fst.start().is_none() {
            fst.set_start(src);
        }

        match fields.len() {
            1 | 2 => {
                let weight = match fields.get(1) {
                    Some(field) => parse_weight(field, line_no)?,
                    None => TropicalWeight::one(),
                };
                fst.set_final(src, weight);
            }
            n if n == arc_fields || n == arc_fields + 1 => {
                let dst = parse_state(fields[1], line_no, max_states)?;
                ensure_state(&mut fst, dst);
                let ilabel = lookup(symbols, fields[2], line_no)?;
                let olabel = if acceptor {
                    ilabel
                } else {
                    lookup(symbols, fields[3], line_no)?
                };
                let weight = match fields.get(arc_fields) {
                    Some(field) => parse_weight(field, line_no)?,
                    None => TropicalWeight::one(),
                };
                fst.add_arc(src, Arc::new(ilabel, olabel, weight, dst));
            }
            n => {
                return Err(invalid(format!("unexpected number of fields ({n})")));
            }
        }
    }

    fst.set_symbols(Some(symbols.clone()));
    Ok(fst)
}

fn ensure_state(fst: &mut VectorFst, state: StateId) {
    while fst.num_states() <= state as usize {
        fst.add_state();
    }
}

fn parse_state(field: &str, line: usize, max_states: usize) -> Result<StateId, FstError> {
    let state: StateId = field.parse().map_err(|_| FstError::InvalidText {
        line,
        reason: format!("invalid state id '{field}'"),
    })?;
    if state as usize >= max_states {
        return Err(FstError::InvalidText {
            line,
            reason: format!("state id {state} out of range for {max_states} states"),
        });
    }
    Ok(state)
}

fn parse_weight(field: &str, line: usize) -> Result<TropicalWeight, FstError> {
    let value: f32 = match field {
        "Infinity" | "inf" => f32::INFINITY,
        _ => field.parse().map_err(|_| FstError::InvalidText {
            line,
            reason: format!("invalid weight '{field}'"),
        })?,
    };
    Ok(TropicalWeight(value))
}

fn lookup(symbols: &SymbolTable, field: &str, line: usize) -> Result<Label, FstError> {
    symbols.find_label(field).ok_or_else(|| FstError::InvalidText {
        line,
        reason: format!("symbol '{field}' not in symbol table"),
    })
}
