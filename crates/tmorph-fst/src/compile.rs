// Word and label-sequence to acceptor compilation.

use crate::fst::{Arc, VectorFst};
use crate::symbols::SymbolTable;
use crate::weight::TropicalWeight;
use crate::{FstError, Label};

/// Compile `word` into a linear acceptor over its UTF-8 bytes.
///
/// Each byte becomes one arc whose label is the byte value, so the acceptor
/// can be composed with an analyzer whose input side uses byte labels. The
/// last state is final with weight one; an empty word yields a single state
/// that is both start and final.
///
/// A NUL byte cannot be represented because label 0 is epsilon.
pub fn compile_bytes(word: &str, symbols: Option<&SymbolTable>) -> Result<VectorFst, FstError> {
    if let Some(position) = word.bytes().position(|b| b == 0) {
        return Err(FstError::InvalidInput(format!(
            "NUL byte at offset {position} in '{}'",
            word.escape_default()
        )));
    }

    Ok(compile_labels(word.bytes().map(Label::from), symbols))
}

/// Compile a label sequence into a linear acceptor, one arc per label.
pub fn compile_labels(
    labels: impl IntoIterator<Item = Label>,
    symbols: Option<&SymbolTable>,
) -> VectorFst {
    let mut fst = VectorFst::new();
    let mut last = fst.add_state();
    fst.set_start(last);
    for label in labels {
        let next = fst.add_state();
        fst.add_arc(last, Arc::acceptor(label, next));
        last = next;
    }
    fst.set_final(last, TropicalWeight::one());
    fst.set_symbols(symbols.cloned());
    fst
}
