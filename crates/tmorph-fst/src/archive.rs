// Archive of named automata: loading and writing.

use std::path::Path;

use crate::format::{self, HEADER_SIZE};
use crate::fst::{Arc, VectorFst};
use crate::record::{self, ArcRecord, NO_STATE, StateRecord};
use crate::symbols::{MAX_LABEL, SymbolTable};
use crate::weight::TropicalWeight;
use crate::{Automaton, FstError};

/// A collection of named automata, loaded from or written to a single file.
///
/// Entry layout, after the 16-byte header, each entry starting on a 16-byte
/// boundary:
/// 1. NUL-terminated UTF-8 name
/// 2. `u32` symbol count, then `(u32 label, NUL-terminated text)` pairs;
///    a count of `u32::MAX` means the automaton has no symbol table, so an
///    empty table survives a round trip
/// 3. `u32` state count, `u32` start state (`u32::MAX` for none), `u32` arc count
/// 4. padding to a 16-byte boundary
/// 5. state records, then arc records (16 bytes each)
#[derive(Debug, Clone, Default)]
pub struct Archive {
    entries: Vec<(String, VectorFst)>,
}

impl Archive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read and parse an archive file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, FstError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let archive = Self::from_bytes(&data)?;
        tracing::debug!(
            path = %path.display(),
            bytes = data.len(),
            entries = archive.len(),
            "loaded automaton archive"
        );
        Ok(archive)
    }

    /// Parse an archive from raw bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FstError> {
        let header = format::parse_header(data)?;
        let mut reader = Reader {
            data,
            pos: HEADER_SIZE,
        };
        let mut archive = Self::new();
        for _ in 0..header.entry_count {
            reader.pos = format::align(reader.pos);
            let (name, fst) = reader.read_entry()?;
            archive.insert(name, fst)?;
        }
        Ok(archive)
    }

    /// Add an automaton under `name`. Names are unique within an archive.
    pub fn insert(&mut self, name: impl Into<String>, fst: VectorFst) -> Result<(), FstError> {
        let name = name.into();
        if self.get(&name).is_some() {
            return Err(FstError::DuplicateName(name));
        }
        self.entries.push((name, fst));
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&VectorFst> {
        self.entries
            .iter()
            .find(|(entry, _)| entry == name)
            .map(|(_, fst)| fst)
    }

    /// Remove and return the automaton stored under `name`.
    pub fn take(&mut self, name: &str) -> Option<VectorFst> {
        let index = self.entries.iter().position(|(entry, _)| entry == name)?;
        Some(self.entries.remove(index).1)
    }

    /// Entry names in archive order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize the archive.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = format::write_header(self.entries.len() as u32).to_vec();
        for (name, fst) in &self.entries {
            pad_to_alignment(&mut buf);
            write_entry(&mut buf, name, fst);
        }
        buf
    }

    /// Serialize the archive to `path`.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<(), FstError> {
        std::fs::write(path, self.to_bytes())?;
        Ok(())
    }
}

/// Symbol count written for an automaton without a symbol table.
const NO_SYMBOLS: u32 = u32::MAX;

fn pad_to_alignment(buf: &mut Vec<u8>) {
    let aligned = format::align(buf.len());
    buf.resize(aligned, 0);
}

fn write_entry(buf: &mut Vec<u8>, name: &str, fst: &VectorFst) {
    buf.extend_from_slice(name.as_bytes());
    buf.push(0);

    match fst.symbols() {
        Some(symbols) => {
            buf.extend_from_slice(&(symbols.len() as u32).to_le_bytes());
            for (label, text) in symbols.iter() {
                buf.extend_from_slice(&label.to_le_bytes());
                buf.extend_from_slice(text.as_bytes());
                buf.push(0);
            }
        }
        None => buf.extend_from_slice(&NO_SYMBOLS.to_le_bytes()),
    }

    let state_count = fst.num_states() as u32;
    let mut states = Vec::with_capacity(fst.num_states());
    let mut arcs = Vec::with_capacity(fst.num_arcs());
    for state in 0..state_count {
        let state_arcs = fst.arcs(state);
        states.push(StateRecord {
            final_weight: fst.final_weight(state).value(),
            first_arc: arcs.len() as u32,
            arc_count: state_arcs.len() as u32,
            _reserved: 0,
        });
        arcs.extend(state_arcs.iter().map(ArcRecord::from));
    }

    buf.extend_from_slice(&state_count.to_le_bytes());
    buf.extend_from_slice(&fst.start().unwrap_or(NO_STATE).to_le_bytes());
    buf.extend_from_slice(&(arcs.len() as u32).to_le_bytes());
    pad_to_alignment(buf);
    buf.extend_from_slice(bytemuck::cast_slice(&states));
    buf.extend_from_slice(bytemuck::cast_slice(&arcs));
}

struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn ensure(&self, len: usize) -> Result<(), FstError> {
        if self.pos + len > self.data.len() {
            return Err(FstError::TooShort {
                expected: self.pos + len,
                actual: self.data.len(),
            });
        }
        Ok(())
    }

    fn read_u32(&mut self) -> Result<u32, FstError> {
        self.ensure(4)?;
        let d = &self.data[self.pos..self.pos + 4];
        self.pos += 4;
        Ok(u32::from_le_bytes([d[0], d[1], d[2], d[3]]))
    }

    /// Read a NUL-terminated string. `what` names the field in error messages.
    fn read_cstr(&mut self, what: &str) -> Result<String, FstError> {
        let start = self.pos;
        let Some(len) = self.data[start..].iter().position(|&b| b == 0) else {
            return Err(FstError::InvalidSymbolTable(format!("unterminated {what}")));
        };
        self.pos = start + len + 1;
        std::str::from_utf8(&self.data[start..start + len])
            .map(str::to_string)
            .map_err(|_| FstError::InvalidSymbolTable(format!("invalid UTF-8 in {what}")))
    }

    fn read_entry(&mut self) -> Result<(String, VectorFst), FstError> {
        if self.pos >= self.data.len() {
            return Err(FstError::TooShort {
                expected: self.pos + 1,
                actual: self.data.len(),
            });
        }
        let name = self.read_cstr("automaton name")?;
        let invalid = |reason: String| FstError::InvalidAutomaton {
            name: name.clone(),
            reason,
        };

        let symbol_count = self.read_u32()?;
        let symbols = if symbol_count == NO_SYMBOLS {
            None
        } else {
            let mut table = SymbolTable::new();
            for i in 0..symbol_count {
                let label = self.read_u32()?;
                if label > MAX_LABEL {
                    return Err(FstError::InvalidSymbolTable(format!(
                        "symbol {i} uses reserved label {label}"
                    )));
                }
                let text = self.read_cstr(&format!("symbol {i}"))?;
                table.add_pair(label, &text);
            }
            Some(table)
        };

        let state_count = self.read_u32()? as usize;
        let start = self.read_u32()?;
        let arc_count = self.read_u32()? as usize;
        self.pos = format::align(self.pos);

        self.ensure(state_count * size_of::<StateRecord>())?;
        let states: Vec<StateRecord> = record::copy_records(self.data, self.pos, state_count);
        self.pos += state_count * size_of::<StateRecord>();

        self.ensure(arc_count * size_of::<ArcRecord>())?;
        let arcs: Vec<ArcRecord> = record::copy_records(self.data, self.pos, arc_count);
        self.pos += arc_count * size_of::<ArcRecord>();

        let mut fst = VectorFst::new();
        for _ in 0..state_count {
            fst.add_state();
        }
        if start != NO_STATE {
            if start as usize >= state_count {
                return Err(invalid(format!(
                    "start state {start} out of range ({state_count} states)"
                )));
            }
            fst.set_start(start);
        }
        for (state, record) in states.iter().enumerate() {
            let first = record.first_arc as usize;
            let end = first + record.arc_count as usize;
            if end > arcs.len() {
                return Err(invalid(format!(
                    "state {state} arcs {first}..{end} exceed arc table ({} arcs)",
                    arcs.len()
                )));
            }
            fst.set_final(state as u32, TropicalWeight(record.final_weight));
            for arc in &arcs[first..end] {
                if arc.nextstate as usize >= state_count {
                    return Err(invalid(format!(
                        "arc from state {state} targets state {} out of range",
                        arc.nextstate
                    )));
                }
                fst.add_arc(state as u32, Arc::from(arc));
            }
        }
        fst.set_symbols(symbols);
        Ok((name, fst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_fst() -> VectorFst {
        let mut symbols = SymbolTable::with_epsilon();
        symbols.add_pair(97, "a");
        symbols.add_pair(1000, "[NN]");

        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        let s2 = fst.add_state();
        fst.set_start(s0);
        fst.add_arc(s0, Arc::new(97, 97, TropicalWeight::one(), s1));
        fst.add_arc(s1, Arc::new(0, 1000, TropicalWeight(0.25), s2));
        fst.set_final(s2, TropicalWeight::one());
        fst.set_symbols(Some(symbols));
        fst
    }

    #[test]
    fn write_and_read_back() {
        let mut archive = Archive::new();
        archive.insert("analyzer", sample_fst()).unwrap();
        let mut bare = VectorFst::new();
        bare.add_state();
        archive.insert("bare", bare).unwrap();

        let bytes = archive.to_bytes();
        let loaded = Archive::from_bytes(&bytes).unwrap();

        assert_eq!(loaded.names().collect::<Vec<_>>(), vec!["analyzer", "bare"]);
        assert_eq!(loaded.get("analyzer"), Some(&sample_fst()));
        let bare = loaded.get("bare").unwrap();
        assert_eq!(bare.start(), None);
        assert!(bare.symbols().is_none());
        assert!(!bare.is_final(0));
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut archive = Archive::new();
        archive.insert("x", VectorFst::new()).unwrap();
        let err = archive.insert("x", VectorFst::new()).unwrap_err();
        assert!(matches!(err, FstError::DuplicateName(name) if name == "x"));
    }

    #[test]
    fn take_removes_entry() {
        let mut archive = Archive::new();
        archive.insert("x", sample_fst()).unwrap();
        assert!(archive.take("x").is_some());
        assert!(archive.is_empty());
        assert!(archive.take("x").is_none());
    }

    #[test]
    fn truncated_archive_is_rejected() {
        let mut archive = Archive::new();
        archive.insert("analyzer", sample_fst()).unwrap();
        let bytes = archive.to_bytes();
        let err = Archive::from_bytes(&bytes[..bytes.len() - 8]).unwrap_err();
        assert!(matches!(err, FstError::TooShort { .. }));
    }

    #[test]
    fn missing_entry_is_rejected() {
        let bytes = format::write_header(1);
        let err = Archive::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, FstError::TooShort { .. }));
    }

    #[test]
    fn dangling_arc_is_rejected() {
        let mut archive = Archive::new();
        archive.insert("analyzer", sample_fst()).unwrap();
        let mut bytes = archive.to_bytes();

        // The last arc record ends the file; its nextstate field sits 8 bytes
        // from its start.
        let arc_start = bytes.len() - size_of::<ArcRecord>();
        bytes[arc_start + 8..arc_start + 12].copy_from_slice(&99u32.to_le_bytes());

        let err = Archive::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, FstError::InvalidAutomaton { .. }));
    }

    #[test]
    fn empty_symbol_table_survives_round_trip() {
        let mut fst = VectorFst::new();
        let s0 = fst.add_state();
        let s1 = fst.add_state();
        fst.set_start(s0);
        fst.add_arc(s0, Arc::acceptor(5, s1));
        fst.set_final(s1, TropicalWeight::one());
        fst.set_symbols(Some(SymbolTable::new()));

        let mut archive = Archive::new();
        archive.insert("empty", fst).unwrap();
        let loaded = Archive::from_bytes(&archive.to_bytes()).unwrap();
        let fst = loaded.get("empty").unwrap();

        assert_eq!(fst.symbols(), Some(&SymbolTable::new()));
        assert!(matches!(
            fst.resolve(5).unwrap_err(),
            FstError::UnresolvedSymbol { label: 5 }
        ));
    }

    #[test]
    fn reserved_symbol_label_is_rejected() {
        let mut archive = Archive::new();
        archive.insert("analyzer", sample_fst()).unwrap();
        let mut bytes = archive.to_bytes();

        // Header, "analyzer\0", symbol count, then the first label.
        let label_start = HEADER_SIZE + "analyzer".len() + 1 + 4;
        assert_eq!(bytes[label_start..label_start + 4], 0u32.to_le_bytes());
        bytes[label_start..label_start + 4].copy_from_slice(&u32::MAX.to_le_bytes());

        let err = Archive::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, FstError::InvalidSymbolTable(_)));
    }

    #[test]
    fn open_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.far");

        let mut archive = Archive::new();
        archive.insert("analyzer", sample_fst()).unwrap();
        archive.write(&path).unwrap();

        let loaded = Archive::open(&path).unwrap();
        assert_eq!(loaded.len(), 1);
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let err = Archive::open("/nonexistent/tmorph/archive.far").unwrap_err();
        assert!(matches!(err, FstError::Io(_)));
    }
}
