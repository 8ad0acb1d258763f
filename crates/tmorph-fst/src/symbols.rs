// Symbol table: label-to-text and text-to-label mapping.

use crate::{FstError, Label};
use hashbrown::HashMap;

/// Conventional text of the epsilon symbol (label 0).
pub const EPSILON_SYMBOL: &str = "<eps>";

/// Largest label accepted from symbol text or an archive. `Label::MAX` is
/// reserved.
pub const MAX_LABEL: Label = Label::MAX - 1;

/// Bidirectional mapping between labels and symbol texts.
///
/// Keys need not be contiguous: an analyzer typically reserves labels
/// 1..=255 for input bytes and places multi-character analysis symbols
/// (`[Case=Loc]`, `+lAr`, ...) above them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolTable {
    texts: HashMap<Label, String>,
    labels: HashMap<String, Label>,
    next_key: Label,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table holding only `<eps>` at label 0.
    pub fn with_epsilon() -> Self {
        let mut table = Self::new();
        table.add_pair(0, EPSILON_SYMBOL);
        table
    }

    /// Add `text` under the next free label, or return its existing label.
    pub fn add_symbol(&mut self, text: &str) -> Label {
        if let Some(&label) = self.labels.get(text) {
            return label;
        }
        let label = self.next_key;
        self.add_pair(label, text);
        label
    }

    /// Add `text` under an explicit label, replacing any previous text there.
    ///
    /// Labels above [`MAX_LABEL`] are stored, but leave no room for
    /// [`add_symbol`](Self::add_symbol) to assign fresh labels after them.
    pub fn add_pair(&mut self, label: Label, text: &str) {
        if let Some(old) = self.texts.insert(label, text.to_string()) {
            if self.labels.get(&old) == Some(&label) {
                self.labels.remove(&old);
            }
        }
        self.labels.insert(text.to_string(), label);
        if label >= self.next_key {
            self.next_key = label.saturating_add(1);
        }
    }

    /// Text for `label`. Unknown labels and empty texts both count as missing.
    pub fn find(&self, label: Label) -> Option<&str> {
        self.texts
            .get(&label)
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// Label for `text`.
    pub fn find_label(&self, text: &str) -> Option<Label> {
        self.labels.get(text).copied()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    /// All `(label, text)` pairs in ascending label order.
    pub fn iter(&self) -> impl Iterator<Item = (Label, &str)> {
        let mut pairs: Vec<(Label, &str)> = self
            .texts
            .iter()
            .map(|(&label, text)| (label, text.as_str()))
            .collect();
        pairs.sort_unstable_by_key(|&(label, _)| label);
        pairs.into_iter()
    }

    /// Parse the OpenFst text form: one `text<whitespace>label` pair per line.
    ///
    /// Blank lines are skipped.
    pub fn parse_text(source: &str) -> Result<Self, FstError> {
        let mut table = Self::new();
        for (index, line) in source.lines().enumerate() {
            let line_no = index + 1;
            if line.trim().is_empty() {
                continue;
            }
            let mut fields = line.split_whitespace();
            let (Some(text), Some(key), None) = (fields.next(), fields.next(), fields.next())
            else {
                return Err(FstError::InvalidText {
                    line: line_no,
                    reason: format!("expected 'symbol label', got '{line}'"),
                });
            };
            let label: Label = key.parse().map_err(|_| FstError::InvalidText {
                line: line_no,
                reason: format!("invalid label '{key}'"),
            })?;
            if label > MAX_LABEL {
                return Err(FstError::InvalidText {
                    line: line_no,
                    reason: format!("label {label} is reserved"),
                });
            }
            table.add_pair(label, text);
        }
        Ok(table)
    }

    /// Write the OpenFst text form, in label order.
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for (label, text) in self.iter() {
            out.push_str(text);
            out.push('\t');
            out.push_str(&label.to_string());
            out.push('\n');
        }
        out
    }
}
