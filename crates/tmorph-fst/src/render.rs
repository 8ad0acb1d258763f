// Rendering of enumerated paths into sorted printable strings.

use crate::paths::Sequence;

/// Outcome of rendering a word's accepting paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    /// One string per accepting path, sorted, duplicates kept. Never empty.
    Accepted(Vec<String>),
    /// No accepting path: the word is not accepted.
    NotAccepted,
}

impl Rendered {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// The rendered analyses; empty when not accepted.
    pub fn analyses(&self) -> &[String] {
        match self {
            Self::Accepted(analyses) => analyses,
            Self::NotAccepted => &[],
        }
    }

    pub fn into_analyses(self) -> Vec<String> {
        match self {
            Self::Accepted(analyses) => analyses,
            Self::NotAccepted => Vec::new(),
        }
    }

    /// Rewrite every analysis and restore sorted order.
    pub fn map_analyses(self, f: impl FnMut(String) -> String) -> Self {
        match self {
            Self::Accepted(analyses) => {
                let mut analyses: Vec<String> = analyses.into_iter().map(f).collect();
                analyses.sort();
                Self::Accepted(analyses)
            }
            Self::NotAccepted => Self::NotAccepted,
        }
    }
}

/// Join each sequence's symbols without a separator and sort the results
/// lexicographically by bytes. No sequences means the word is not accepted.
pub fn render(sequences: &[Sequence<'_>]) -> Rendered {
    if sequences.is_empty() {
        return Rendered::NotAccepted;
    }
    let mut printables: Vec<String> = sequences.iter().map(|s| s.concat()).collect();
    printables.sort();
    Rendered::Accepted(printables)
}
