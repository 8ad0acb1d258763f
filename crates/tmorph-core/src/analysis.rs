// Structured morphological analysis and its human-readable rendering.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Feature category whose affixes mark proper nouns.
pub const PROPER_CATEGORY: &str = "Proper";

/// Part-of-speech tag of proper nouns.
pub const PROPER_NOUN_POS: &str = "NNP";

/// A morphological feature, e.g. `[Case=Abl]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Feature {
    pub category: String,
    pub value: String,
}

impl Feature {
    pub fn new(category: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}={}]", self.category, self.value)
    }
}

/// A derivational or inflectional affix: a meta-morpheme (possibly empty)
/// and the feature it realizes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Affix {
    pub meta_morpheme: String,
    pub feature: Feature,
}

impl Affix {
    pub fn new(meta_morpheme: impl Into<String>, feature: Feature) -> Self {
        Self {
            meta_morpheme: meta_morpheme.into(),
            feature,
        }
    }
}

/// One inflectional group (IG).
///
/// The first IG of an analysis carries the root; every later IG is derived
/// from the previous one and carries the derivational affix instead.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InflectionalGroup {
    /// Part-of-speech tag, e.g. `NN` or `VB`.
    pub pos: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub derivation: Option<Affix>,
    #[serde(default)]
    pub inflections: Vec<Affix>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proper: Option<bool>,
}

/// A complete morphological analysis of a word.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Analysis {
    pub igs: Vec<InflectionalGroup>,
}

impl Analysis {
    /// Root morpheme of the first inflectional group.
    pub fn root(&self) -> Option<&str> {
        self.igs.first().and_then(|ig| ig.root.as_deref())
    }

    /// Part-of-speech tag of the last inflectional group.
    pub fn final_pos(&self) -> Option<&str> {
        self.igs.last().map(|ig| ig.pos.as_str())
    }

    /// Drop the proper-noun marker from every inflectional group.
    pub fn without_proper(mut self) -> Self {
        for ig in &mut self.igs {
            ig.proper = None;
        }
        self
    }

    /// Give the last inflectional group a proper-noun marker if it has none.
    /// The marker is true only for the `NNP` part-of-speech tag.
    pub fn with_default_proper(mut self) -> Self {
        if let Some(last) = self.igs.last_mut() {
            if last.proper.is_none() {
                last.proper = Some(last.pos == PROPER_NOUN_POS);
            }
        }
        self
    }

    /// Split the human-readable form into the analyzer's output symbols.
    ///
    /// A group opens with `(root[POS]`, or with `)([POS]` when it follows a
    /// group that has no proper marker. Every affix is one symbol, and a
    /// proper marker closes its group as `)+[Proper=True]`. The closing `)`
    /// of the last group is dropped when it has no marker.
    pub fn symbols(&self) -> Vec<String> {
        let mut symbols = Vec::new();
        let mut open = "(";
        for ig in &self.igs {
            let root = ig.root.as_deref().unwrap_or("");
            symbols.push(format!("{open}{root}[{}]", ig.pos));
            if let Some(derivation) = &ig.derivation {
                symbols.push(format!("-{}{}", derivation.meta_morpheme, derivation.feature));
            }
            for inflection in &ig.inflections {
                symbols.push(format!("+{}{}", inflection.meta_morpheme, inflection.feature));
            }
            open = match ig.proper {
                Some(proper) => {
                    symbols.push(format!(")+[{PROPER_CATEGORY}={}]", proper_value(proper)));
                    "("
                }
                None => ")(",
            };
        }
        symbols
    }
}

fn proper_value(proper: bool) -> &'static str {
    if proper { "True" } else { "False" }
}

fn write_affix(f: &mut fmt::Formatter<'_>, affix: &Affix, delimiter: char) -> fmt::Result {
    write!(f, "{delimiter}{}{}", affix.meta_morpheme, affix.feature)
}

impl fmt::Display for InflectionalGroup {
    /// Formats as `(root[POS]+inflections)` for the first group or
    /// `([POS]-derivation+inflections)` for derived groups, followed by
    /// `+[Proper=True]`/`+[Proper=False]` when the marker is present.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("(")?;
        if let Some(root) = &self.root {
            f.write_str(root)?;
        }
        write!(f, "[{}]", self.pos)?;
        if let Some(derivation) = &self.derivation {
            write_affix(f, derivation, '-')?;
        }
        for inflection in &self.inflections {
            write_affix(f, inflection, '+')?;
        }
        f.write_str(")")?;
        match self.proper {
            Some(proper) => write!(f, "+[{PROPER_CATEGORY}={}]", proper_value(proper)),
            None => Ok(()),
        }
    }
}

impl fmt::Display for Analysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ig in &self.igs {
            write!(f, "{ig}")?;
        }
        Ok(())
    }
}

/// Remove `+[Proper=True]` and `+[Proper=False]` markers from a
/// human-readable analysis.
pub fn strip_proper_feature(human_readable: &str) -> String {
    human_readable
        .replace("+[Proper=False]", "")
        .replace("+[Proper=True]", "")
}
