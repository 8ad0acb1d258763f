// Parser for human-readable analyses.
//
// Grammar (no whitespace anywhere):
//
//   analysis   := group+
//   group      := "(" head inflection* ")" proper?
//   head       := root "[" POS "]"                      first group
//               | "[" POS "]" "-" DMETA "[" CAT "=" DVAL "]"   later groups
//   inflection := "+" IMETA "[" CAT "=" VAL "]"
//   proper     := "+[Proper=True]" | "+[Proper=False]"
//
// DMETA is one or more letters or apostrophes. IMETA is zero or more letters,
// apostrophes or periods. CAT and DVAL are ASCII letters, VAL is ASCII
// letters and digits. POS is uppercase ASCII plus `.,:()'-"`$`.

use std::str::FromStr;

use thiserror::Error;

use crate::analysis::{Affix, Analysis, Feature, InflectionalGroup};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("human-readable analysis is empty")]
    Empty,

    #[error("human-readable analysis is ill-formed: '{input}' ({reason} at byte {offset})")]
    IllFormed {
        input: String,
        offset: usize,
        reason: &'static str,
    },

    #[error("analysis is structurally ill-formed: {0}")]
    Invalid(String),
}

impl FromStr for Analysis {
    type Err = AnalysisError;

    fn from_str(human_readable: &str) -> Result<Self, Self::Err> {
        parse(human_readable)
    }
}

/// Parse a human-readable analysis such as
/// `(Ali[NNP]+lAr[PersonNumber=A3pl]+[Possessive=Pnon]+NHn[Case=Gen])+[Proper=True]`.
pub fn parse(human_readable: &str) -> Result<Analysis, AnalysisError> {
    if human_readable.is_empty() {
        return Err(AnalysisError::Empty);
    }
    let mut parser = Parser {
        input: human_readable,
        pos: 0,
    };
    let mut igs = Vec::new();
    while !parser.at_end() {
        let ig = parser.group(igs.is_empty())?;
        igs.push(ig);
    }
    Ok(Analysis { igs })
}

fn is_pos_char(c: char) -> bool {
    c.is_ascii_uppercase() || ".,:()'-\"`$".contains(c)
}

fn is_derivation_meta_char(c: char) -> bool {
    c.is_alphabetic() || c == '\''
}

fn is_inflection_meta_char(c: char) -> bool {
    c.is_alphabetic() || c == '\'' || c == '.'
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn error(&self, reason: &'static str) -> AnalysisError {
        AnalysisError::IllFormed {
            input: self.input.to_string(),
            offset: self.pos,
            reason,
        }
    }

    fn expect(&mut self, c: char, reason: &'static str) -> Result<(), AnalysisError> {
        if self.peek() == Some(c) {
            self.pos += c.len_utf8();
            Ok(())
        } else {
            Err(self.error(reason))
        }
    }

    /// Consume the longest run of characters matching `accept`.
    fn take_while(&mut self, accept: impl Fn(char) -> bool) -> &'a str {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| !accept(c))
            .map_or(rest.len(), |(i, _)| i);
        self.pos += len;
        &rest[..len]
    }

    fn group(&mut self, first: bool) -> Result<InflectionalGroup, AnalysisError> {
        self.expect('(', "expected '(' to open an inflectional group")?;
        let (root, pos, derivation) = if first {
            let root = self.root()?;
            let pos = self.pos_tag()?;
            (Some(root), pos, None)
        } else {
            if self.peek() != Some('[') {
                return Err(self.error("missing part-of-speech tag in derived group"));
            }
            let pos = self.pos_tag()?;
            self.expect('-', "missing derivational affix")?;
            let meta = self.take_while(is_derivation_meta_char);
            if meta.is_empty() {
                return Err(self.error("empty derivational meta-morpheme"));
            }
            let feature = self.feature(|c| c.is_ascii_alphabetic())?;
            (None, pos, Some(Affix::new(meta, feature)))
        };

        let mut inflections = Vec::new();
        while self.peek() == Some('+') {
            self.pos += 1;
            let meta = self.take_while(is_inflection_meta_char);
            let feature = self.feature(|c| c.is_ascii_alphanumeric())?;
            inflections.push(Affix::new(meta, feature));
        }
        self.expect(')', "expected '+' or ')' after inflectional affix")?;

        let proper = if let Some(rest) = self.rest().strip_prefix("+[Proper=") {
            if rest.starts_with("True]") {
                self.pos += "+[Proper=True]".len();
                Some(true)
            } else if rest.starts_with("False]") {
                self.pos += "+[Proper=False]".len();
                Some(false)
            } else {
                return Err(self.error("invalid proper feature"));
            }
        } else {
            None
        };

        Ok(InflectionalGroup {
            pos,
            root,
            derivation,
            inflections,
            proper,
        })
    }

    /// Root text: at least one character, extended up to the first `[` that
    /// opens a well-formed part-of-speech tag.
    fn root(&mut self) -> Result<String, AnalysisError> {
        let rest = self.rest();
        let mut chars = rest.char_indices();
        if chars.next().is_none() {
            return Err(self.error("missing root"));
        }
        for (i, c) in chars {
            if c == '[' && pos_tag_len(&rest[i..]).is_some() {
                self.pos += i;
                return Ok(rest[..i].to_string());
            }
        }
        Err(self.error("missing root or part-of-speech tag in first group"))
    }

    fn pos_tag(&mut self) -> Result<String, AnalysisError> {
        match pos_tag_len(self.rest()) {
            Some(len) => {
                let tag = &self.rest()[1..len - 1];
                self.pos += len;
                Ok(tag.to_string())
            }
            None => Err(self.error("malformed part-of-speech tag")),
        }
    }

    fn feature(&mut self, value_char: impl Fn(char) -> bool) -> Result<Feature, AnalysisError> {
        self.expect('[', "expected '[' to open a feature")?;
        let category = self.take_while(|c| c.is_ascii_alphabetic());
        if category.is_empty() {
            return Err(self.error("empty feature category"));
        }
        self.expect('=', "expected '=' between feature category and value")?;
        let value = self.take_while(value_char);
        if value.is_empty() {
            return Err(self.error("empty feature value"));
        }
        self.expect(']', "expected ']' to close a feature")?;
        Ok(Feature::new(category, value))
    }
}

/// Length in bytes of a `[POS]` tag at the start of `s`, brackets included.
fn pos_tag_len(s: &str) -> Option<usize> {
    let inner = s.strip_prefix('[')?;
    let len = inner
        .char_indices()
        .find(|&(_, c)| !is_pos_char(c))
        .map_or(inner.len(), |(i, _)| i);
    (len > 0 && inner[len..].starts_with(']')).then_some(len + 2)
}
