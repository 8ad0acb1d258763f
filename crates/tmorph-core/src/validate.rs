// Structural checks for analyses built by hand or read from JSON.
//
// A parsed human-readable analysis always passes; these checks matter for
// analyses that did not come through the parser.

use crate::analysis::{Affix, Analysis, Feature, InflectionalGroup};
use crate::decompose::AnalysisError;

impl Analysis {
    /// Check that the analysis is structurally well-formed.
    ///
    /// Requires at least one inflectional group, a part-of-speech tag on
    /// every group, a non-empty root on the first group, and a derivational
    /// affix with a non-empty meta-morpheme on every later group. Every
    /// feature needs a non-empty category and value.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.igs.is_empty() {
            return Err(invalid("analysis has no inflectional groups".to_string()));
        }
        for (index, ig) in self.igs.iter().enumerate() {
            inflectional_group(ig, index + 1)?;
        }
        Ok(())
    }
}

fn invalid(reason: String) -> AnalysisError {
    AnalysisError::Invalid(reason)
}

fn inflectional_group(ig: &InflectionalGroup, position: usize) -> Result<(), AnalysisError> {
    if ig.pos.is_empty() {
        return Err(invalid(format!(
            "inflectional group {position} has an empty part-of-speech tag"
        )));
    }

    if position == 1 {
        match ig.root.as_deref() {
            None => {
                return Err(invalid(format!(
                    "inflectional group {position} is missing its root"
                )));
            }
            Some("") => {
                return Err(invalid(format!(
                    "inflectional group {position} has an empty root"
                )));
            }
            Some(_) => {}
        }
    } else {
        let Some(derivation) = &ig.derivation else {
            return Err(invalid(format!(
                "inflectional group {position} is missing its derivational affix"
            )));
        };
        if derivation.meta_morpheme.is_empty() {
            return Err(invalid(format!(
                "inflectional group {position} has an empty derivational meta-morpheme"
            )));
        }
        affix(derivation, position)?;
    }

    ig.inflections
        .iter()
        .try_for_each(|inflection| affix(inflection, position))
}

fn affix(affix: &Affix, position: usize) -> Result<(), AnalysisError> {
    feature(&affix.feature, position)
}

fn feature(feature: &Feature, position: usize) -> Result<(), AnalysisError> {
    if feature.category.is_empty() {
        return Err(invalid(format!(
            "inflectional group {position} has a feature with an empty category"
        )));
    }
    if feature.value.is_empty() {
        return Err(invalid(format!(
            "inflectional group {position} has a feature with an empty value"
        )));
    }
    Ok(())
}
