//! Symptom extraction: free text in, canonical feature names out.
//!
//! Two passes over a normalized text blob:
//! 1. Keyword pass — whole-word search for every vocabulary entry, in both
//!    its underscore form (`high_fever`) and its space form (`high fever`).
//! 2. Fuzzy pass — each token of at least three characters is compared to
//!    the vocabulary by sequence-matcher ratio (`2·matches / total length`);
//!    the single best entry at or above the cutoff is accepted as a typo
//!    repair.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::vocabulary::Vocabulary;
use super::ModelError;

/// Minimum similarity for a fuzzy match.
pub const FUZZY_CUTOFF: f32 = 0.85;

/// Tokens shorter than this never go through the fuzzy pass.
pub const MIN_FUZZY_TOKEN_CHARS: usize = 3;

static PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s]").expect("static punctuation pattern"));

/// Canonical symptom set for a single request.
///
/// Keeps first-seen order for logging; membership is what matters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalSymptoms {
    names: Vec<String>,
    positions: HashSet<usize>,
}

impl CanonicalSymptoms {
    /// Add the feature at vocabulary position `pos`. Returns false if present.
    fn insert(&mut self, pos: usize, name: &str) -> bool {
        if !self.positions.insert(pos) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    pub fn contains_position(&self, pos: usize) -> bool {
        self.positions.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

/// Maps raw user input onto the fixed vocabulary.
///
/// Built once per loaded model; whole-word patterns are compiled up front.
#[derive(Debug, Clone)]
pub struct SymptomExtractor {
    vocabulary: Vocabulary,
    patterns: Vec<Regex>,
}

impl SymptomExtractor {
    pub fn new(vocabulary: Vocabulary) -> Result<Self, ModelError> {
        let patterns = vocabulary
            .lowercase_names()
            .iter()
            .map(|lower| keyword_pattern(lower))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            vocabulary,
            patterns,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Extract the canonical symptom set from one or more raw strings.
    ///
    /// Accepts token lists (`["fever", "headache"]`) and sentences
    /// (`["I have a high fever"]`) alike. Never fails.
    pub fn extract<S: AsRef<str>>(&self, raw_inputs: &[S]) -> CanonicalSymptoms {
        let text = normalize(raw_inputs);
        let mut found = CanonicalSymptoms::default();

        tracing::debug!(text = %text, "Scanning symptom text");

        for (pos, pattern) in self.patterns.iter().enumerate() {
            if !pattern.is_match(&text) {
                continue;
            }
            let name = &self.vocabulary.names()[pos];
            if found.insert(pos, name) {
                tracing::debug!(symptom = %name, "Matched keyword");
            }
        }

        for token in text.split_whitespace() {
            let Some(pos) = self.fuzzy_position(token) else {
                continue;
            };
            let name = &self.vocabulary.names()[pos];
            if found.insert(pos, name) {
                tracing::debug!(token, symptom = %name, "Repaired typo");
            }
        }

        found
    }

    /// Closest vocabulary entry for a single token, if similar enough.
    pub fn fuzzy_match(&self, token: &str) -> Option<&str> {
        self.fuzzy_position(&token.to_lowercase())
            .and_then(|pos| self.vocabulary.canonical(pos))
    }

    fn fuzzy_position(&self, token: &str) -> Option<usize> {
        if token.chars().count() < MIN_FUZZY_TOKEN_CHARS {
            return None;
        }

        let candidates: Vec<&str> = self
            .vocabulary
            .lowercase_names()
            .iter()
            .map(String::as_str)
            .collect();

        // Matches come back best first; equal ratios keep vocabulary order.
        difflib::get_close_matches(token, candidates, 1, FUZZY_CUTOFF)
            .first()
            .and_then(|closest| self.vocabulary.position(closest))
    }
}

/// Join, lowercase and replace punctuation with spaces.
/// Underscores count as word characters and survive.
fn normalize<S: AsRef<str>>(raw_inputs: &[S]) -> String {
    let joined = raw_inputs
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<&str>>()
        .join(" ")
        .to_lowercase();
    PUNCTUATION.replace_all(&joined, " ").into_owned()
}

fn keyword_pattern(lower: &str) -> Result<Regex, ModelError> {
    let underscore = regex::escape(lower);
    let spaced = lower.replace('_', " ");
    let source = if spaced == lower {
        format!(r"\b{underscore}\b")
    } else {
        format!(r"\b(?:{underscore}|{})\b", regex::escape(&spaced))
    };
    Regex::new(&source)
        .map_err(|e| ModelError::InvalidVocabulary(format!("cannot compile '{lower}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor(names: &[&str]) -> SymptomExtractor {
        let vocab = Vocabulary::new(names.iter().map(|s| s.to_string()).collect()).unwrap();
        SymptomExtractor::new(vocab).unwrap()
    }

    fn has(set: &CanonicalSymptoms, name: &str) -> bool {
        set.iter().any(|n| n == name)
    }

    fn sorted(set: CanonicalSymptoms) -> Vec<String> {
        let mut v = set.into_vec();
        v.sort();
        v
    }

    #[test]
    fn sentence_with_space_form() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        let found = ex.extract(&["I have a high fever and headache"]);
        assert_eq!(sorted(found), vec!["headache", "high_fever"]);
    }

    #[test]
    fn token_list_with_underscore_form() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        let found = ex.extract(&["high_fever", "cough"]);
        assert_eq!(sorted(found), vec!["cough", "high_fever"]);
    }

    #[test]
    fn every_entry_matches_both_forms() {
        let names = [
            "itching",
            "skin_rash",
            "nodal_skin_eruptions",
            "continuous_sneezing",
            "high_fever",
            "headache",
        ];
        let ex = extractor(&names);
        for name in names {
            assert!(has(&ex.extract(&[name]), name), "underscore form: {name}");
            let spaced = name.replace('_', " ");
            assert!(has(&ex.extract(&[spaced.as_str()]), name), "space form: {spaced}");
        }
    }

    #[test]
    fn punctuation_and_case_are_ignored() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        let found = ex.extract(&["HIGH FEVER, Headache... and a cough!"]);
        assert_eq!(sorted(found), vec!["cough", "headache", "high_fever"]);
    }

    #[test]
    fn returns_canonical_casing() {
        let ex = extractor(&["High_Fever", "Headache"]);
        let found = ex.extract(&["high fever"]);
        assert_eq!(found.into_vec(), vec!["High_Fever"]);
    }

    #[test]
    fn substring_inside_longer_word_does_not_match() {
        let ex = extractor(&["ache", "headache"]);
        let found = ex.extract(&["terrible headache"]);
        assert_eq!(found.into_vec(), vec!["headache"]);
    }

    #[test]
    fn standalone_word_still_matches() {
        let ex = extractor(&["ache", "headache"]);
        let found = ex.extract(&["headache and a dull ache"]);
        assert_eq!(sorted(found), vec!["ache", "headache"]);
    }

    #[test]
    fn typo_is_repaired_by_fuzzy_pass() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        let found = ex.extract(&["heaache"]);
        assert!(has(&found, "headache"));
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn swapped_letters_are_repaired() {
        let ex = extractor(&["headache", "itching"]);
        assert_eq!(ex.extract(&["haedache"]).into_vec(), vec!["headache"]);
        assert_eq!(ex.extract(&["itcihng"]).into_vec(), vec!["itching"]);
        assert_eq!(ex.fuzzy_match("haedache"), Some("headache"));
    }

    #[test]
    fn swapped_letters_inside_sentence() {
        let ex = extractor(&["high_fever", "headache", "itching"]);
        let found = ex.extract(&["bad haedache and some itcihng since monday"]);
        assert_eq!(sorted(found), vec!["headache", "itching"]);
    }

    #[test]
    fn fuzzy_pass_respects_cutoff() {
        let ex = extractor(&["headache"]);
        // 5 matching characters over 15 gives a ratio of 0.67.
        assert!(ex.extract(&["heddake"]).is_empty());
    }

    #[test]
    fn short_tokens_never_fuzzy_match() {
        let ex = extractor(&["ab", "abc_def"]);
        assert_eq!(ex.fuzzy_match("ab"), None);
        assert_eq!(ex.fuzzy_match("a"), None);
        assert_eq!(ex.fuzzy_match(""), None);
    }

    #[test]
    fn fuzzy_match_is_case_insensitive() {
        let ex = extractor(&["Headache"]);
        assert_eq!(ex.fuzzy_match("HEAACHE"), Some("Headache"));
    }

    #[test]
    fn fuzzy_ties_go_to_earliest_entry() {
        // One substitution away from both entries.
        let ex = extractor(&["stomach_paina", "stomach_painb"]);
        assert_eq!(ex.fuzzy_match("stomach_painc"), Some("stomach_paina"));
    }

    #[test]
    fn duplicates_collapse() {
        let ex = extractor(&["headache"]);
        let found = ex.extract(&["headache", "headache", "heaache"]);
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn extraction_is_idempotent() {
        let ex = extractor(&["ache", "headache", "high_fever", "skin_rash", "cough"]);
        let first = ex.extract(&["I have a high fever, a skin rash and a bad headache"]);
        let names: Vec<String> = first.iter().map(str::to_string).collect();
        let second = ex.extract(names.as_slice());
        assert_eq!(sorted(first), sorted(second));
    }

    #[test]
    fn unrecognized_text_yields_empty_set() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        assert!(ex.extract(&["xyz123"]).is_empty());
        assert!(ex.extract::<&str>(&[]).is_empty());
    }

    #[test]
    fn positions_follow_vocabulary() {
        let ex = extractor(&["high_fever", "headache", "cough"]);
        let found = ex.extract(&["cough"]);
        assert!(found.contains_position(2));
        assert!(!found.contains_position(0));
    }
}
