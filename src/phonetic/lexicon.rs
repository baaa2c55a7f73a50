//! Spoken forms of each letter

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::letter::{ALPHABET_LEN, Letter};
use crate::phonetic::normalize_phrase;
use crate::{Error, Result};

/// How children tend to say each letter, A to Z
const BUILTIN_FORMS: [&[&str]; ALPHABET_LEN] = [
    &["a", "ay", "eh", "ei"],
    &["b", "bee", "be"],
    &["c", "see", "cee", "sea"],
    &["d", "dee"],
    &["e", "ee"],
    &["f", "ef"],
    &["g", "gee"],
    &["h", "aitch"],
    &["i", "eye", "aye"],
    &["j", "jay"],
    &["k", "kay"],
    &["l", "el"],
    &["m", "em"],
    &["n", "en"],
    &["o", "oh"],
    &["p", "pee"],
    &["q", "cue", "queue"],
    &["r", "ar"],
    &["s", "ess"],
    &["t", "tee"],
    &["u", "you", "yu", "yoo"],
    &["v", "vee"],
    &["w", "double you", "double-u"],
    &["x", "ex"],
    &["y", "why"],
    &["z", "zee", "zed"],
];

static STANDARD: OnceLock<Lexicon> = OnceLock::new();

/// Letter → ordered phonetic forms
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexicon {
    forms: Vec<Vec<String>>,
}

impl Lexicon {
    /// The built-in table
    #[must_use]
    pub fn builtin() -> Self {
        let forms = BUILTIN_FORMS
            .iter()
            .map(|forms| forms.iter().map(ToString::to_string).collect())
            .collect();

        Self { forms }
    }

    /// Shared instance of the built-in table
    #[must_use]
    pub fn standard() -> &'static Self {
        STANDARD.get_or_init(Self::builtin)
    }

    /// Built-in table plus extra forms keyed by letter (e.g. `"B" => ["bea"]`)
    ///
    /// # Errors
    ///
    /// Returns error if a key does not name a single letter
    pub fn with_extra_forms(extra: &HashMap<String, Vec<String>>) -> Result<Self> {
        let mut lexicon = Self::builtin();

        // Sorted so the resulting form order does not depend on map iteration
        let mut keys: Vec<&String> = extra.keys().collect();
        keys.sort();

        for key in keys {
            let letter: Letter = key
                .parse()
                .map_err(|_| Error::Config(format!("lexicon key {key:?} is not a letter")))?;
            lexicon.add_forms(letter, &extra[key]);
        }

        tracing::debug!(extra_letters = extra.len(), "lexicon built");
        Ok(lexicon)
    }

    /// Append forms for a letter, normalized, skipping blanks and duplicates
    pub fn add_forms<S: AsRef<str>>(&mut self, letter: Letter, forms: &[S]) {
        let slot = &mut self.forms[letter.index()];
        for form in forms {
            let normalized = normalize_phrase(form.as_ref());
            if normalized.is_empty() || slot.contains(&normalized) {
                continue;
            }
            slot.push(normalized);
        }
    }

    /// Known forms of a letter, in lexicon order
    #[must_use]
    pub fn forms(&self, letter: Letter) -> &[String] {
        &self.forms[letter.index()]
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn letter(c: char) -> Letter {
        Letter::from_char(c).unwrap()
    }

    #[test]
    fn every_letter_has_its_bare_form_first() {
        let lexicon = Lexicon::builtin();
        for l in Letter::all() {
            assert_eq!(lexicon.forms(l)[0], l.lowercase().to_string());
        }
    }

    #[test]
    fn builtin_forms_keep_table_order() {
        assert_eq!(Lexicon::standard().forms(letter('C')), ["c", "see", "cee", "sea"]);
        assert_eq!(
            Lexicon::standard().forms(letter('W')),
            ["w", "double you", "double-u"]
        );
    }

    #[test]
    fn extra_forms_are_normalized_and_deduplicated() {
        let extra = HashMap::from([(
            "b".to_string(),
            vec!["  BEA ".to_string(), "bee".to_string(), "!!".to_string()],
        )]);
        let lexicon = Lexicon::with_extra_forms(&extra).unwrap();

        assert_eq!(lexicon.forms(letter('B')), ["b", "bee", "be", "bea"]);
        assert_eq!(lexicon.forms(letter('A')), Lexicon::standard().forms(letter('A')));
    }

    #[test]
    fn extra_forms_reject_bad_keys() {
        let extra = HashMap::from([("BB".to_string(), vec!["x".to_string()])]);
        assert!(matches!(
            Lexicon::with_extra_forms(&extra),
            Err(Error::Config(_))
        ));
    }
}
