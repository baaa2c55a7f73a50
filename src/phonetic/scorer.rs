//! Phrase scoring against a single letter

use serde::Serialize;

use crate::letter::Letter;
use crate::phonetic::Lexicon;

/// Strength of the evidence that a phrase names a letter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// No evidence
    pub const NONE: Self = Self(0);
    /// Reserved rank, unused by the current policy
    pub const RESERVED: Self = Self(1);
    /// Prefix relation, or a very short phrase starting with the letter
    pub const PARTIAL: Self = Self(2);
    /// One word of the phrase is a phonetic form
    pub const WORD: Self = Self(3);
    /// The whole phrase is a phonetic form, or is the bare letter
    pub const EXACT: Self = Self(4);

    /// Numeric rank, 0 to 4
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }
}

/// Lowercase, keep only `a-z` and whitespace, collapse whitespace runs
#[must_use]
pub fn normalize_phrase(phrase: &str) -> String {
    let kept: String = phrase
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_whitespace())
        .collect();

    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

impl Lexicon {
    /// Score how well a raw phrase matches one letter
    #[must_use]
    pub fn score(&self, phrase: &str, letter: Letter) -> Score {
        let forms = self.forms(letter);
        if phrase.is_empty() || forms.is_empty() {
            return Score::NONE;
        }

        let norm = normalize_phrase(phrase);
        if norm.is_empty() {
            return Score::NONE;
        }

        let mut best = Score::NONE;

        if forms.iter().any(|form| *form == norm) {
            best = Score::EXACT;
        }

        for word in norm.split(' ') {
            for form in forms {
                if word == form {
                    best = best.max(Score::WORD);
                } else if form.starts_with(word) || word.starts_with(form.as_str()) {
                    best = best.max(Score::PARTIAL);
                }
            }
        }

        let bare = letter.lowercase();
        let starts_with_letter = norm.starts_with(bare);

        // Single-character utterance such as "b"
        if norm.len() == 1 && starts_with_letter {
            best = best.max(Score::EXACT);
        }

        // Short fragments and stutters such as "buh"
        if norm.len() <= 3 && starts_with_letter {
            best = best.max(Score::PARTIAL);
        }

        best
    }
}

/// Score a phrase against a letter using the built-in lexicon
#[must_use]
pub fn score(phrase: &str, letter: Letter) -> Score {
    Lexicon::standard().score(phrase, letter)
}
