//! Resolve a set of candidate phrases to one letter

use serde::Serialize;

use crate::letter::Letter;
use crate::phonetic::{Lexicon, Score};

/// Bonus added to the expected letter's score
pub const EXPECTED_BIAS: u8 = 1;

/// Minimum biased score for a confident answer
pub const ACCEPT_THRESHOLD: u8 = 2;

/// Evidence collected for one letter across all candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LetterEvidence {
    /// Letter scored
    pub letter: Letter,
    /// Best raw score over the candidates
    pub score: Score,
    /// Raw score plus the expected-letter bias
    pub biased: u8,
}

impl Lexicon {
    /// Every letter with some evidence, in alphabetical order
    ///
    /// An empty candidate set is scored as a single empty phrase, so it yields nothing.
    #[must_use]
    pub fn rank<S: AsRef<str>>(&self, candidates: &[S], expected: Option<Letter>) -> Vec<LetterEvidence> {
        let phrases: Vec<&str> = if candidates.is_empty() {
            vec![""]
        } else {
            candidates.iter().map(AsRef::as_ref).collect()
        };

        Letter::all()
            .filter_map(|letter| {
                let score = phrases
                    .iter()
                    .map(|phrase| self.score(phrase, letter))
                    .max()
                    .unwrap_or_default();

                if score == Score::NONE {
                    return None;
                }

                let bias = if Some(letter) == expected { EXPECTED_BIAS } else { 0 };
                Some(LetterEvidence {
                    letter,
                    score,
                    biased: score.value() + bias,
                })
            })
            .collect()
    }

    /// Pick the best letter, or `None` without confident evidence
    ///
    /// Ties go to the alphabetically earlier letter.
    #[must_use]
    pub fn resolve<S: AsRef<str>>(&self, candidates: &[S], expected: Option<Letter>) -> Option<Letter> {
        let mut best: Option<LetterEvidence> = None;

        for evidence in self.rank(candidates, expected) {
            if best.is_none_or(|b| evidence.biased > b.biased) {
                best = Some(evidence);
            }
        }

        best.filter(|b| b.biased >= ACCEPT_THRESHOLD)
            .map(|b| b.letter)
    }
}

/// Resolve candidates using the built-in lexicon
#[must_use]
pub fn resolve<S: AsRef<str>>(candidates: &[S], expected: Option<Letter>) -> Option<Letter> {
    Lexicon::standard().resolve(candidates, expected)
}
