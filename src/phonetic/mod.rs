//! Phonetic letter matching
//!
//! Maps noisy recognizer transcripts onto one of the 26 letters:
//! - [`Lexicon`]: spoken forms per letter
//! - [`Lexicon::score`]: one phrase against one letter, 0 to 4
//! - [`Lexicon::resolve`]: a candidate set against all letters, biased toward the expected one

mod lexicon;
mod resolver;
mod scorer;

pub use lexicon::Lexicon;
pub use resolver::{ACCEPT_THRESHOLD, EXPECTED_BIAS, LetterEvidence, resolve};
pub use scorer::{Score, normalize_phrase, score};
