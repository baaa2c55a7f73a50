//! The 26 target letters

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::Error;

/// Number of letters in the alphabet
pub const ALPHABET_LEN: usize = 26;

/// One uppercase letter A-Z
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Letter(u8);

impl Letter {
    /// Build a letter from a char, ignoring case
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        if c.is_ascii_alphabetic() {
            #[allow(clippy::cast_possible_truncation)]
            Some(Self((c as u8).to_ascii_uppercase()))
        } else {
            None
        }
    }

    /// Build a letter from its alphabetical position (0 = A)
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        if index < ALPHABET_LEN {
            #[allow(clippy::cast_possible_truncation)]
            Some(Self(b'A' + index as u8))
        } else {
            None
        }
    }

    /// Alphabetical position (0 = A)
    #[must_use]
    pub const fn index(self) -> usize {
        (self.0 - b'A') as usize
    }

    /// Uppercase char
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// Lowercase char, as it appears in normalized phrases
    #[must_use]
    pub const fn lowercase(self) -> char {
        self.0.to_ascii_lowercase() as char
    }

    /// Iterate A to Z
    pub fn all() -> impl Iterator<Item = Self> {
        (0..ALPHABET_LEN).filter_map(Self::from_index)
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Letter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or_else(|| Error::InvalidLetter(s.to_string())),
            _ => Err(Error::InvalidLetter(s.to_string())),
        }
    }
}

impl Serialize for Letter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
