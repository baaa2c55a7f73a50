//! Configuration management for the letter trainer

pub mod file;

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use crate::letter::ALPHABET_LEN;
use crate::phonetic::Lexicon;
use crate::recognition::RecognitionOptions;
use crate::{Error, Result};

use file::ConfigFile;

/// Trainer configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Round rules
    pub session: SessionConfig,

    /// Options handed to the recognizer
    pub recognition: RecognitionOptions,

    /// Extra spoken forms keyed by letter
    pub lexicon_extra: HashMap<String, Vec<String>>,
}

/// Round rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Letters per round, drawn without repetition
    pub sequence_length: usize,

    /// Attempts per letter; one retry with the default of 2
    pub max_attempts: u8,

    /// How long a correct answer's cue gets before the next letter
    pub correct_settle: Duration,

    /// Correct answers needed for the win cue
    pub win_threshold: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            sequence_length: 10,
            max_attempts: 2,
            correct_settle: Duration::from_millis(2000),
            win_threshold: 8,
        }
    }
}

impl SessionConfig {
    /// Win threshold for a round length when none is configured: 80%, rounded up
    #[must_use]
    pub const fn default_win_threshold(sequence_length: usize) -> usize {
        (sequence_length * 8).div_ceil(10)
    }

    /// Check the rules are playable
    ///
    /// # Errors
    ///
    /// Returns error if the sequence length is outside 1..=26, no attempts are
    /// allowed, or the win threshold exceeds the sequence length
    pub fn validate(&self) -> Result<()> {
        if !(1..=ALPHABET_LEN).contains(&self.sequence_length) {
            return Err(Error::Config(format!(
                "sequence_length must be between 1 and {ALPHABET_LEN}, got {}",
                self.sequence_length
            )));
        }

        if self.max_attempts == 0 {
            return Err(Error::Config("max_attempts must be at least 1".to_string()));
        }

        if self.win_threshold > self.sequence_length {
            return Err(Error::Config(format!(
                "win_threshold {} exceeds sequence_length {}",
                self.win_threshold, self.sequence_length
            )));
        }

        Ok(())
    }
}

impl Config {
    /// Load configuration from the standard file and the environment
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration, reading `path` instead of the standard file when given
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file cannot be read or parsed, or if the
    /// resulting configuration is invalid
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let fc = match path {
            Some(path) => file::read_config_file(path)?,
            None => file::load_config_file(),
        };

        Self::from_sources(fc, |key| std::env::var(key).ok())
    }

    /// Merge a config file with an environment lookup (env > toml > default)
    ///
    /// # Errors
    ///
    /// Returns error if the merged session rules or lexicon keys are invalid
    pub fn from_sources(fc: ConfigFile, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = SessionConfig::default();

        let sequence_length = env("LETTER_COACH_SEQUENCE_LENGTH")
            .and_then(|s| s.parse().ok())
            .or(fc.session.sequence_length)
            .unwrap_or(defaults.sequence_length);

        let session = SessionConfig {
            sequence_length,
            max_attempts: env("LETTER_COACH_MAX_ATTEMPTS")
                .and_then(|s| s.parse().ok())
                .or(fc.session.max_attempts)
                .unwrap_or(defaults.max_attempts),
            correct_settle: env("LETTER_COACH_SETTLE_MS")
                .and_then(|s| s.parse().ok())
                .or(fc.session.correct_settle_ms)
                .map_or(defaults.correct_settle, Duration::from_millis),
            win_threshold: env("LETTER_COACH_WIN_THRESHOLD")
                .and_then(|s| s.parse().ok())
                .or(fc.session.win_threshold)
                .unwrap_or_else(|| SessionConfig::default_win_threshold(sequence_length)),
        };
        session.validate()?;

        let recognition = RecognitionOptions {
            language: env("LETTER_COACH_LANGUAGE")
                .or(fc.recognition.language)
                .unwrap_or_else(|| RecognitionOptions::default().language),
        };

        let config = Self {
            session,
            recognition,
            lexicon_extra: fc.lexicon.extra,
        };

        // Surface bad lexicon keys at load time rather than at round start
        config.lexicon()?;

        Ok(config)
    }

    /// Build the lexicon: built-in forms plus configured extras
    ///
    /// # Errors
    ///
    /// Returns error if an extra-forms key is not a letter
    pub fn lexicon(&self) -> Result<Lexicon> {
        if self.lexicon_extra.is_empty() {
            return Ok(Lexicon::builtin());
        }
        Lexicon::with_extra_forms(&self.lexicon_extra)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::Letter;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn parse(toml: &str) -> ConfigFile {
        toml::from_str(toml).unwrap()
    }

    #[test]
    fn defaults() {
        let config = Config::from_sources(ConfigFile::default(), no_env).unwrap();
        assert_eq!(config.session, SessionConfig::default());
        assert_eq!(config.session.sequence_length, 10);
        assert_eq!(config.session.max_attempts, 2);
        assert_eq!(config.session.correct_settle, Duration::from_secs(2));
        assert_eq!(config.session.win_threshold, 8);
        assert_eq!(config.recognition.language, "en-US");
    }

    #[test]
    fn file_overlays_defaults() {
        let fc = parse(
            r#"
            [session]
            sequence_length = 5
            win_threshold = 4

            [recognition]
            language = "en-GB"

            [lexicon.extra]
            Z = ["zeta"]
            "#,
        );
        let config = Config::from_sources(fc, no_env).unwrap();

        assert_eq!(config.session.sequence_length, 5);
        assert_eq!(config.session.win_threshold, 4);
        assert_eq!(config.session.max_attempts, 2);
        assert_eq!(config.recognition.language, "en-GB");

        let lexicon = config.lexicon().unwrap();
        assert!(lexicon
            .forms(Letter::from_char('z').unwrap())
            .contains(&"zeta".to_string()));
    }

    #[test]
    fn env_beats_file() {
        let fc = parse("[session]\nmax_attempts = 3\n[recognition]\nlanguage = \"fr-FR\"");
        let env = |key: &str| match key {
            "LETTER_COACH_MAX_ATTEMPTS" => Some("4".to_string()),
            "LETTER_COACH_SETTLE_MS" => Some("250".to_string()),
            "LETTER_COACH_SEQUENCE_LENGTH" => Some("not a number".to_string()),
            _ => None,
        };
        let config = Config::from_sources(fc, env).unwrap();

        assert_eq!(config.session.max_attempts, 4);
        assert_eq!(config.session.correct_settle, Duration::from_millis(250));
        assert_eq!(config.session.sequence_length, 10);
        assert_eq!(config.recognition.language, "fr-FR");
    }

    #[test]
    fn threshold_follows_length_unless_set() {
        let env = |key: &str| (key == "LETTER_COACH_SEQUENCE_LENGTH").then(|| "5".to_string());
        let config = Config::from_sources(ConfigFile::default(), env).unwrap();
        assert_eq!(config.session.sequence_length, 5);
        assert_eq!(config.session.win_threshold, 4);

        let config = Config::from_sources(parse("[session]\nsequence_length = 1"), no_env).unwrap();
        assert_eq!(config.session.win_threshold, 1);

        let config = Config::from_sources(
            parse("[session]\nsequence_length = 6\nwin_threshold = 6"),
            no_env,
        )
        .unwrap();
        assert_eq!(config.session.win_threshold, 6);

        assert_eq!(SessionConfig::default_win_threshold(10), 8);
        assert_eq!(SessionConfig::default_win_threshold(26), 21);
    }

    #[test]
    fn rejects_unplayable_rules() {
        for toml in [
            "[session]\nsequence_length = 0",
            "[session]\nsequence_length = 27",
            "[session]\nmax_attempts = 0",
            "[session]\nsequence_length = 5\nwin_threshold = 6",
        ] {
            assert!(
                matches!(Config::from_sources(parse(toml), no_env), Err(Error::Config(_))),
                "{toml}"
            );
        }
    }

    #[test]
    fn rejects_bad_lexicon_keys() {
        let fc = parse("[lexicon.extra]\nbee = [\"b\"]");
        assert!(matches!(
            Config::from_sources(fc, no_env),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn explicit_file_must_parse() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        std::fs::write(&path, "[session]\nsequence_length = 6\n").unwrap();
        let session = Config::load_from(Some(&path)).unwrap().session;
        assert_eq!(session.sequence_length, 6);
        assert_eq!(session.win_threshold, 5);

        std::fs::write(&path, "[session\n").unwrap();
        assert!(matches!(Config::load_from(Some(&path)), Err(Error::Toml(_))));

        let missing = dir.path().join("missing.toml");
        assert!(matches!(Config::load_from(Some(&missing)), Err(Error::Io(_))));
    }
}
