//! TOML configuration file loading
//!
//! Supports `~/.config/letter-coach/config.toml` as a persistent config source.
//! All fields are optional; the file is a partial overlay on top of defaults.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Round settings
    #[serde(default)]
    pub session: SessionFileConfig,

    /// Recognition engine settings
    #[serde(default)]
    pub recognition: RecognitionFileConfig,

    /// Lexicon additions
    #[serde(default)]
    pub lexicon: LexiconFileConfig,
}

/// Round configuration
#[derive(Debug, Default, Deserialize)]
pub struct SessionFileConfig {
    /// Letters per round
    pub sequence_length: Option<usize>,

    /// Attempts per letter before moving on
    pub max_attempts: Option<u8>,

    /// Pause after a correct answer, in milliseconds
    pub correct_settle_ms: Option<u64>,

    /// Correct answers needed to win; 80% of the round when unset
    pub win_threshold: Option<usize>,
}

/// Recognition configuration
#[derive(Debug, Default, Deserialize)]
pub struct RecognitionFileConfig {
    /// Locale (e.g. "en-US")
    pub language: Option<String>,
}

/// Lexicon configuration
#[derive(Debug, Default, Deserialize)]
pub struct LexiconFileConfig {
    /// Extra spoken forms keyed by letter
    #[serde(default)]
    pub extra: HashMap<String, Vec<String>>,
}

/// Load the TOML config file from the standard path
///
/// Returns `ConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file() -> ConfigFile {
    let Some(path) = config_file_path() else {
        return ConfigFile::default();
    };

    if !path.exists() {
        return ConfigFile::default();
    }

    match read_config_file(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to load config file, using defaults"
            );
            ConfigFile::default()
        }
    }
}

/// Read and parse a specific config file
///
/// # Errors
///
/// Returns error if the file cannot be read or is not valid TOML for this schema
pub fn read_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)?;
    let config = toml::from_str(&content)?;
    tracing::info!(path = %path.display(), "loaded config file");
    Ok(config)
}

/// Return the config file path: `~/.config/letter-coach/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("letter-coach").join("config.toml"))
}
