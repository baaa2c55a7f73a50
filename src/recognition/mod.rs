//! Speech recognition port
//!
//! The trainer never captures audio itself. A [`Recognizer`] wraps whatever engine is
//! available and reports one [`RecognitionResult`] or [`RecognitionError`] per attempt.

mod console;
mod error;
mod payload;

use async_trait::async_trait;

pub use console::{ConsoleRecognizer, parse_console_line};
pub use error::{ErrorCode, RecognitionError, Severity};
pub use payload::RecognitionResult;

use crate::letter::Letter;

/// Default recognition locale
pub const DEFAULT_LANGUAGE: &str = "en-US";

/// Options passed to the engine when a round starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOptions {
    /// Locale identifier (e.g. "en-US")
    pub language: String,
}

impl Default for RecognitionOptions {
    fn default() -> Self {
        Self {
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

/// An external speech recognition engine
///
/// Callers keep at most one `listen_for_letter` outstanding.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Engine name for logs
    fn name(&self) -> &'static str;

    /// Prepare the engine for a round
    async fn initialize(&self, options: &RecognitionOptions) -> Result<(), RecognitionError>;

    /// Listen for one utterance; `expected` is a hint only
    async fn listen_for_letter(&self, expected: Letter) -> Result<RecognitionResult, RecognitionError>;

    /// Best-effort request to stop the current attempt
    async fn stop_listening(&self) -> Result<(), RecognitionError>;

    /// Silence the engine's own start/stop beeps
    fn set_audio_feedback_muted(&self, muted: bool);

    /// Keep the display from sleeping while a round runs
    fn set_display_awake(&self, awake: bool);
}
