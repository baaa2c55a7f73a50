//! Terminal stand-in for a speech engine
//!
//! Each typed line is one utterance:
//! - `bee` is a transcript
//! - `bee | be | pee` is a list of alternates, best first
//! - `{"text": ...}` is a raw result payload
//! - `!NO_MATCH` or `!{"code": ...}` is an engine error

use async_trait::async_trait;
use tokio::sync::{Mutex, mpsc};

use crate::letter::Letter;
use crate::recognition::{
    ErrorCode, RecognitionError, RecognitionOptions, RecognitionResult, Recognizer,
};

/// Recognizer fed by lines of text
pub struct ConsoleRecognizer {
    lines: Mutex<mpsc::Receiver<String>>,
}

impl ConsoleRecognizer {
    /// Create a recognizer reading utterances from `lines`
    #[must_use]
    pub fn new(lines: mpsc::Receiver<String>) -> Self {
        Self {
            lines: Mutex::new(lines),
        }
    }
}

#[async_trait]
impl Recognizer for ConsoleRecognizer {
    fn name(&self) -> &'static str {
        "console"
    }

    async fn initialize(&self, options: &RecognitionOptions) -> Result<(), RecognitionError> {
        tracing::debug!(language = %options.language, "console recognizer ready");
        Ok(())
    }

    async fn listen_for_letter(&self, expected: Letter) -> Result<RecognitionResult, RecognitionError> {
        tracing::debug!(%expected, "waiting for typed utterance");

        let mut lines = self.lines.lock().await;

        // Lines typed while nothing was listening belong to no attempt
        let mut stale = 0_usize;
        while lines.try_recv().is_ok() {
            stale += 1;
        }
        if stale > 0 {
            tracing::debug!(stale, "dropped lines typed between attempts");
        }

        match lines.recv().await {
            Some(line) => parse_console_line(&line),
            None => Err(RecognitionError::new(
                ErrorCode::EngineUnavailable,
                "input closed",
            )),
        }
    }

    async fn stop_listening(&self) -> Result<(), RecognitionError> {
        tracing::debug!("console recognizer stop requested");
        Ok(())
    }

    fn set_audio_feedback_muted(&self, muted: bool) {
        tracing::debug!(muted, "audio feedback mute");
    }

    fn set_display_awake(&self, awake: bool) {
        tracing::debug!(awake, "display keep-awake");
    }
}

/// Interpret one typed line as an engine response
///
/// # Errors
///
/// Returns the error the line describes, `NO_MATCH` for a blank line, or
/// `MALFORMED_PAYLOAD` for an unparseable JSON payload
pub fn parse_console_line(line: &str) -> Result<RecognitionResult, RecognitionError> {
    let line = line.trim();

    if let Some(raw) = line.strip_prefix('!') {
        return Err(RecognitionError::from_raw(raw));
    }

    if line.starts_with('{') {
        return RecognitionResult::from_payload(line);
    }

    if line.contains('|') {
        let matches = line
            .split('|')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string)
            .collect();
        return RecognitionResult::from_alternatives(matches, None);
    }

    if line.is_empty() {
        return Err(RecognitionError::new(ErrorCode::NoMatch, "nothing heard"));
    }

    Ok(RecognitionResult::new(line))
}
