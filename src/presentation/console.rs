//! Terminal presenter

use std::io::Write;

use async_trait::async_trait;

use crate::presentation::{Cue, Presenter, Snapshot, Tone};
use crate::{Error, Result};

/// How snapshots are written to stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable screen
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

/// Writes the trainer screen to stdout
pub struct ConsolePresenter {
    format: OutputFormat,
}

impl ConsolePresenter {
    /// Create a presenter with the given output format
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Render a snapshot as screen text
    #[must_use]
    pub fn format_text(snapshot: &Snapshot) -> String {
        let mut out = String::new();

        if let Some(score) = &snapshot.final_score {
            out.push_str(&format!(
                "\n=== You got {} out of {} letters right. ===\n",
                score.correct, score.total
            ));
            out.push_str("Type :restart to play again or :quit to leave.\n");
            return out;
        }

        if let Some(letter) = snapshot.letter {
            out.push_str(&format!(
                "\n[{} / {}]   Letter:  {letter}\n",
                snapshot.position, snapshot.total
            ));
        }

        for line in snapshot.status.lines() {
            out.push_str(&format!("  {line}\n"));
        }

        if !snapshot.feedback.text.is_empty() {
            let marker = match snapshot.feedback.tone {
                Tone::Positive => "+",
                Tone::Negative => "-",
                Tone::Neutral => " ",
            };
            out.push_str(&format!("{marker} {}\n", snapshot.feedback.text));
        }

        out
    }

    /// Render a snapshot in the configured output format
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot cannot be serialized as JSON
    pub fn format_snapshot(&self, snapshot: &Snapshot) -> Result<String> {
        Ok(match self.format {
            OutputFormat::Text => Self::format_text(snapshot),
            OutputFormat::Json => serde_json::to_string(snapshot)? + "\n",
        })
    }

    fn write(&self, text: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(text.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

#[async_trait]
impl Presenter for ConsolePresenter {
    fn render(&self, snapshot: &Snapshot) {
        let result = self
            .format_snapshot(snapshot)
            .and_then(|text| self.write(&text));

        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to render snapshot");
        }
    }

    async fn play_cue(&self, cue: Cue) -> Result<()> {
        let line = match self.format {
            OutputFormat::Text => format!("  ♪ {cue}\n"),
            OutputFormat::Json => serde_json::json!({ "cue": cue }).to_string() + "\n",
        };
        self.write(&line)
            .map_err(|e| Error::Presentation(format!("cue {cue}: {e}")))?;

        // Stand-in for the cue's playback time
        tokio::time::sleep(cue.nominal_duration()).await;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::letter::Letter;
    use crate::presentation::{Feedback, FinalScore};
    use crate::session::{Generation, Outcome, Phase};

    fn snapshot() -> Snapshot {
        Snapshot {
            generation: Generation::default(),
            phase: Phase::Listening,
            letter: Letter::from_char('q'),
            position: 3,
            total: 10,
            status: "Listening for speech…".to_string(),
            feedback: Feedback::new("✕ Try again!", Tone::Negative),
            final_score: None,
        }
    }

    #[test]
    fn text_screen() {
        let text = ConsolePresenter::format_text(&snapshot());
        assert!(text.contains("[3 / 10]   Letter:  Q"));
        assert!(text.contains("  Listening for speech…"));
        assert!(text.contains("- ✕ Try again!"));
    }

    #[test]
    fn final_screen() {
        let mut snap = snapshot();
        snap.final_score = Some(FinalScore {
            correct: 8,
            total: 10,
            outcome: Outcome::Win,
        });
        let text = ConsolePresenter::format_text(&snap);
        assert!(text.contains("You got 8 out of 10 letters right."));
        assert!(!text.contains("Letter:"));
    }

    #[test]
    fn json_lines_format() {
        let presenter = ConsolePresenter::new(OutputFormat::Json);
        let line = presenter.format_snapshot(&snapshot()).unwrap();
        assert!(line.ends_with('\n'));
        assert_eq!(line.matches('\n').count(), 1);

        let json: serde_json::Value = serde_json::from_str(&line).unwrap();
        assert_eq!(json["position"], 3);
        assert_eq!(json["status"], "Listening for speech…");

        let text = ConsolePresenter::new(OutputFormat::Text)
            .format_snapshot(&snapshot())
            .unwrap();
        assert_eq!(text, ConsolePresenter::format_text(&snapshot()));
    }

    #[test]
    fn serialization_failures_are_crate_errors() {
        let e: Error = serde_json::from_str::<serde_json::Value>("{").unwrap_err().into();
        assert!(matches!(e, Error::Serialization(_)));
        assert!(e.to_string().starts_with("serialization error"));
    }

    #[test]
    fn json_snapshot_shape() {
        let json = serde_json::to_value(snapshot()).unwrap();
        assert_eq!(json["letter"], "Q");
        assert_eq!(json["phase"]["state"], "listening");
        assert_eq!(json["feedback"]["tone"], "negative");
        assert!(json["final_score"].is_null());
    }
}
