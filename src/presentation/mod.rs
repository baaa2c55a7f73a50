//! Presentation port
//!
//! The session renders a [`Snapshot`] after every transition and asks for audio cues.
//! Cue completion is reported back by returning from [`Presenter::play_cue`].

mod console;

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;

pub use console::{ConsolePresenter, OutputFormat};

use crate::Result;
use crate::letter::Letter;
use crate::session::{Generation, Outcome, Phase};

/// Semantic colour of feedback text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    #[default]
    Neutral,
    Positive,
    Negative,
}

/// Feedback line shown under the letter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Feedback {
    pub text: String,
    pub tone: Tone,
}

impl Feedback {
    /// Feedback with the given tone
    #[must_use]
    pub fn new(text: impl Into<String>, tone: Tone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}

/// Audio cue to play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    Correct,
    Wrong,
    Win,
    Lose,
}

impl Cue {
    /// Typical playback length of the cue
    #[must_use]
    pub const fn nominal_duration(self) -> Duration {
        match self {
            Self::Correct => Duration::from_millis(2000),
            Self::Wrong => Duration::from_millis(1000),
            Self::Win | Self::Lose => Duration::from_millis(2500),
        }
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Correct => "correct",
            Self::Wrong => "wrong",
            Self::Win => "win",
            Self::Lose => "lose",
        })
    }
}

/// Final score of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FinalScore {
    pub correct: usize,
    pub total: usize,
    pub outcome: Outcome,
}

/// Everything needed to draw the trainer screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Round the snapshot belongs to
    pub generation: Generation,
    /// Current phase
    pub phase: Phase,
    /// Letter on screen, `None` before a round or after it ends
    pub letter: Option<Letter>,
    /// 1-based position shown as "position / total"
    pub position: usize,
    pub total: usize,
    /// Free-text status and diagnostics
    pub status: String,
    pub feedback: Feedback,
    /// Present once the round has ended
    pub final_score: Option<FinalScore>,
}

/// Draws snapshots and plays cues
#[async_trait]
pub trait Presenter: Send + Sync {
    /// Draw the current state
    fn render(&self, snapshot: &Snapshot);

    /// Play a cue, returning when playback has finished
    ///
    /// # Errors
    ///
    /// Returns error if the cue could not be played; the session still continues
    async fn play_cue(&self, cue: Cue) -> Result<()>;
}
