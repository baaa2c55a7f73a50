//! Session state owned by the state machine

use std::time::Instant;

use serde::Serialize;

use crate::letter::Letter;
use crate::presentation::{Feedback, FinalScore, Snapshot};

/// Round counter; async completions carry the generation that issued them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Generation(u64);

impl Generation {
    /// The following generation
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

/// Result of a finished round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
}

/// What happens once the `wrong` cue has finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FollowUp {
    /// Listen again for the same letter
    Retry,
    /// Move on without credit
    Advance,
}

/// Where the session is in the listen / evaluate / feedback cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Phase {
    /// No round running
    #[default]
    Idle,
    /// Waiting for the recognizer to initialize
    Preparing,
    /// One listening attempt outstanding
    Listening,
    /// Scoring a result; never rendered
    Evaluating,
    /// Correct answer, waiting out the settle timer
    Settling,
    /// Wrong answer, waiting for the cue to finish
    AwaitingCue { then: FollowUp },
    /// Recognition disabled for the round; letters advance on skip only
    FatalError,
    /// Round over
    Ended { outcome: Outcome },
}

/// All mutable state of one session
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub generation: Generation,
    /// Target letters for the round
    pub sequence: Vec<Letter>,
    /// Position in `sequence`; equals its length once the round has ended
    pub index: usize,
    pub correct: usize,
    /// Misses for the current letter
    pub attempts: u8,
    pub recognition_enabled: bool,
    /// Set by init failures and hard errors; cleared only by a new round
    pub fatal: bool,
    pub phase: Phase,
    pub status: String,
    pub feedback: Feedback,
    /// When the outstanding listen started, for latency diagnostics
    pub listen_started: Option<Instant>,
}

impl SessionState {
    /// Letter currently expected
    #[must_use]
    pub fn current_letter(&self) -> Option<Letter> {
        self.sequence.get(self.index).copied()
    }

    /// Whether a listening attempt is outstanding
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.phase == Phase::Listening
    }

    /// Number of letters in the round
    #[must_use]
    pub fn total(&self) -> usize {
        self.sequence.len()
    }

    /// Outcome once the round has ended
    #[must_use]
    pub const fn outcome(&self) -> Option<Outcome> {
        match self.phase {
            Phase::Ended { outcome } => Some(outcome),
            _ => None,
        }
    }

    /// Render-ready view of the state
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let total = self.total();

        Snapshot {
            generation: self.generation,
            phase: self.phase,
            letter: self.current_letter(),
            position: (self.index + 1).min(total),
            total,
            status: self.status.clone(),
            feedback: self.feedback.clone(),
            final_score: self.outcome().map(|outcome| FinalScore {
                correct: self.correct,
                total,
                outcome,
            }),
        }
    }
}
