//! Round state machine
//!
//! [`SessionMachine::handle`] takes one [`Event`] and returns the [`Command`]s the
//! driver must carry out. It performs no I/O and never waits, so every transition
//! can be exercised synchronously.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::config::SessionConfig;
use crate::letter::Letter;
use crate::phonetic::Lexicon;
use crate::presentation::{Cue, Feedback, Snapshot, Tone};
use crate::recognition::{RecognitionError, RecognitionResult};
use crate::session::state::{FollowUp, Generation, Outcome, Phase, SessionState};

/// Inputs to the state machine
#[derive(Debug)]
pub enum Event {
    /// Start a round, or restart the current one
    Start,
    /// The recognizer finished initializing
    Initialized {
        generation: Generation,
        outcome: Result<(), RecognitionError>,
    },
    /// A listening attempt completed
    Recognized {
        generation: Generation,
        outcome: Result<RecognitionResult, RecognitionError>,
    },
    /// A gated cue finished playing
    CueFinished { generation: Generation },
    /// The pause after a correct answer is over
    SettleElapsed { generation: Generation },
    /// Manual "next letter"
    Skip,
    /// Leave the trainer
    Leave,
}

/// Side effects requested by the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Initialize the recognizer and report `Event::Initialized`
    Initialize { generation: Generation },
    /// Listen once and report `Event::Recognized`
    Listen {
        generation: Generation,
        expected: Letter,
    },
    /// Best-effort stop of the outstanding listen; nothing is reported back
    StopListening,
    /// Play a cue; gated cues report `Event::CueFinished`
    PlayCue {
        generation: Generation,
        cue: Cue,
        gated: bool,
    },
    /// Report `Event::SettleElapsed` after a delay
    StartSettleTimer {
        generation: Generation,
        after: Duration,
    },
    SetAudioFeedbackMuted(bool),
    SetDisplayAwake(bool),
    /// Draw the screen
    Render(Snapshot),
}

/// Owns the session state and applies events to it
pub struct SessionMachine {
    config: SessionConfig,
    lexicon: Arc<Lexicon>,
    rng: StdRng,
    state: SessionState,
}

impl SessionMachine {
    /// Create an idle machine; a seed makes letter sequences reproducible
    #[must_use]
    pub fn new(config: SessionConfig, lexicon: Arc<Lexicon>, seed: Option<u64>) -> Self {
        let rng = seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64);

        Self {
            config,
            lexicon,
            rng,
            state: SessionState::default(),
        }
    }

    #[must_use]
    pub const fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub const fn generation(&self) -> Generation {
        self.state.generation
    }

    #[must_use]
    pub fn into_state(self) -> SessionState {
        self.state
    }

    /// Apply one event
    ///
    /// Events from a superseded generation, or that the current phase does not
    /// expect, change nothing and yield no commands. Otherwise the last command is
    /// always a [`Command::Render`] of the new state.
    pub fn handle(&mut self, event: Event) -> Vec<Command> {
        let mut out = Vec::new();

        let applied = match event {
            Event::Start => {
                self.start(&mut out);
                true
            }
            Event::Initialized {
                generation,
                outcome,
            } => {
                let expected = self.state.phase == Phase::Preparing;
                self.accept(generation, expected, "initialized")
                    && self.on_initialized(outcome, &mut out)
            }
            Event::Recognized {
                generation,
                outcome,
            } => {
                let expected = self.state.is_listening();
                self.accept(generation, expected, "recognized")
                    && self.on_recognized(outcome, &mut out)
            }
            Event::CueFinished { generation } => {
                let then = match self.state.phase {
                    Phase::AwaitingCue { then } => Some(then),
                    _ => None,
                };
                match then {
                    Some(then) if self.accept(generation, true, "cue finished") => {
                        match then {
                            FollowUp::Retry => self.listen(&mut out),
                            FollowUp::Advance => self.advance(&mut out),
                        }
                        true
                    }
                    _ => self.accept(generation, false, "cue finished"),
                }
            }
            Event::SettleElapsed { generation } => {
                let expected = self.state.phase == Phase::Settling;
                if self.accept(generation, expected, "settle elapsed") {
                    self.advance(&mut out);
                    true
                } else {
                    false
                }
            }
            Event::Skip => {
                if self.state.phase == Phase::FatalError {
                    tracing::info!(index = self.state.index, "letter skipped");
                    self.advance(&mut out);
                    true
                } else {
                    tracing::debug!(phase = ?self.state.phase, "skip ignored");
                    false
                }
            }
            Event::Leave => {
                self.leave(&mut out);
                true
            }
        };

        if applied {
            out.push(Command::Render(self.state.snapshot()));
        }
        out
    }

    fn accept(&self, generation: Generation, expected: bool, event: &'static str) -> bool {
        if generation != self.state.generation {
            tracing::debug!(
                event,
                stale = generation.value(),
                current = self.state.generation.value(),
                "ignoring stale event"
            );
            return false;
        }
        if !expected {
            tracing::debug!(event, phase = ?self.state.phase, "ignoring unexpected event");
            return false;
        }
        true
    }

    fn start(&mut self, out: &mut Vec<Command>) {
        if self.state.is_listening() {
            out.push(Command::StopListening);
        }

        let mut sequence: Vec<Letter> = Letter::all().collect();
        sequence.shuffle(&mut self.rng);
        sequence.truncate(self.config.sequence_length);

        let generation = self.state.generation.next();
        self.state = SessionState {
            generation,
            sequence,
            phase: Phase::Preparing,
            status: "Preparing microphone…".to_string(),
            ..SessionState::default()
        };

        let letters: String = self.state.sequence.iter().copied().map(Letter::as_char).collect();
        tracing::info!(generation = generation.value(), %letters, "round started");

        out.push(Command::SetDisplayAwake(true));
        out.push(Command::SetAudioFeedbackMuted(true));
        out.push(Command::Initialize { generation });
    }

    fn on_initialized(&mut self, outcome: Result<(), RecognitionError>, out: &mut Vec<Command>) -> bool {
        match outcome {
            Ok(()) => {
                self.state.recognition_enabled = true;
                self.listen(out);
            }
            Err(e) => {
                tracing::error!(error = %e, "recognizer initialization failed");
                self.disable_recognition(format!("Init error: {e}"));
            }
        }
        true
    }

    fn on_recognized(
        &mut self,
        outcome: Result<RecognitionResult, RecognitionError>,
        out: &mut Vec<Command>,
    ) -> bool {
        let engine_ms = self
            .state
            .listen_started
            .take()
            .map_or(0, |started| elapsed_u64(started.elapsed().as_millis()));
        self.state.phase = Phase::Evaluating;

        match outcome {
            Ok(result) => self.evaluate(&result, engine_ms, out),
            Err(e) if e.is_hard() => {
                tracing::error!(error = %e, engine_ms, "hard recognition error");
                self.disable_recognition(format!(
                    "Engine error after ~{engine_ms} ms: {e}.\nRecognition is off for this round."
                ));
            }
            Err(e) => {
                tracing::warn!(error = %e, engine_ms, "soft recognition error");
                let note = format!(
                    "Soft error after ~{engine_ms} ms.\nDidn't catch that (error {}).",
                    e.code
                );
                self.state.status.clone_from(&note);
                self.state.attempts += 1;
                if self.state.attempts < self.config.max_attempts {
                    self.listen(out);
                } else {
                    self.advance(out);
                }

                // Keep the error visible above the new listening status
                if self.state.is_listening() {
                    self.state.status = format!("{note}\n{}", self.state.status);
                }
            }
        }
        true
    }

    fn evaluate(&mut self, result: &RecognitionResult, engine_ms: u64, out: &mut Vec<Command>) {
        let Some(expected) = self.state.current_letter() else {
            return;
        };

        let match_started = Instant::now();
        let resolved = self.lexicon.resolve(&result.candidates(), Some(expected));
        let match_us = elapsed_u64(match_started.elapsed().as_micros());

        let heard = resolved.map_or_else(|| "?".to_string(), |letter| letter.to_string());
        self.state.status = format!(
            "Engine: ~{engine_ms} ms, match: ~{match_us} µs.\nHeard: \"{}\" → {heard} (expected {expected})",
            result.transcript
        );

        tracing::info!(
            transcript = %result.transcript,
            alternates = result.alternates.len(),
            resolved = %heard,
            %expected,
            engine_ms,
            match_us,
            "utterance resolved"
        );

        let generation = self.state.generation;
        if resolved == Some(expected) {
            self.state.correct += 1;
            self.state.feedback = Feedback::new("✓ Correct!", Tone::Positive);
            self.state.phase = Phase::Settling;
            out.push(Command::PlayCue {
                generation,
                cue: Cue::Correct,
                gated: false,
            });
            out.push(Command::StartSettleTimer {
                generation,
                after: self.config.correct_settle,
            });
            return;
        }

        self.state.attempts += 1;
        let (text, then) = if self.state.attempts < self.config.max_attempts {
            ("✕ Try again!", FollowUp::Retry)
        } else {
            ("✕ Wrong letter.", FollowUp::Advance)
        };
        self.state.feedback = Feedback::new(text, Tone::Negative);
        self.state.phase = Phase::AwaitingCue { then };
        out.push(Command::PlayCue {
            generation,
            cue: Cue::Wrong,
            gated: true,
        });
    }

    fn listen(&mut self, out: &mut Vec<Command>) {
        if !self.state.recognition_enabled || self.state.fatal {
            self.state.phase = Phase::FatalError;
            return;
        }
        if self.state.is_listening() {
            tracing::debug!("listen already outstanding");
            return;
        }
        let Some(expected) = self.state.current_letter() else {
            return;
        };

        self.state.phase = Phase::Listening;
        self.state.listen_started = Some(Instant::now());
        self.state.status = "Listening for speech…".to_string();
        out.push(Command::Listen {
            generation: self.state.generation,
            expected,
        });
    }

    fn advance(&mut self, out: &mut Vec<Command>) {
        self.state.index += 1;
        self.state.attempts = 0;
        self.state.feedback = Feedback::default();

        if self.state.index >= self.state.total() {
            self.state.index = self.state.total();
            self.end(out);
            return;
        }

        self.listen(out);
    }

    fn end(&mut self, out: &mut Vec<Command>) {
        let total = self.state.total();
        let correct = self.state.correct;
        let outcome = if correct >= self.config.win_threshold {
            Outcome::Win
        } else {
            Outcome::Lose
        };

        self.state.phase = Phase::Ended { outcome };
        self.state.recognition_enabled = false;
        self.state.status = format!("Game over. You got {correct} out of {total} letters right.");

        tracing::info!(correct, total, ?outcome, "round ended");

        out.push(Command::PlayCue {
            generation: self.state.generation,
            cue: match outcome {
                Outcome::Win => Cue::Win,
                Outcome::Lose => Cue::Lose,
            },
            gated: false,
        });
        out.push(Command::SetDisplayAwake(false));
        out.push(Command::SetAudioFeedbackMuted(false));
    }

    fn leave(&mut self, out: &mut Vec<Command>) {
        if self.state.is_listening() {
            out.push(Command::StopListening);
        }

        let generation = self.state.generation.next();
        self.state = SessionState {
            generation,
            ..SessionState::default()
        };
        tracing::info!(generation = generation.value(), "left trainer");

        out.push(Command::SetDisplayAwake(false));
        out.push(Command::SetAudioFeedbackMuted(false));
    }

    fn disable_recognition(&mut self, status: String) {
        self.state.fatal = true;
        self.state.recognition_enabled = false;
        self.state.phase = Phase::FatalError;
        self.state.status = status;
    }
}

fn elapsed_u64(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}
