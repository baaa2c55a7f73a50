//! Letter Coach - spoken-letter recognition trainer
//!
//! This library provides the core of the trainer:
//! - Phonetic lexicon, phrase scoring and letter resolution
//! - A round state machine that listens, scores and gives feedback
//! - Ports for the speech engine and the screen/audio layer
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────┐
//! │                    Interfaces                        │
//! │     Speech engine (Recognizer)  │  Screen (Presenter)│
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │                  Trainer (driver)                    │
//! │   event channel  │  generation-tagged tasks          │
//! └────────────────────┬────────────────────────────────┘
//!                      │
//! ┌────────────────────▼────────────────────────────────┐
//! │        SessionMachine  →  Lexicon (score/resolve)    │
//! └─────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod letter;
pub mod phonetic;
pub mod presentation;
pub mod recognition;
pub mod session;

pub use config::{Config, SessionConfig};
pub use error::{Error, Result};
pub use letter::Letter;
pub use phonetic::{Lexicon, Score, resolve, score};
pub use presentation::{Cue, Presenter, Snapshot};
pub use recognition::{RecognitionError, RecognitionOptions, RecognitionResult, Recognizer};
pub use session::{SessionMachine, Trainer, TrainerHandle};
