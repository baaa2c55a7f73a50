//! Letter-training session
//!
//! [`SessionMachine`] holds the rules of a round as a synchronous state machine;
//! [`Trainer`] drives it against a [`Recognizer`](crate::recognition::Recognizer)
//! and a [`Presenter`](crate::presentation::Presenter).

mod driver;
mod machine;
mod state;

pub use driver::{Trainer, TrainerHandle};
pub use machine::{Command, Event, SessionMachine};
pub use state::{FollowUp, Generation, Outcome, Phase, SessionState};
