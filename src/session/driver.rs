//! Async driver connecting the state machine to the ports

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::presentation::Presenter;
use crate::recognition::{RecognitionOptions, Recognizer};
use crate::session::machine::{Command, Event, SessionMachine};
use crate::session::state::SessionState;

/// Runs one trainer session
///
/// Owns the [`SessionMachine`] and feeds it one event at a time. Port calls run as
/// tasks that report back through the event channel; when the generation changes
/// every in-flight task is aborted.
pub struct Trainer {
    machine: SessionMachine,
    recognizer: Arc<dyn Recognizer>,
    presenter: Arc<dyn Presenter>,
    options: RecognitionOptions,
    tx: mpsc::UnboundedSender<Event>,
    rx: mpsc::UnboundedReceiver<Event>,
    tasks: JoinSet<()>,
}

/// Sends user actions to a running [`Trainer`]
#[derive(Clone)]
pub struct TrainerHandle {
    tx: mpsc::UnboundedSender<Event>,
}

impl TrainerHandle {
    /// Start a new round; returns false if the trainer has stopped
    #[must_use = "false means the trainer has stopped"]
    pub fn restart(&self) -> bool {
        self.tx.send(Event::Start).is_ok()
    }

    /// Move to the next letter while recognition is disabled
    #[must_use = "false means the trainer has stopped"]
    pub fn skip(&self) -> bool {
        self.tx.send(Event::Skip).is_ok()
    }

    /// Leave the trainer
    #[must_use = "false means the trainer has stopped"]
    pub fn leave(&self) -> bool {
        self.tx.send(Event::Leave).is_ok()
    }
}

impl Trainer {
    /// Create a trainer and a handle for controlling it
    #[must_use]
    pub fn new(
        machine: SessionMachine,
        recognizer: Arc<dyn Recognizer>,
        presenter: Arc<dyn Presenter>,
        options: RecognitionOptions,
    ) -> (Self, TrainerHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = TrainerHandle { tx: tx.clone() };

        let trainer = Self {
            machine,
            recognizer,
            presenter,
            options,
            tx,
            rx,
            tasks: JoinSet::new(),
        };
        (trainer, handle)
    }

    /// Start a round and process events until the user leaves
    ///
    /// Returns the final session state.
    pub async fn run(mut self) -> SessionState {
        tracing::info!(recognizer = self.recognizer.name(), "trainer started");
        self.dispatch(Event::Start);

        loop {
            tokio::select! {
                Some(event) = self.rx.recv() => {
                    let leaving = matches!(event, Event::Leave);
                    self.dispatch(event);
                    if leaving {
                        break;
                    }
                }
                Some(joined) = self.tasks.join_next() => {
                    if let Err(e) = joined
                        && e.is_panic()
                    {
                        tracing::error!(error = %e, "trainer task panicked");
                    }
                }
                else => break,
            }
        }

        self.tasks.abort_all();
        tracing::info!("trainer stopped");
        self.machine.into_state()
    }

    fn dispatch(&mut self, event: Event) {
        let before = self.machine.generation();
        let commands = self.machine.handle(event);

        if self.machine.generation() != before && !self.tasks.is_empty() {
            tracing::debug!(tasks = self.tasks.len(), "aborting superseded tasks");
            self.tasks.abort_all();
        }

        for command in commands {
            self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) {
        match command {
            Command::Initialize { generation } => {
                let recognizer = Arc::clone(&self.recognizer);
                let options = self.options.clone();
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    let outcome = recognizer.initialize(&options).await;
                    let _ = tx.send(Event::Initialized {
                        generation,
                        outcome,
                    });
                });
            }
            Command::Listen {
                generation,
                expected,
            } => {
                let recognizer = Arc::clone(&self.recognizer);
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    let outcome = recognizer.listen_for_letter(expected).await;
                    let _ = tx.send(Event::Recognized {
                        generation,
                        outcome,
                    });
                });
            }
            Command::StopListening => {
                // Detached so a generation change cannot abort it
                let recognizer = Arc::clone(&self.recognizer);
                tokio::spawn(async move {
                    if let Err(e) = recognizer.stop_listening().await {
                        tracing::warn!(error = %e, "stop listening failed");
                    }
                });
            }
            Command::PlayCue {
                generation,
                cue,
                gated,
            } => {
                let presenter = Arc::clone(&self.presenter);
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    if let Err(e) = presenter.play_cue(cue).await {
                        tracing::warn!(%cue, error = %e, "cue failed");
                    }
                    if gated {
                        let _ = tx.send(Event::CueFinished { generation });
                    }
                });
            }
            Command::StartSettleTimer { generation, after } => {
                let tx = self.tx.clone();
                self.tasks.spawn(async move {
                    tokio::time::sleep(after).await;
                    let _ = tx.send(Event::SettleElapsed { generation });
                });
            }
            Command::SetAudioFeedbackMuted(muted) => self.recognizer.set_audio_feedback_muted(muted),
            Command::SetDisplayAwake(awake) => self.recognizer.set_display_awake(awake),
            Command::Render(snapshot) => self.presenter.render(&snapshot),
        }
    }
}
