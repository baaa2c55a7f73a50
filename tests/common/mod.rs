//! Shared test utilities

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use letter_coach::presentation::{Cue, Presenter, Snapshot};
use letter_coach::recognition::{
    ErrorCode, RecognitionError, RecognitionOptions, RecognitionResult, Recognizer,
};
use letter_coach::session::{SessionState, Trainer, TrainerHandle};
use letter_coach::{Error, Letter, Lexicon, SessionConfig, SessionMachine};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// What the scripted engine answers to one listen
#[derive(Debug, Clone)]
pub enum Reply {
    /// Say the expected letter
    Echo,
    /// Hear this transcript
    Say(String),
    /// Fail with this code
    Fail(ErrorCode),
    /// Hear this transcript after a delay
    After(Duration, String),
    /// Never answer
    Hang,
}

/// Recognizer answering from a script; hangs once the script runs out
#[derive(Default)]
pub struct ScriptedRecognizer {
    init_error: Option<ErrorCode>,
    replies: Mutex<VecDeque<Reply>>,
    listens: Mutex<Vec<Letter>>,
    stops: AtomicUsize,
    muted: AtomicBool,
    awake: AtomicBool,
}

impl ScriptedRecognizer {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            ..Self::default()
        }
    }

    pub fn failing_init(code: ErrorCode) -> Self {
        Self {
            init_error: Some(code),
            ..Self::default()
        }
    }

    pub fn listens(&self) -> Vec<Letter> {
        self.listens.lock().unwrap().clone()
    }

    pub fn stops(&self) -> usize {
        self.stops.load(Ordering::SeqCst)
    }

    pub fn is_muted(&self) -> bool {
        self.muted.load(Ordering::SeqCst)
    }

    pub fn is_awake(&self) -> bool {
        self.awake.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Recognizer for ScriptedRecognizer {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn initialize(&self, _options: &RecognitionOptions) -> Result<(), RecognitionError> {
        match &self.init_error {
            Some(code) => Err(RecognitionError::new(code.clone(), "scripted init failure")),
            None => Ok(()),
        }
    }

    async fn listen_for_letter(&self, expected: Letter) -> Result<RecognitionResult, RecognitionError> {
        self.listens.lock().unwrap().push(expected);
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(Reply::Echo) => Ok(RecognitionResult::new(expected.to_string())),
            Some(Reply::Say(text)) => Ok(RecognitionResult::new(text)),
            Some(Reply::Fail(code)) => Err(RecognitionError::new(code, "scripted")),
            Some(Reply::After(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(RecognitionResult::new(text))
            }
            Some(Reply::Hang) | None => std::future::pending().await,
        }
    }

    async fn stop_listening(&self) -> Result<(), RecognitionError> {
        self.stops.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn set_audio_feedback_muted(&self, muted: bool) {
        self.muted.store(muted, Ordering::SeqCst);
    }

    fn set_display_awake(&self, awake: bool) {
        self.awake.store(awake, Ordering::SeqCst);
    }
}

/// Presenter forwarding snapshots to a channel and recording cues
pub struct RecordingPresenter {
    snapshots: mpsc::UnboundedSender<Snapshot>,
    cues: Mutex<Vec<Cue>>,
    fail_cues: bool,
}

impl RecordingPresenter {
    pub fn new(fail_cues: bool) -> (Self, mpsc::UnboundedReceiver<Snapshot>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let presenter = Self {
            snapshots: tx,
            cues: Mutex::new(Vec::new()),
            fail_cues,
        };
        (presenter, rx)
    }

    pub fn cues(&self) -> Vec<Cue> {
        self.cues.lock().unwrap().clone()
    }
}

#[async_trait]
impl Presenter for RecordingPresenter {
    fn render(&self, snapshot: &Snapshot) {
        let _ = self.snapshots.send(snapshot.clone());
    }

    async fn play_cue(&self, cue: Cue) -> letter_coach::Result<()> {
        self.cues.lock().unwrap().push(cue);
        if self.fail_cues {
            return Err(Error::Presentation(format!("no audio for {cue}")));
        }
        tokio::time::sleep(cue.nominal_duration()).await;
        Ok(())
    }
}

/// A trainer running on its own task
pub struct Harness {
    pub recognizer: Arc<ScriptedRecognizer>,
    pub presenter: Arc<RecordingPresenter>,
    pub handle: TrainerHandle,
    snapshots: mpsc::UnboundedReceiver<Snapshot>,
    task: JoinHandle<SessionState>,
}

impl Harness {
    pub fn start(config: SessionConfig, recognizer: ScriptedRecognizer) -> Self {
        Self::start_with(config, recognizer, false)
    }

    pub fn start_with(config: SessionConfig, recognizer: ScriptedRecognizer, fail_cues: bool) -> Self {
        let recognizer = Arc::new(recognizer);
        let (presenter, snapshots) = RecordingPresenter::new(fail_cues);
        let presenter = Arc::new(presenter);

        let machine = SessionMachine::new(config, Arc::new(Lexicon::builtin()), Some(42));
        let (trainer, handle) = Trainer::new(
            machine,
            recognizer.clone(),
            presenter.clone(),
            RecognitionOptions::default(),
        );
        let task = tokio::spawn(trainer.run());

        Self {
            recognizer,
            presenter,
            handle,
            snapshots,
            task,
        }
    }

    /// Wait for the first rendered snapshot matching `pred`
    pub async fn wait_for(&mut self, pred: impl Fn(&Snapshot) -> bool) -> Snapshot {
        let snapshots = &mut self.snapshots;
        tokio::time::timeout(Duration::from_secs(600), async move {
            loop {
                let snapshot = snapshots.recv().await.expect("trainer stopped rendering");
                if pred(&snapshot) {
                    return snapshot;
                }
            }
        })
        .await
        .expect("timed out waiting for snapshot")
    }

    /// Snapshots rendered so far and not yet consumed
    pub fn drain(&mut self) -> Vec<Snapshot> {
        let mut pending = Vec::new();
        while let Ok(snapshot) = self.snapshots.try_recv() {
            pending.push(snapshot);
        }
        pending
    }

    /// Leave and return the final state
    pub async fn finish(self) -> SessionState {
        assert!(self.handle.leave());
        let state = self.task.await.expect("trainer task failed");
        // Let detached stop requests run
        tokio::time::sleep(Duration::from_millis(1)).await;
        state
    }
}

/// Round rules with the given length and win threshold
pub fn rules(sequence_length: usize, win_threshold: usize) -> SessionConfig {
    SessionConfig {
        sequence_length,
        win_threshold,
        ..SessionConfig::default()
    }
}
