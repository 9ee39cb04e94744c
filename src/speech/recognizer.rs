use thiserror::Error;

/// One item of a recognizer result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionResult {
    pub transcript: String,
    pub is_final: bool,
}

/// An incremental result set pushed by a continuous-mode recognizer. The
/// result list grows across updates; `result_index` is the first entry that
/// changed since the previous update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionUpdate {
    pub result_index: usize,
    pub results: Vec<RecognitionResult>,
}

/// What an update boiled down to: text finalized since the last update, and
/// the always-replaceable interim suffix.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecognitionDelta {
    pub final_text: String,
    pub interim: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecognizerError {
    /// The engine heard nothing. Not a failure; ignored entirely.
    #[error("no speech detected")]
    NoSpeech,
    #[error("speech recognition unavailable")]
    Unavailable,
    #[error("recognizer error: {0}")]
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecognizerEvent {
    Update(RecognitionUpdate),
    /// The engine stopped on its own.
    Ended,
    Error(RecognizerError),
}

/// Derives only newly finalized text from accumulating result sets, so a
/// result that was final in a previous update is never appended twice.
#[derive(Debug, Clone, Default)]
pub struct RecognitionFeed {
    consumed_finals: usize,
}

impl RecognitionFeed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ingest(&mut self, update: &RecognitionUpdate) -> RecognitionDelta {
        let mut delta = RecognitionDelta::default();
        let start = update.result_index.min(update.results.len());
        for (i, result) in update.results.iter().enumerate().skip(start) {
            if result.is_final {
                if i >= self.consumed_finals {
                    delta.final_text.push_str(&result.transcript);
                    self.consumed_finals = i + 1;
                }
            } else {
                delta.interim.push_str(&result.transcript);
            }
        }
        delta
    }

    /// The engine restarted its result numbering (fresh session).
    pub fn reset(&mut self) {
        self.consumed_finals = 0;
    }
}

/// What the driver should do with a recognizer event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedAction {
    Emit(RecognitionDelta),
    /// Restart the engine immediately to keep the permission grant warm.
    /// Restart failures are swallowed.
    Restart,
    Ignore,
}

/// Recognizer error policy: no-speech is not an error, unexpected
/// termination triggers a restart, everything else is inert. State
/// filtering (discarding output while not recording) happens in the session
/// reducer, not here.
pub fn handle_recognizer_event(feed: &mut RecognitionFeed, event: RecognizerEvent) -> FeedAction {
    match event {
        RecognizerEvent::Update(update) => FeedAction::Emit(feed.ingest(&update)),
        RecognizerEvent::Ended => {
            feed.reset();
            FeedAction::Restart
        }
        RecognizerEvent::Error(RecognizerError::NoSpeech) => FeedAction::Ignore,
        RecognizerEvent::Error(err) => {
            tracing::debug!("recognizer error ignored: {}", err);
            FeedAction::Ignore
        }
    }
}
