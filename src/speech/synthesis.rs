/// One utterance handed to the speech synthesizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence {
    pub id: usize,
    pub text: String,
}

/// What a play/pause toggle resolved to.
#[derive(Debug, Clone, PartialEq)]
pub enum ToggleAction {
    Speak(Sentence),
    Pause,
    Resume,
    Nothing,
}

/// Strictly sequential sentence playback model: one utterance in flight at a
/// time, cancel-safe, pause/resume idempotent. The queue only tracks state
/// and highlight; actually speaking is a driver side effect.
#[derive(Debug, Clone, Default)]
pub struct SentenceQueue {
    sentences: Vec<Sentence>,
    index: usize,
    playing: bool,
    paused: bool,
    highlighted: Option<usize>,
}

impl SentenceQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the queue contents, cancelling anything in flight.
    pub fn load(&mut self, sentences: Vec<Sentence>) {
        self.sentences = sentences;
        self.index = 0;
        self.playing = false;
        self.paused = false;
        self.highlighted = None;
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Id of the currently highlighted sentence, if any.
    pub fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    pub fn toggle(&mut self) -> ToggleAction {
        if self.playing && !self.paused {
            self.paused = true;
            ToggleAction::Pause
        } else if self.playing && self.paused {
            self.paused = false;
            ToggleAction::Resume
        } else {
            match self.play() {
                Some(s) => ToggleAction::Speak(s),
                None => ToggleAction::Nothing,
            }
        }
    }

    /// Begin (or restart) playback. Returns the sentence to speak.
    pub fn play(&mut self) -> Option<Sentence> {
        if self.sentences.is_empty() {
            return None;
        }
        if self.index >= self.sentences.len() {
            // Finished last time: replay from the top.
            self.index = 0;
        }
        self.playing = true;
        self.paused = false;
        let sentence = self.sentences[self.index].clone();
        self.highlighted = Some(sentence.id);
        Some(sentence)
    }

    /// Returns true when the pause actually took effect (already-paused and
    /// not-playing queues are a no-op).
    pub fn pause(&mut self) -> bool {
        if self.playing && !self.paused {
            self.paused = true;
            true
        } else {
            false
        }
    }

    pub fn resume(&mut self) -> bool {
        if self.playing && self.paused {
            self.paused = false;
            true
        } else {
            false
        }
    }

    /// The in-flight sentence completed. Advances and returns the next
    /// sentence to speak, or `None` at the end of the queue.
    pub fn finished(&mut self) -> Option<Sentence> {
        self.highlighted = None;
        if !self.playing || self.paused {
            return None;
        }
        self.advance()
    }

    /// The in-flight sentence errored. Its highlight is cleared and the
    /// queue advances rather than halting.
    pub fn failed(&mut self) -> Option<Sentence> {
        self.highlighted = None;
        if !self.playing {
            return None;
        }
        self.advance()
    }

    fn advance(&mut self) -> Option<Sentence> {
        self.index += 1;
        if self.index < self.sentences.len() {
            let sentence = self.sentences[self.index].clone();
            self.highlighted = Some(sentence.id);
            Some(sentence)
        } else {
            self.playing = false;
            self.paused = false;
            None
        }
    }

    /// Stop everything. Idempotent; the playback position is retained so a
    /// later play resumes from the same sentence.
    pub fn cancel(&mut self) {
        self.playing = false;
        self.paused = false;
        self.highlighted = None;
    }
}
