use serde::{Deserialize, Serialize};

/// A contiguous timestamped transcript segment.
///
/// `end_time` is absent while the block is open (actively receiving
/// recognized text). `speech_end_time` marks the last moment recognized
/// speech was actually observed, which may precede `end_time` when trailing
/// silence follows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptBlock {
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub speech_end_time: Option<f64>,
    pub text: String,
}

impl TranscriptBlock {
    pub fn new(start_time: f64) -> Self {
        Self {
            start_time,
            end_time: None,
            speech_end_time: None,
            text: String::new(),
        }
    }
}

/// Ordered list of timestamped transcript blocks plus the live interim
/// suffix.
///
/// Invariants: blocks stay in non-decreasing `start_time` order, at most one
/// block is open at a time, and truncation always precedes insertion of a
/// new block at the same or earlier start time.
#[derive(Debug, Clone, Default)]
pub struct TranscriptTimeline {
    blocks: Vec<TranscriptBlock>,
    open: bool,
    interim: String,
}

impl TranscriptTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blocks(&self) -> &[TranscriptBlock] {
        &self.blocks
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn interim(&self) -> &str {
        &self.interim
    }

    /// Start a new open block at `at_time`, overwriting forward transcript
    /// data first.
    ///
    /// `timeline_end` is the total recorded duration *before* the overwrite,
    /// used as the effective end of a still-open trailing block. Blocks that
    /// start at or after `at_time` are dropped; a block spanning `at_time`
    /// keeps a time-proportional prefix of its text and has its end capped.
    pub fn open_block(&mut self, at_time: f64, timeline_end: f64) {
        self.blocks.retain(|b| b.start_time < at_time);
        self.open = false;

        if let Some(last) = self.blocks.last_mut() {
            let block_end = last.end_time.unwrap_or(timeline_end);
            if block_end > at_time {
                let block_dur = block_end - last.start_time;
                if block_dur > 0.0 {
                    let keep_dur = at_time - last.start_time;
                    let ratio = (keep_dur / block_dur).clamp(0.0, 1.0);
                    if ratio < 1.0 && !last.text.is_empty() {
                        let total = last.text.chars().count();
                        let keep = (total as f64 * ratio).floor() as usize;
                        last.text = last.text.chars().take(keep).collect();
                    }
                }
                last.end_time = Some(at_time);
                if let Some(se) = last.speech_end_time {
                    if se > at_time {
                        last.speech_end_time = Some(at_time);
                    }
                }
            }
        }

        self.blocks.push(TranscriptBlock::new(at_time));
        self.open = true;
        self.interim.clear();
    }

    /// Append newly finalized recognition text to the open block. `now` is
    /// the playhead time the text arrived at; non-empty text advances the
    /// block's speech end mark.
    pub fn append_final(&mut self, text: &str, now: f64) {
        if !self.open {
            return;
        }
        if let Some(block) = self.blocks.last_mut() {
            block.text.push_str(text);
            if !text.is_empty() {
                block.speech_end_time = Some(now);
            }
        }
    }

    /// Replace the transient not-yet-final suffix. Never persisted into a
    /// block except through `close_block`'s finalization policy.
    pub fn set_interim(&mut self, text: &str, now: f64) {
        if !self.open {
            return;
        }
        if !text.is_empty() {
            if let Some(block) = self.blocks.last_mut() {
                block.speech_end_time = Some(now);
            }
        }
        self.interim.clear();
        self.interim.push_str(text);
    }

    /// Seal the open block at `at_time`. Stopping capture finalizes pending
    /// speech, so any interim text is folded into the block first.
    pub fn close_block(&mut self, at_time: f64) {
        if !self.open {
            return;
        }
        if let Some(block) = self.blocks.last_mut() {
            if !self.interim.is_empty() {
                block.text.push(' ');
                block.text.push_str(&self.interim);
            }
            block.end_time = Some(at_time);
            if block.speech_end_time.is_none() {
                block.speech_end_time = Some(at_time);
            }
        }
        self.open = false;
        self.interim.clear();
    }

    /// Concatenation of all finalized block text, in order.
    pub fn full_text(&self) -> String {
        let mut out = String::new();
        for block in &self.blocks {
            out.push_str(&block.text);
        }
        out
    }

    /// Whitespace-delimited word count over finalized text plus the live
    /// interim suffix.
    pub fn word_count(&self) -> usize {
        let mut text = self.full_text();
        text.push(' ');
        text.push_str(&self.interim);
        text.split_whitespace().count()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty() && self.interim.is_empty()
    }

    pub fn clear(&mut self) {
        self.blocks.clear();
        self.open = false;
        self.interim.clear();
    }
}
