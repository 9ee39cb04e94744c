use chrono::{DateTime, Utc};
use tracing::info;

use super::clock::{Playhead, END_EPSILON};
use super::event::{Effect, SessionEvent};
use super::samples::SampleStore;
use super::scrub::ScrubController;
use super::timeline::TranscriptTimeline;
use crate::export::{EphemeralStore, SessionExport};
use crate::render::cursor;
use crate::render::waveform::Viewport;
use crate::script::generator::Script;
use crate::script::themes::Theme;
use crate::speech::synthesis::{SentenceQueue, ToggleAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderState {
    Idle,
    Recording,
    ReviewPaused,
    ReviewPlaying,
}

/// The user-facing operations whose legality depends on the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Record,
    Stop,
    Play,
    Pause,
    Scrub,
    Delete,
    Done,
}

impl RecorderState {
    pub fn is_review(&self) -> bool {
        matches!(self, RecorderState::ReviewPaused | RecorderState::ReviewPlaying)
    }

    /// Legal-transition check. Illegal operations are no-ops, never errors.
    pub fn allows(&self, t: Transition) -> bool {
        match t {
            // Record always has a meaning: start, stop (toggle), or
            // overwrite from the playhead.
            Transition::Record => true,
            Transition::Stop => matches!(self, RecorderState::Recording | RecorderState::ReviewPlaying),
            Transition::Play => matches!(self, RecorderState::ReviewPaused),
            Transition::Pause => matches!(self, RecorderState::ReviewPlaying),
            Transition::Scrub => self.is_review(),
            Transition::Delete | Transition::Done => true,
        }
    }
}

/// The whole recorder as one owned context object.
///
/// All mutation flows through `apply`: a pure state transition from one
/// event to a list of side effects for the driver to execute. The sample
/// store, transcript timeline and playhead each have exactly one active
/// writer at a time, gated by the state machine; rendering only reads.
#[derive(Debug)]
pub struct Session {
    state: RecorderState,
    pub store: SampleStore,
    pub timeline: TranscriptTimeline,
    pub playhead: Playhead,
    pub scrub: ScrubController,
    pub queue: SentenceQueue,
    pub exports: EphemeralStore,
    viewport: Viewport,
    pending_delete: bool,
    theme: Theme,
    script: Option<Script>,
    script_loading: bool,
    script_error: bool,
}

impl Session {
    pub fn new(sample_rate: u32, viewport: Viewport) -> Self {
        Self {
            state: RecorderState::Idle,
            store: SampleStore::new(sample_rate),
            timeline: TranscriptTimeline::new(),
            playhead: Playhead::new(),
            scrub: ScrubController::new(),
            queue: SentenceQueue::new(),
            exports: EphemeralStore::new(),
            viewport,
            pending_delete: false,
            theme: Theme::Productivity,
            script: None,
            script_loading: false,
            script_error: false,
        }
    }

    pub fn state(&self) -> RecorderState {
        self.state
    }

    pub fn duration(&self) -> f64 {
        self.store.duration()
    }

    pub fn current_time(&self) -> f64 {
        self.playhead.current()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn script(&self) -> Option<&Script> {
        self.script.as_ref()
    }

    pub fn is_script_loading(&self) -> bool {
        self.script_loading
    }

    pub fn script_failed(&self) -> bool {
        self.script_error
    }

    pub fn is_delete_pending(&self) -> bool {
        self.pending_delete
    }

    /// Transcript text for display. While recording this is the raw
    /// finalized text plus the interim suffix; in review, the playhead is
    /// mapped to a word-boundary cursor and spliced in as `marker`.
    pub fn transcript_display(&self, marker: &str) -> String {
        if self.state == RecorderState::Recording {
            let mut text = self.timeline.full_text();
            text.push_str(self.timeline.interim());
            return text;
        }
        if self.timeline.blocks().is_empty() {
            return String::new();
        }
        let pos = cursor::cursor_position(&self.timeline, self.duration(), self.playhead.current());
        cursor::transcript_with_cursor(&self.timeline, pos, marker)
    }

    /// The single entry point for all mutation.
    pub fn apply(&mut self, event: SessionEvent) -> Vec<Effect> {
        // A deliberate control press cancels a pending delete. Data-plane
        // events (frames, ticks, recognition, drag moves) arrive on their
        // own cadence and leave the handshake alone.
        if self.pending_delete && cancels_pending_delete(&event) {
            self.pending_delete = false;
        }

        match event {
            SessionEvent::RecordPressed => match self.state {
                RecorderState::Recording => self.stop_recording(),
                _ => self.start_recording(),
            },
            SessionEvent::StopPressed => match self.state {
                RecorderState::Recording => self.stop_recording(),
                RecorderState::ReviewPlaying => self.pause_playback(),
                _ => Vec::new(),
            },
            SessionEvent::PlayPressed => self.start_playback(),
            SessionEvent::PausePressed => {
                if self.state == RecorderState::ReviewPlaying {
                    self.pause_playback()
                } else {
                    Vec::new()
                }
            }
            SessionEvent::DeleteRequested => {
                self.pending_delete = true;
                Vec::new()
            }
            SessionEvent::DeleteCancelled => Vec::new(),
            SessionEvent::DeleteConfirmed => {
                if self.pending_delete {
                    self.delete()
                } else {
                    // Confirmation without a request is inert.
                    Vec::new()
                }
            }
            SessionEvent::DonePressed { at } => self.done(at),

            SessionEvent::AudioFrame(frame) => self.audio_frame(&frame),
            SessionEvent::Recognition { final_text, interim } => {
                self.recognition(&final_text, &interim)
            }
            SessionEvent::PlaybackTick { now } => self.playback_tick(now),

            SessionEvent::ScrubStart { x } => self.scrub_start(x),
            SessionEvent::ScrubMove { x } => self.scrub_move(x),
            SessionEvent::ScrubEnd => {
                self.scrub.pointer_up();
                Vec::new()
            }
            SessionEvent::ViewportResized { width, height } => {
                self.viewport = Viewport { width, height };
                vec![Effect::Redraw]
            }

            SessionEvent::ChannelSelected(theme) => self.select_channel(theme),
            SessionEvent::ScriptPlayPressed => self.toggle_script(),
            SessionEvent::ScriptReady(script) => self.script_ready(script),
            SessionEvent::ScriptFailed => {
                self.script_loading = false;
                self.script_error = true;
                vec![Effect::Log(
                    "Script generation failed. Please try again.".to_string(),
                )]
            }
            SessionEvent::SynthFinished => match self.queue.finished() {
                Some(next) => vec![Effect::Speak(next)],
                None => Vec::new(),
            },
            SessionEvent::SynthFailed => match self.queue.failed() {
                Some(next) => vec![Effect::Speak(next)],
                None => Vec::new(),
            },
        }
    }

    fn start_recording(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        if self.state == RecorderState::ReviewPlaying {
            self.playhead.stop_playback();
            effects.push(Effect::StopPlayback);
        }

        let at = self.playhead.current();
        let prev_duration = self.store.duration();
        if at < prev_duration {
            // Overwrite: samples are truncated before the timeline opens a
            // block at the same point, so text never overlaps in
            // time-ownership.
            self.store.truncate_at(at);
        }
        self.timeline.open_block(at, prev_duration);

        self.state = RecorderState::Recording;
        info!("recording from {:.2}s", at);
        effects.push(Effect::StartCapture);
        effects.push(Effect::Redraw);
        effects
    }

    fn stop_recording(&mut self) -> Vec<Effect> {
        let at = self.playhead.current();
        self.timeline.close_block(at);
        self.store.normalize();
        self.state = RecorderState::ReviewPaused;
        info!("recording stopped at {:.2}s", at);
        vec![Effect::StopCapture, Effect::Redraw]
    }

    fn start_playback(&mut self) -> Vec<Effect> {
        if self.state != RecorderState::ReviewPaused || self.store.is_empty() {
            return Vec::new();
        }
        let duration = self.store.duration();
        let mut from = self.playhead.current();
        if from >= duration - END_EPSILON {
            // At (or nearly at) the end: rewind and play from the top.
            from = 0.0;
        }
        self.playhead.start_playback(from);
        self.state = RecorderState::ReviewPlaying;
        vec![Effect::StartPlayback { from }, Effect::Redraw]
    }

    fn pause_playback(&mut self) -> Vec<Effect> {
        self.playhead.stop_playback();
        self.state = RecorderState::ReviewPaused;
        vec![Effect::StopPlayback, Effect::Redraw]
    }

    fn playback_tick(&mut self, now: f64) -> Vec<Effect> {
        if self.state != RecorderState::ReviewPlaying || self.scrub.is_dragging() {
            // Stale tick from a cancelled chain.
            return Vec::new();
        }
        let duration = self.store.duration();
        let t = self.playhead.playback_tick(now);
        if t >= duration {
            self.playhead.set(duration, duration);
            self.playhead.stop_playback();
            self.state = RecorderState::ReviewPaused;
            vec![Effect::StopPlayback, Effect::Redraw]
        } else {
            vec![Effect::Redraw]
        }
    }

    fn audio_frame(&mut self, frame: &[f32]) -> Vec<Effect> {
        if self.state != RecorderState::Recording {
            return Vec::new();
        }
        self.store.append(frame);
        self.playhead.advance_capture(frame.len(), self.store.sample_rate());
        vec![Effect::Redraw]
    }

    fn recognition(&mut self, final_text: &str, interim: &str) -> Vec<Effect> {
        // Recognition keeps running in the background to hold the
        // permission grant; its output is inert outside Recording.
        if self.state != RecorderState::Recording {
            return Vec::new();
        }
        let now = self.playhead.current();
        self.timeline.append_final(final_text, now);
        self.timeline.set_interim(interim, now);
        vec![Effect::Redraw]
    }

    fn scrub_start(&mut self, x: f64) -> Vec<Effect> {
        if !self.state.allows(Transition::Scrub) {
            return Vec::new();
        }
        let mut effects = Vec::new();
        if self.state == RecorderState::ReviewPlaying {
            self.playhead.stop_playback();
            self.state = RecorderState::ReviewPaused;
            effects.push(Effect::StopPlayback);
        }
        let duration = self.store.duration();
        let t = self.scrub.pointer_down(
            x,
            self.viewport.width / 2.0,
            self.playhead.current(),
            &self.timeline,
            duration,
        );
        self.playhead.set(t, duration);
        effects.push(Effect::Redraw);
        effects
    }

    fn scrub_move(&mut self, x: f64) -> Vec<Effect> {
        let duration = self.store.duration();
        match self.scrub.pointer_move(x, &self.timeline, duration) {
            Some(t) => {
                self.playhead.set(t, duration);
                vec![Effect::Redraw]
            }
            None => Vec::new(),
        }
    }

    fn delete(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            RecorderState::Recording => effects.push(Effect::StopCapture),
            RecorderState::ReviewPlaying => effects.push(Effect::StopPlayback),
            _ => {}
        }
        self.store.clear();
        self.timeline.clear();
        self.playhead.reset();
        self.pending_delete = false;
        self.state = RecorderState::Idle;
        info!("session deleted");
        effects.push(Effect::Redraw);
        effects
    }

    fn done(&mut self, at: DateTime<Utc>) -> Vec<Effect> {
        let mut effects = Vec::new();
        match self.state {
            RecorderState::Recording => effects.extend(self.stop_recording()),
            RecorderState::ReviewPlaying => effects.extend(self.pause_playback()),
            _ => {}
        }

        let export = SessionExport::from_timeline(&self.timeline, self.playhead.current(), at);
        self.exports.store(export.clone());
        effects.push(Effect::Export(export));

        // First generation is forced for the current channel, but still
        // single-flight.
        if !self.script_loading {
            self.script_loading = true;
            self.script_error = false;
            effects.push(Effect::GenerateScript { theme: self.theme });
        }
        effects
    }

    fn select_channel(&mut self, theme: Theme) -> Vec<Effect> {
        if theme == self.theme {
            return Vec::new();
        }
        self.theme = theme;
        self.queue.cancel();
        let mut effects = vec![Effect::CancelSpeech];
        if !self.script_loading {
            self.script_loading = true;
            self.script_error = false;
            effects.push(Effect::GenerateScript { theme });
        }
        effects
    }

    fn script_ready(&mut self, script: Script) -> Vec<Effect> {
        if script.theme != self.theme {
            // Completion for a channel that is no longer selected: discard
            // it and regenerate, keeping the single-flight guard held.
            return vec![Effect::GenerateScript { theme: self.theme }];
        }
        self.script_loading = false;
        self.queue.load(script.sentences());
        self.script = Some(script);
        Vec::new()
    }

    fn toggle_script(&mut self) -> Vec<Effect> {
        if self.script_loading {
            return Vec::new();
        }
        match self.queue.toggle() {
            ToggleAction::Speak(sentence) => vec![Effect::Speak(sentence)],
            ToggleAction::Pause => vec![Effect::PauseSpeech],
            ToggleAction::Resume => vec![Effect::ResumeSpeech],
            ToggleAction::Nothing => Vec::new(),
        }
    }
}

/// Control presses that count as "doing something else" for the delete
/// handshake.
fn cancels_pending_delete(event: &SessionEvent) -> bool {
    matches!(
        event,
        SessionEvent::RecordPressed
            | SessionEvent::StopPressed
            | SessionEvent::PlayPressed
            | SessionEvent::PausePressed
            | SessionEvent::DeleteCancelled
            | SessionEvent::DonePressed { .. }
            | SessionEvent::ScrubStart { .. }
            | SessionEvent::ChannelSelected(_)
            | SessionEvent::ScriptPlayPressed
    )
}
