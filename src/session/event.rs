use crate::export::SessionExport;
use crate::script::generator::Script;
use crate::script::themes::Theme;
use crate::speech::synthesis::Sentence;

/// Everything that can happen to a session. Control presses, capture
/// frames, recognition results, playback ticks and pointer gestures all
/// arrive through the same single-threaded event channel; their interleaving
/// is not controlled by us and must be tolerated.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// The record button. Toggles: starts recording (overwriting forward
    /// data when mid-timeline) or stops an active recording.
    RecordPressed,
    StopPressed,
    PlayPressed,
    PausePressed,
    /// First half of the destructive-delete handshake.
    DeleteRequested,
    DeleteConfirmed,
    DeleteCancelled,
    /// Finish the session. Carries the wall-clock timestamp so the reducer
    /// never reads a clock itself.
    DonePressed { at: chrono::DateTime<chrono::Utc> },

    /// One fixed-size frame of mono samples from the capture pump.
    AudioFrame(Vec<f32>),
    /// Newly finalized text plus the current replaceable interim suffix,
    /// already de-duplicated by the recognition feed. Inert outside
    /// Recording.
    Recognition { final_text: String, interim: String },
    /// Wall-clock reading (seconds, any monotonic scale) from the playback
    /// tick chain.
    PlaybackTick { now: f64 },

    ScrubStart { x: f64 },
    ScrubMove { x: f64 },
    ScrubEnd,
    ViewportResized { width: f64, height: f64 },

    ChannelSelected(Theme),
    /// Play/pause toggle for the generated script.
    ScriptPlayPressed,
    ScriptReady(Script),
    ScriptFailed,
    /// The synthesizer finished or failed the in-flight sentence.
    SynthFinished,
    SynthFailed,
}

/// Side effects the driver must execute. The reducer only describes them;
/// it never touches a device, timer or task itself.
#[derive(Debug, Clone)]
pub enum Effect {
    Redraw,
    StartCapture,
    StopCapture,
    StartPlayback { from: f64 },
    StopPlayback,
    Export(SessionExport),
    GenerateScript { theme: Theme },
    Speak(Sentence),
    CancelSpeech,
    PauseSpeech,
    ResumeSpeech,
    Log(String),
}
