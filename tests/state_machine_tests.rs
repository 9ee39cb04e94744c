use memovox::render::waveform::Viewport;
use memovox::session::event::{Effect, SessionEvent};
use memovox::session::state::{RecorderState, Session};

const VIEW: Viewport = Viewport {
    width: 480.0,
    height: 120.0,
};

fn frame(len: usize, value: f32) -> SessionEvent {
    SessionEvent::AudioFrame(vec![value; len])
}

fn recorded_session(seconds: usize) -> Session {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    for _ in 0..seconds {
        session.apply(frame(1000, 0.4));
    }
    session.apply(SessionEvent::Recognition {
        final_text: "memo text ".to_string(),
        interim: String::new(),
    });
    session.apply(SessionEvent::StopPressed);
    session
}

#[test]
fn illegal_transitions_are_noops() {
    let mut session = Session::new(1000, VIEW);

    // Play with nothing recorded.
    assert!(session.apply(SessionEvent::PlayPressed).is_empty());
    assert_eq!(session.state(), RecorderState::Idle);

    // Pause while idle.
    assert!(session.apply(SessionEvent::PausePressed).is_empty());

    // Stop while idle.
    assert!(session.apply(SessionEvent::StopPressed).is_empty());

    // Scrub while idle.
    assert!(session.apply(SessionEvent::ScrubStart { x: 100.0 }).is_empty());
}

#[test]
fn pause_while_recording_is_a_noop() {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    assert!(session.apply(SessionEvent::PausePressed).is_empty());
    assert_eq!(session.state(), RecorderState::Recording);
}

#[test]
fn audio_frames_outside_recording_are_dropped() {
    let mut session = recorded_session(3);
    let len = session.store.len();

    let effects = session.apply(frame(1000, 0.4));
    assert!(effects.is_empty());
    assert_eq!(session.store.len(), len);
}

#[test]
fn recognition_outside_recording_is_dropped() {
    let mut session = recorded_session(3);
    let text = session.timeline.full_text();

    session.apply(SessionEvent::Recognition {
        final_text: "stray ".to_string(),
        interim: "noise".to_string(),
    });
    assert_eq!(session.timeline.full_text(), text);
}

#[test]
fn delete_requires_confirmation() {
    let mut session = recorded_session(3);

    session.apply(SessionEvent::DeleteRequested);
    assert!(session.is_delete_pending());

    let effects = session.apply(SessionEvent::DeleteConfirmed);
    assert!(effects.iter().any(|e| matches!(e, Effect::Redraw)));
    assert_eq!(session.state(), RecorderState::Idle);
    assert!(session.store.is_empty());
    assert!(session.timeline.is_empty());
    assert_eq!(session.current_time(), 0.0);
}

#[test]
fn any_other_event_cancels_a_pending_delete() {
    let mut session = recorded_session(3);

    session.apply(SessionEvent::DeleteRequested);
    session.apply(SessionEvent::PlayPressed);
    assert!(!session.is_delete_pending());

    // A late confirmation must not destroy anything.
    session.apply(SessionEvent::DeleteConfirmed);
    assert!(!session.store.is_empty());
    assert!(!session.timeline.is_empty());
}

#[test]
fn capture_frames_do_not_cancel_a_pending_delete() {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    session.apply(frame(1000, 0.4));

    session.apply(SessionEvent::DeleteRequested);
    // Frames and recognition keep streaming in while the dialog is up.
    session.apply(frame(1000, 0.4));
    session.apply(SessionEvent::Recognition {
        final_text: "still talking ".to_string(),
        interim: String::new(),
    });
    assert!(session.is_delete_pending());

    let effects = session.apply(SessionEvent::DeleteConfirmed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopCapture)));
    assert_eq!(session.state(), RecorderState::Idle);
    assert!(session.store.is_empty());
}

#[test]
fn playback_ticks_do_not_cancel_a_pending_delete() {
    let mut session = recorded_session(5);
    session.apply(SessionEvent::PlayPressed);
    session.apply(SessionEvent::PlaybackTick { now: 10.0 });

    session.apply(SessionEvent::DeleteRequested);
    session.apply(SessionEvent::PlaybackTick { now: 10.5 });
    assert!(session.is_delete_pending());

    let effects = session.apply(SessionEvent::DeleteConfirmed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopPlayback)));
    assert_eq!(session.state(), RecorderState::Idle);
    assert!(session.timeline.is_empty());
}

#[test]
fn delete_while_recording_stops_capture_first() {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    session.apply(frame(1000, 0.4));

    session.apply(SessionEvent::DeleteRequested);
    let effects = session.apply(SessionEvent::DeleteConfirmed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopCapture)));
    assert_eq!(session.state(), RecorderState::Idle);
}

#[test]
fn record_while_playing_stops_playback_first() {
    let mut session = recorded_session(5);
    session.apply(SessionEvent::PlayPressed);
    assert_eq!(session.state(), RecorderState::ReviewPlaying);

    let effects = session.apply(SessionEvent::RecordPressed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopPlayback)));
    assert!(effects.iter().any(|e| matches!(e, Effect::StartCapture)));
    assert_eq!(session.state(), RecorderState::Recording);
}

// Scenario: finish a memo. The open recording is sealed, the export payload
// is emitted with the session's blocks, and script generation fires exactly
// once.
#[test]
fn done_seals_exports_and_generates_once() {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    session.apply(frame(2000, 0.4));
    session.apply(SessionEvent::Recognition {
        final_text: "wrap up the project ".to_string(),
        interim: String::new(),
    });

    let effects = session.apply(SessionEvent::DonePressed {
        at: chrono::Utc::now(),
    });
    assert_eq!(session.state(), RecorderState::ReviewPaused);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopCapture)));

    let export = effects
        .iter()
        .find_map(|e| match e {
            Effect::Export(export) => Some(export),
            _ => None,
        })
        .expect("done must export");
    assert_eq!(export.blocks.len(), 1);
    assert_eq!(export.full_text, "wrap up the project");
    assert_eq!(session.exports.len(), 1);

    let generates = effects
        .iter()
        .filter(|e| matches!(e, Effect::GenerateScript { .. }))
        .count();
    assert_eq!(generates, 1);

    // A second Done while generation is in flight exports again but does
    // not re-trigger generation.
    let effects = session.apply(SessionEvent::DonePressed {
        at: chrono::Utc::now(),
    });
    assert!(effects.iter().any(|e| matches!(e, Effect::Export(_))));
    assert!(!effects.iter().any(|e| matches!(e, Effect::GenerateScript { .. })));
    assert_eq!(session.exports.len(), 2);
}

#[test]
fn channel_change_cancels_speech_and_regenerates() {
    use memovox::script::themes::Theme;

    let mut session = recorded_session(2);
    session.apply(SessionEvent::DonePressed {
        at: chrono::Utc::now(),
    });

    let effects = session.apply(SessionEvent::ChannelSelected(Theme::Focus));
    assert!(effects.iter().any(|e| matches!(e, Effect::CancelSpeech)));
    // Generation for the old theme is still in flight: single-flight holds.
    assert!(!effects.iter().any(|e| matches!(e, Effect::GenerateScript { .. })));

    // Selecting the current channel again is a no-op.
    let effects = session.apply(SessionEvent::ChannelSelected(Theme::Focus));
    assert!(effects.is_empty());
}

#[test]
fn stale_script_completion_is_discarded_and_regenerated() {
    use memovox::script::generator::parse_script;
    use memovox::script::themes::Theme;

    let mut session = recorded_session(2);
    session.apply(SessionEvent::DonePressed {
        at: chrono::Utc::now(),
    });
    session.apply(SessionEvent::ChannelSelected(Theme::Focus));

    // The generation started by Done completes for the old channel.
    let stale = parse_script(Theme::Productivity, Theme::Productivity.template());
    let effects = session.apply(SessionEvent::ScriptReady(stale));
    assert!(
        effects
            .iter()
            .any(|e| matches!(e, Effect::GenerateScript { theme: Theme::Focus })),
        "stale completion must trigger regeneration for the selected channel"
    );
    assert!(session.script().is_none(), "stale script must not install");
    assert!(session.is_script_loading());

    let fresh = parse_script(Theme::Focus, Theme::Focus.template());
    session.apply(SessionEvent::ScriptReady(fresh));
    assert_eq!(session.script().map(|s| s.theme), Some(Theme::Focus));
    assert!(!session.is_script_loading());
}

#[test]
fn empty_session_shows_no_cursor_marker() {
    let session = Session::new(1000, VIEW);
    assert_eq!(session.transcript_display("|"), "");

    // Deleting everything returns to the blank slate.
    let mut session = recorded_session(2);
    assert!(!session.transcript_display("|").is_empty());
    session.apply(SessionEvent::DeleteRequested);
    session.apply(SessionEvent::DeleteConfirmed);
    assert_eq!(session.transcript_display("|"), "");
}

#[test]
fn script_failure_surfaces_a_message_and_clears_loading() {
    let mut session = recorded_session(2);
    session.apply(SessionEvent::DonePressed {
        at: chrono::Utc::now(),
    });
    assert!(session.is_script_loading());

    let effects = session.apply(SessionEvent::ScriptFailed);
    assert!(!session.is_script_loading());
    assert!(session.script_failed());
    assert!(effects.iter().any(|e| matches!(e, Effect::Log(_))));

    // Recording state is untouched by the failure.
    assert_eq!(session.state(), RecorderState::ReviewPaused);
    assert!(!session.timeline.is_empty());
}
