use memovox::render::waveform::Viewport;
use memovox::session::clock::format_timecode;
use memovox::session::event::{Effect, SessionEvent};
use memovox::session::samples::{SampleStore, NORMALIZE_TARGET};
use memovox::session::state::{RecorderState, Session};

const VIEW: Viewport = Viewport {
    width: 480.0,
    height: 120.0,
};

fn frame(len: usize, value: f32) -> SessionEvent {
    SessionEvent::AudioFrame(vec![value; len])
}

#[test]
fn normalize_scales_peak_to_target() {
    let mut store = SampleStore::new(1000);
    store.append(&[0.1, -0.5, 0.25]);

    store.normalize();

    assert!((store.peak() - NORMALIZE_TARGET).abs() < 1e-6);
    // Relative shape is preserved.
    assert!((store.samples()[0] - 0.19).abs() < 1e-6);
}

#[test]
fn normalize_leaves_silence_alone() {
    let mut store = SampleStore::new(1000);
    store.append(&[0.00001, -0.00002]);

    store.normalize();

    // Below the silence floor: no gain applied.
    assert_eq!(store.samples(), &[0.00001, -0.00002]);
}

#[test]
fn normalize_is_idempotent_at_target() {
    let mut store = SampleStore::new(1000);
    store.append(&[0.5, -0.3]);
    store.normalize();
    let once: Vec<f32> = store.samples().to_vec();

    store.normalize();

    for (a, b) in once.iter().zip(store.samples()) {
        assert!((a - b).abs() < 1e-6);
    }
}

// Scenario: record five seconds of quiet speech, stop. The buffer is
// normalized exactly once, the block is sealed, and the clock reads the
// recorded duration.
#[test]
fn stop_recording_normalizes_and_seals() {
    let mut session = Session::new(1000, VIEW);

    let effects = session.apply(SessionEvent::RecordPressed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StartCapture)));
    assert_eq!(session.state(), RecorderState::Recording);

    for _ in 0..5 {
        session.apply(frame(1000, 0.1));
    }
    session.apply(SessionEvent::Recognition {
        final_text: "quick note ".to_string(),
        interim: String::new(),
    });

    let effects = session.apply(SessionEvent::StopPressed);
    assert!(effects.iter().any(|e| matches!(e, Effect::StopCapture)));
    assert_eq!(session.state(), RecorderState::ReviewPaused);

    assert!((session.store.peak() - NORMALIZE_TARGET).abs() < 1e-6);
    assert_eq!(session.duration(), 5.0);
    assert_eq!(format_timecode(session.current_time()), "00:05.00");

    let blocks = session.timeline.blocks();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].start_time, 0.0);
    assert_eq!(blocks[0].end_time, Some(5.0));
    assert_eq!(blocks[0].text, "quick note ");
}

#[test]
fn word_count_includes_interim_text() {
    let mut session = Session::new(1000, VIEW);
    session.apply(SessionEvent::RecordPressed);
    session.apply(frame(1000, 0.1));
    session.apply(SessionEvent::Recognition {
        final_text: "two words ".to_string(),
        interim: "and more".to_string(),
    });
    assert_eq!(session.timeline.word_count(), 4);
}

#[test]
fn timecode_formats_minutes_seconds_hundredths() {
    assert_eq!(format_timecode(0.0), "00:00.00");
    assert_eq!(format_timecode(65.25), "01:05.25");
    assert_eq!(format_timecode(-3.0), "00:00.00");
}
