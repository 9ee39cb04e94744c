use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use memovox::audio::capture::{FramePump, FRAME_SIZE};
use memovox::audio::playback::resample;
use memovox::session::event::SessionEvent;
use ringbuf::traits::{Producer, Split};
use ringbuf::HeapRb;

#[test]
fn pump_discards_residue_left_from_a_previous_take() {
    let rb = HeapRb::<f32>::new(FRAME_SIZE * 4);
    let (mut producer, consumer) = rb.split();
    let (tx, mut rx) = tokio::sync::mpsc::channel(4);
    let active = Arc::new(AtomicBool::new(false));

    let gate = active.clone();
    std::thread::spawn(move || FramePump::new(consumer, tx, gate).run());

    // Sub-frame residue sitting in the buffer while capture is stopped.
    producer.push_slice(&vec![1.0f32; 100]);
    std::thread::sleep(Duration::from_millis(200));

    active.store(true, Ordering::Relaxed);
    std::thread::sleep(Duration::from_millis(50));
    producer.push_slice(&vec![0.5f32; FRAME_SIZE]);

    let event = rx.blocking_recv().expect("one frame from the pump");
    let samples = match event {
        SessionEvent::AudioFrame(samples) => samples,
        other => panic!("unexpected event {:?}", other),
    };
    assert_eq!(samples.len(), FRAME_SIZE);
    assert!(
        samples.iter().all(|&s| (s - 0.5).abs() < 1e-6),
        "stale audio leaked into the new recording"
    );
}

#[test]
fn resample_preserves_duration_across_rates() {
    // One second of a 440Hz tone at 48kHz down to 44.1kHz.
    let from_rate = 48_000u32;
    let to_rate = 44_100u32;
    let input: Vec<f32> = (0..from_rate)
        .map(|i| (i as f32 * 440.0 * 2.0 * std::f32::consts::PI / from_rate as f32).sin() * 0.5)
        .collect();

    let output = resample(&input, from_rate, to_rate).expect("resample");

    let expected = input.len() as f64 * to_rate as f64 / from_rate as f64;
    assert!(
        (output.len() as f64 - expected).abs() < 2048.0,
        "expected ~{} samples, got {}",
        expected,
        output.len()
    );
    // Amplitude stays in range; no blowup from the filter.
    assert!(output.iter().all(|s| s.abs() <= 1.0));
}

#[test]
fn resample_upsamples_too() {
    let input = vec![0.25f32; 8000];
    let output = resample(&input, 16_000, 48_000).expect("resample");
    let expected = input.len() as f64 * 3.0;
    assert!((output.len() as f64 - expected).abs() < 4096.0);
}
