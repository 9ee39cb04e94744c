use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use ringbuf::traits::{Consumer, Producer};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::session::event::SessionEvent;

/// Samples per capture frame delivered to the session. At 48kHz this is
/// roughly 85ms of audio per waveform update.
pub const FRAME_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no input device available")]
    NoDevice,
    #[error("failed to query input config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build input stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start input stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),
}

/// Microphone capture stream feeding a lock-free ring buffer.
///
/// The stream stays open for the whole process once the first recording
/// grants device access; `active` gates whether samples are actually
/// forwarded, so stop/record cycles never renegotiate the device. Interleaved
/// multi-channel input is downmixed by taking channel 0.
pub struct MicCapture {
    _stream: cpal::Stream,
    sample_rate: u32,
    active: Arc<AtomicBool>,
}

impl MicCapture {
    pub fn new<P>(mut producer: P) -> Result<Self, CaptureError>
    where
        P: Producer<Item = f32> + Send + 'static,
    {
        let host = cpal::default_host();
        let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
        info!("input device: {}", device.name().unwrap_or_default());

        let config = device.default_input_config()?;
        let sample_rate = config.sample_rate().0;
        let channels = config.channels() as usize;
        info!("capture config: {}Hz, {} channel(s)", sample_rate, channels);

        let active = Arc::new(AtomicBool::new(false));
        let gate = active.clone();
        let err_fn = |err| error!("capture stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => device.build_input_stream(
                &config.into(),
                move |data: &[f32], _: &_| {
                    if !gate.load(Ordering::Relaxed) {
                        return;
                    }
                    for frame in data.chunks(channels) {
                        // Lossy when the buffer is full; the pump will catch up.
                        let _ = producer.try_push(frame[0]);
                    }
                },
                err_fn,
                None,
            )?,
            cpal::SampleFormat::I16 => device.build_input_stream(
                &config.into(),
                move |data: &[i16], _: &_| {
                    if !gate.load(Ordering::Relaxed) {
                        return;
                    }
                    for frame in data.chunks(channels) {
                        let _ = producer.try_push(frame[0] as f32 / i16::MAX as f32);
                    }
                },
                err_fn,
                None,
            )?,
            other => return Err(CaptureError::UnsupportedFormat(other)),
        };

        stream.play()?;

        Ok(Self {
            _stream: stream,
            sample_rate,
            active,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// The shared forwarding gate, also consulted by the frame pump.
    pub fn gate(&self) -> Arc<AtomicBool> {
        self.active.clone()
    }

    /// Start forwarding samples into the ring buffer.
    pub fn activate(&self) {
        self.active.store(true, Ordering::Relaxed);
    }

    /// Stop forwarding. The device stream itself keeps running.
    pub fn deactivate(&self) {
        self.active.store(false, Ordering::Relaxed);
    }
}

/// Blocking pump on its own thread: drains the capture ring buffer into
/// fixed-size `AudioFrame` events for the session channel.
pub struct FramePump<C>
where
    C: Consumer<Item = f32> + Send,
{
    consumer: C,
    tx: mpsc::Sender<SessionEvent>,
    active: Arc<AtomicBool>,
}

impl<C> FramePump<C>
where
    C: Consumer<Item = f32> + Send,
{
    pub fn new(consumer: C, tx: mpsc::Sender<SessionEvent>, active: Arc<AtomicBool>) -> Self {
        Self {
            consumer,
            tx,
            active,
        }
    }

    pub fn run(mut self) {
        info!("frame pump started");
        let mut frame = vec![0.0f32; FRAME_SIZE];

        loop {
            if !self.active.load(Ordering::Relaxed) {
                // Sub-frame residue from the previous take must not prepend
                // the next one.
                self.consumer.clear();
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }

            if self.consumer.occupied_len() < FRAME_SIZE {
                std::thread::sleep(std::time::Duration::from_millis(10));
                continue;
            }

            let _ = self.consumer.pop_slice(&mut frame);
            if self
                .tx
                .blocking_send(SessionEvent::AudioFrame(frame.clone()))
                .is_err()
            {
                // Session channel closed: the process is shutting down.
                return;
            }
        }
    }
}
