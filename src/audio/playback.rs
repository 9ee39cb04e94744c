use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rubato::{
    Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::session::event::SessionEvent;

/// Interval of the playback tick chain that drives playhead updates.
const TICK_INTERVAL: Duration = Duration::from_millis(16);

/// Input chunk size fed through the resampler.
const RESAMPLE_CHUNK: usize = 1024;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("no output device available")]
    NoDevice,
    #[error("failed to query output config: {0}")]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error("failed to build output stream: {0}")]
    Build(#[from] cpal::BuildStreamError),
    #[error("failed to start output stream: {0}")]
    Play(#[from] cpal::PlayStreamError),
    #[error("unsupported sample format: {0}")]
    UnsupportedFormat(cpal::SampleFormat),
    #[error("failed to construct resampler: {0}")]
    Resampler(#[from] rubato::ResamplerConstructionError),
    #[error("resampling failed: {0}")]
    Resample(#[from] rubato::ResampleError),
}

/// Sinc-resample a mono buffer between sample rates. Used when the output
/// device does not run at the capture rate, so playback stays in sync with
/// the wall-clock playhead.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, PlaybackError> {
    let ratio = to_rate as f64 / from_rate as f64;
    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };
    let mut resampler = SincFixedIn::<f32>::new(ratio, 2.0, params, RESAMPLE_CHUNK, 1)?;

    let mut out = Vec::with_capacity((samples.len() as f64 * ratio) as usize + RESAMPLE_CHUNK);
    let mut chunks = samples.chunks_exact(RESAMPLE_CHUNK);
    for chunk in &mut chunks {
        let processed = resampler.process(&[chunk], None)?;
        out.extend_from_slice(&processed[0]);
    }
    let rest = chunks.remainder();
    if !rest.is_empty() {
        let processed = resampler.process_partial(Some(&[rest]), None)?;
        out.extend_from_slice(&processed[0]);
    }
    // Flush the filter tail.
    let processed = resampler.process_partial::<&[f32]>(None, None)?;
    out.extend_from_slice(&processed[0]);
    Ok(out)
}

/// One playback pass over a snapshot of the recorded buffer.
///
/// The stream reads from an immutable `Arc<Vec<f32>>` taken at start time, so
/// playback is unaffected by later edits; dropping the handle tears the
/// stream down. Position is sample-indexed and runs past the end as silence
/// until the session stops it from the tick side.
pub struct Playback {
    _stream: cpal::Stream,
}

impl Playback {
    pub fn start(samples: Arc<Vec<f32>>, sample_rate: u32, from: f64) -> Result<Self, PlaybackError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(PlaybackError::NoDevice)?;
        let config = device.default_output_config()?;

        let device_rate = config.sample_rate().0;
        let samples = if device_rate != sample_rate {
            info!(
                "resampling playback {}Hz -> {}Hz for the output device",
                sample_rate, device_rate
            );
            Arc::new(resample(&samples, sample_rate, device_rate)?)
        } else {
            samples
        };

        let channels = config.channels() as usize;
        // Position is indexed in device-rate samples.
        let position = Arc::new(AtomicUsize::new(
            (from * device_rate as f64).floor() as usize,
        ));
        let err_fn = |err| error!("playback stream error: {}", err);

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => {
                let pos = position.clone();
                device.build_output_stream(
                    &config.into(),
                    move |out: &mut [f32], _: &_| {
                        let mut p = pos.load(Ordering::Relaxed);
                        for frame in out.chunks_mut(channels) {
                            let s = samples.get(p).copied().unwrap_or(0.0);
                            for slot in frame {
                                *slot = s;
                            }
                            p += 1;
                        }
                        pos.store(p, Ordering::Relaxed);
                    },
                    err_fn,
                    None,
                )?
            }
            cpal::SampleFormat::I16 => {
                let pos = position.clone();
                device.build_output_stream(
                    &config.into(),
                    move |out: &mut [i16], _: &_| {
                        let mut p = pos.load(Ordering::Relaxed);
                        for frame in out.chunks_mut(channels) {
                            let s = samples.get(p).copied().unwrap_or(0.0);
                            let v = (s * i16::MAX as f32) as i16;
                            for slot in frame {
                                *slot = v;
                            }
                            p += 1;
                        }
                        pos.store(p, Ordering::Relaxed);
                    },
                    err_fn,
                    None,
                )?
            }
            other => return Err(PlaybackError::UnsupportedFormat(other)),
        };

        stream.play()?;
        info!("playback started from {:.2}s", from);
        Ok(Self { _stream: stream })
    }
}

/// Self-rescheduling tick chain: emits `PlaybackTick` events at a steady
/// cadence until cancelled. The session derives the playhead from the wall
/// times these carry; cancelling the token is how `StopPlayback` kills any
/// stale chain.
pub fn spawn_tick_chain(tx: mpsc::Sender<SessionEvent>, cancel: CancellationToken) {
    tokio::spawn(async move {
        let origin = Instant::now();
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return,
                _ = interval.tick() => {
                    let now = origin.elapsed().as_secs_f64();
                    if tx.send(SessionEvent::PlaybackTick { now }).await.is_err() {
                        return;
                    }
                }
            }
        }
    });
}
