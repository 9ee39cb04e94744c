/// Peak target after normalization. Loudest sample lands here regardless of
/// microphone gain, leaving headroom below full scale.
pub const NORMALIZE_TARGET: f32 = 0.95;

/// Buffers whose peak is below this are treated as silence and left alone,
/// so normalization never amplifies the noise floor.
pub const SILENCE_EPSILON: f32 = 1e-4;

/// Mono sample buffer for one recording session.
///
/// Append-only while capturing; truncated when a new recording overwrites
/// forward data; cleared on delete. Duration is always derived from the
/// sample count, never stored.
#[derive(Debug, Clone)]
pub struct SampleStore {
    samples: Vec<f32>,
    sample_rate: u32,
}

impl SampleStore {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            samples: Vec::new(),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Seconds of audio currently held.
    pub fn duration(&self) -> f64 {
        self.samples.len() as f64 / self.sample_rate as f64
    }

    /// Push one capture frame. O(frame length).
    pub fn append(&mut self, frame: &[f32]) {
        self.samples.extend_from_slice(frame);
    }

    /// Drop all samples at or after `at_time`. Recording always replaces
    /// forward data rather than inserting.
    pub fn truncate_at(&mut self, at_time: f64) {
        let cut = (at_time * self.sample_rate as f64).floor() as usize;
        if cut < self.samples.len() {
            self.samples.truncate(cut);
        }
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |acc, s| acc.max(s.abs()))
    }

    /// Rescale so the loudest sample reaches `NORMALIZE_TARGET`. Silent
    /// buffers are untouched. Run once when capture stops, before playback.
    pub fn normalize(&mut self) {
        let peak = self.peak();
        if peak > SILENCE_EPSILON {
            let gain = NORMALIZE_TARGET / peak;
            for s in &mut self.samples {
                *s *= gain;
            }
        }
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Mean absolute amplitude over a sample index range, clamped to the
    /// buffer. Returns 0.0 for empty ranges.
    pub fn mean_abs(&self, start: usize, end: usize) -> f32 {
        let end = end.min(self.samples.len());
        if start >= end {
            return 0.0;
        }
        let sum: f32 = self.samples[start..end].iter().map(|s| s.abs()).sum();
        sum / (end - start) as f32
    }
}
