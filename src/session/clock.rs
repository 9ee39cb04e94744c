/// Playhead times within this distance of the end count as "at the end":
/// play auto-rewinds to zero, and a playback tick past it snaps to the
/// exact duration.
pub const END_EPSILON: f64 = 0.1;

/// The single authoritative time cursor shared by capture, playback,
/// scrubbing and rendering.
///
/// During capture it advances by accumulated sample count. During playback
/// it derives from a wall-clock anchor established on the first tick after
/// `start_playback`, so the reducer never reads a clock itself.
#[derive(Debug, Clone, Default)]
pub struct Playhead {
    current: f64,
    anchor: Option<f64>,
}

impl Playhead {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> f64 {
        self.current
    }

    pub fn is_playing(&self) -> bool {
        self.anchor.is_some()
    }

    /// Advance by one capture frame.
    pub fn advance_capture(&mut self, frame_len: usize, sample_rate: u32) {
        self.current += frame_len as f64 / sample_rate as f64;
    }

    /// Begin playback from `from`. The anchor is deferred to the first tick
    /// so wall time enters only through events.
    pub fn start_playback(&mut self, from: f64) {
        self.current = from;
        self.anchor = Some(f64::NAN); // resolved on first tick
    }

    /// Recompute the playhead from a wall-clock reading (seconds on any
    /// monotonic scale). Returns the new time.
    pub fn playback_tick(&mut self, now: f64) -> f64 {
        match self.anchor {
            Some(a) if a.is_finite() => {
                self.current = now - a;
            }
            Some(_) => {
                // First tick: anchor so that `now - anchor == current`.
                self.anchor = Some(now - self.current);
            }
            None => {}
        }
        self.current
    }

    pub fn stop_playback(&mut self) {
        self.anchor = None;
    }

    /// Direct assignment from scrubbing, clamped to the valid range.
    pub fn set(&mut self, t: f64, duration: f64) {
        self.current = t.clamp(0.0, duration.max(0.0));
    }

    pub fn reset(&mut self) {
        self.current = 0.0;
        self.anchor = None;
    }
}

/// `MM:SS.hh` timecode used by the time display.
pub fn format_timecode(t: f64) -> String {
    let t = t.max(0.0);
    let m = (t / 60.0).floor() as u64;
    let s = (t % 60.0).floor() as u64;
    let hundredths = ((t % 1.0) * 100.0).floor() as u64;
    format!("{:02}:{:02}.{:02}", m, s, hundredths)
}
