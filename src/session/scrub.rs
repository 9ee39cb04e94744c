use crate::render::waveform::PX_PER_SECOND;
use crate::session::timeline::TranscriptTimeline;

/// Maximum distance (seconds) at which scrubbing gravitates to a snap point.
pub const SNAP_THRESHOLD: f64 = 0.2;

/// Maps pointer gestures to playhead time, snapping to block boundaries.
///
/// A drag session is anchored at the snapped pointer-down time; moves
/// recompute time from total horizontal displacement since the anchor, not
/// incremental deltas, so a long drag cannot drift.
#[derive(Debug, Clone, Default)]
pub struct ScrubController {
    drag: Option<Drag>,
}

#[derive(Debug, Clone, Copy)]
struct Drag {
    start_x: f64,
    start_time: f64,
}

/// Buffer edges plus every closed block boundary, ascending and deduplicated.
pub fn snap_points(timeline: &TranscriptTimeline, duration: f64) -> Vec<f64> {
    let mut points = vec![0.0, duration];
    for block in timeline.blocks() {
        points.push(block.start_time);
        if let Some(end) = block.end_time {
            points.push(end);
        }
    }
    points.sort_by(|a, b| a.total_cmp(b));
    points.dedup();
    points
}

/// Nearest snap point within `SNAP_THRESHOLD`, else `time` unchanged.
/// Ties resolve to the smaller point (first in ascending order).
pub fn snap_to_closest(time: f64, points: &[f64]) -> f64 {
    let mut closest = match points.first() {
        Some(&p) => p,
        None => return time,
    };
    let mut min_diff = (time - closest).abs();
    for &p in &points[1..] {
        let diff = (time - p).abs();
        if diff < min_diff {
            min_diff = diff;
            closest = p;
        }
    }
    if min_diff <= SNAP_THRESHOLD {
        closest
    } else {
        time
    }
}

impl ScrubController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pointer down at viewport x `x`: offset from the viewport center maps
    /// to a time delta around the current playhead. Returns the snapped,
    /// clamped target time and begins a drag session anchored there.
    pub fn pointer_down(
        &mut self,
        x: f64,
        center_x: f64,
        current: f64,
        timeline: &TranscriptTimeline,
        duration: f64,
    ) -> f64 {
        let dt = (x - center_x) / PX_PER_SECOND;
        let raw = current + dt;
        let snapped = snap_to_closest(raw, &snap_points(timeline, duration));
        let time = snapped.clamp(0.0, duration.max(0.0));
        // Anchor at the snapped time, not the raw one.
        self.drag = Some(Drag {
            start_x: x,
            start_time: time,
        });
        time
    }

    /// Pointer move within a drag. Dragging the waveform left moves the
    /// playhead forward, so displacement is negated.
    pub fn pointer_move(
        &mut self,
        x: f64,
        timeline: &TranscriptTimeline,
        duration: f64,
    ) -> Option<f64> {
        let drag = self.drag?;
        let dt = -(x - drag.start_x) / PX_PER_SECOND;
        let raw = drag.start_time + dt;
        let snapped = snap_to_closest(raw, &snap_points(timeline, duration));
        Some(snapped.clamp(0.0, duration.max(0.0)))
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
    }
}
