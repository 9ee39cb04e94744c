use super::surface::{Color, DrawSurface, ACCENT, PLAYED, UNPLAYED};
use crate::session::samples::SampleStore;

/// Horizontal zoom: pixels of waveform per second of audio.
pub const PX_PER_SECOND: f64 = 100.0;
pub const BAR_WIDTH: f64 = 4.0;
pub const BAR_GAP: f64 = 2.0;
pub const BAR_STRIDE: f64 = BAR_WIDTH + BAR_GAP;

/// Empirical visual gain applied after sqrt compression. A feel constant,
/// not derived from anything.
pub const VISUAL_BOOST: f64 = 4.5;
/// Bars never exceed this fraction of the viewport height.
pub const MAX_HEIGHT_FRAC: f64 = 0.9;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarShade {
    Recording,
    Played,
    Unplayed,
}

impl BarShade {
    pub fn color(&self) -> Color {
        match self {
            BarShade::Recording => ACCENT,
            BarShade::Played => PLAYED,
            BarShade::Unplayed => UNPLAYED,
        }
    }
}

/// One pill-shaped bar positioned in logical viewport pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub shade: BarShade,
}

/// Convert the time window around the playhead into a draw list.
///
/// The playhead sits at the horizontal center of the viewport; each bar
/// aggregates a fixed count of samples by mean absolute amplitude, with
/// sqrt compression so quiet signal stays visible. Pure function of state.
pub fn build_waveform(
    store: &SampleStore,
    current_time: f64,
    recording: bool,
    view: Viewport,
) -> Vec<Bar> {
    let mut bars = Vec::new();
    if store.is_empty() {
        return bars;
    }

    let sample_rate = store.sample_rate() as f64;
    let samples_per_bar = (sample_rate / PX_PER_SECOND) * BAR_STRIDE;

    let center_bar = current_time * sample_rate / samples_per_bar;
    let visible = (view.width / BAR_STRIDE).ceil() + 2.0;

    let first = (center_bar - visible / 2.0).floor() as i64;
    let last = (center_bar + visible / 2.0).ceil() as i64;

    for i in first..=last {
        if i < 0 {
            continue;
        }
        let start = (i as f64 * samples_per_bar).floor() as usize;
        let end = ((i + 1) as f64 * samples_per_bar).floor() as usize;
        if start >= store.len() {
            break;
        }

        let avg = store.mean_abs(start, end) as f64;
        let boosted = avg.sqrt();
        let height = (boosted * view.height * VISUAL_BOOST)
            .max(BAR_WIDTH)
            .min(view.height * MAX_HEIGHT_FRAC);

        let bar_time = i as f64 * samples_per_bar / sample_rate;
        let x = view.width / 2.0 + (bar_time - current_time) * PX_PER_SECOND;
        if x < -BAR_STRIDE || x > view.width + BAR_STRIDE {
            continue;
        }

        let shade = if recording {
            BarShade::Recording
        } else if bar_time < current_time {
            BarShade::Played
        } else {
            BarShade::Unplayed
        };

        bars.push(Bar {
            x,
            y: (view.height - height) / 2.0,
            width: BAR_WIDTH,
            height,
            shade,
        });
    }

    bars
}

/// Clear and repaint the full waveform. Triggered on every capture frame,
/// playback tick and scrub update; never on an independent timer.
pub fn render<S: DrawSurface>(
    surface: &mut S,
    store: &SampleStore,
    current_time: f64,
    recording: bool,
    view: Viewport,
) {
    surface.clear(view.width, view.height);
    for bar in build_waveform(store, current_time, recording, view) {
        // Radius = bar width gives the full-round pill shape.
        surface.fill_rounded_rect(bar.x, bar.y, bar.width, bar.height, BAR_WIDTH, bar.shade.color());
    }
}
