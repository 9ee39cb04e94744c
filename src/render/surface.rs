#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Accent used for every bar while recording.
pub const ACCENT: Color = Color::rgb(0xFF, 0x3B, 0x30);
/// Bars behind the playhead in review.
pub const PLAYED: Color = Color::rgb(0x66, 0x66, 0x66);
/// Bars at or ahead of the playhead in review.
pub const UNPLAYED: Color = Color::rgb(0xAA, 0xAA, 0xAA);

/// Drawing surface collaborator contract: a rectangle/fill API over a
/// logical pixel grid, independent of device pixel ratio. The renderer
/// never assumes anything richer than this.
pub trait DrawSurface {
    fn clear(&mut self, width: f64, height: f64);
    fn fill_rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear {
        width: f64,
        height: f64,
    },
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        radius: f64,
        color: Color,
    },
}

/// Test double that records every call.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rects(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops.iter().filter(|op| matches!(op, DrawOp::Rect { .. }))
    }
}

impl DrawSurface for RecordingSurface {
    fn clear(&mut self, width: f64, height: f64) {
        self.ops.push(DrawOp::Clear { width, height });
    }

    fn fill_rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64, color: Color) {
        self.ops.push(DrawOp::Rect {
            x,
            y,
            width,
            height,
            radius,
            color,
        });
    }
}
