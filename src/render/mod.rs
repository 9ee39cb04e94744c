pub mod cursor;
pub mod surface;
pub mod waveform;
