pub mod clock;
pub mod event;
pub mod samples;
pub mod scrub;
pub mod state;
pub mod timeline;
