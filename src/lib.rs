pub mod audio;
pub mod export;
pub mod render;
pub mod script;
pub mod session;
pub mod speech;

// Re-export specific items if needed for convenient access
pub use session::state::Session;
