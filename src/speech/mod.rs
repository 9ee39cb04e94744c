pub mod recognizer;
pub mod synthesis;
