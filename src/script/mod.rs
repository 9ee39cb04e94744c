pub mod generator;
pub mod keywords;
pub mod themes;
