pub mod analytics;
pub mod config;
pub mod format;
pub mod render;
pub mod upstream;
