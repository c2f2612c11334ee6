pub mod chart;
pub mod config;
pub mod output;
pub mod scoring;
pub mod stderr_buffer;
pub mod tui;
