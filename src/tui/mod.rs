//! Terminal user interface using Ratatui.

mod app;
mod backend;
mod debug_log;
mod detail;
mod help;
mod incoming;
mod log_capture;
mod messages;
mod outgoing;
mod search;
mod ui;

pub use app::run;
pub use log_capture::LogRing;
