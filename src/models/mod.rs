//! Data models for gateway API payloads

mod message;
mod outgoing;

pub use message::*;
pub use outgoing::*;
