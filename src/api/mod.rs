//! API client module for the SMS gateway dashboard

pub mod client;
mod incoming;
mod outgoing;
#[cfg(test)]
mod test_server;

pub use client::{FetchError, GatewayClient};
pub use incoming::{fetch_incoming, list_incoming};
pub use outgoing::{activity_line, fetch_logs, list_outgoing, summary_line};
