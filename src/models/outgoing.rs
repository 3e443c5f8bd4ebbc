//! Outgoing SMS log and delivery statistics

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::{lenient_id, text_or_empty};

/// Delivery state of an outgoing SMS, stored by the gateway as an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum DeliveryStatus {
    Pending,
    Processed,
    Failed,
    Unknown(i64),
}

impl From<i64> for DeliveryStatus {
    fn from(code: i64) -> Self {
        match code {
            0 => DeliveryStatus::Pending,
            1 => DeliveryStatus::Processed,
            2 => DeliveryStatus::Failed,
            other => DeliveryStatus::Unknown(other),
        }
    }
}

impl From<DeliveryStatus> for i64 {
    fn from(status: DeliveryStatus) -> Self {
        match status {
            DeliveryStatus::Pending => 0,
            DeliveryStatus::Processed => 1,
            DeliveryStatus::Failed => 2,
            DeliveryStatus::Unknown(code) => code,
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryStatus::Pending => write!(f, "pending"),
            DeliveryStatus::Processed => write!(f, "processed"),
            DeliveryStatus::Failed => write!(f, "failed"),
            DeliveryStatus::Unknown(code) => write!(f, "status {}", code),
        }
    }
}

/// An SMS queued for sending through one of the gateway's modems.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutgoingMessage {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub uuid: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub mobile: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub body: String,
    #[serde(default)]
    pub status: Option<DeliveryStatus>,
    #[serde(default)]
    pub retries: u32,
    /// Modem the message was handed to. Empty while pending.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub device: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub created_at: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub updated_at: String,
}

/// Message counts per delivery status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSummary {
    pub pending: u64,
    pub processed: u64,
    pub failed: u64,
}

impl StatusSummary {
    pub fn total(&self) -> u64 {
        self.pending + self.processed + self.failed
    }
}

/// Response body of `GET /api/logs/`.
///
/// `summary` is indexed by status code. `daycount` maps `YYYY-MM-DD` to the
/// number of messages queued that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogsResponse {
    #[serde(default)]
    pub summary: Option<Vec<u64>>,
    #[serde(default)]
    pub daycount: Option<BTreeMap<String, u64>>,
    #[serde(default)]
    pub messages: Option<Vec<OutgoingMessage>>,
}

/// Days shown in the activity line.
pub const ACTIVITY_DAYS: usize = 7;

impl LogsResponse {
    pub fn status_summary(&self) -> Option<StatusSummary> {
        let counts = self.summary.as_ref()?;
        let at = |i: usize| counts.get(i).copied().unwrap_or(0);
        Some(StatusSummary {
            pending: at(0),
            processed: at(1),
            failed: at(2),
        })
    }

    /// Per-day counts, newest day first, at most `ACTIVITY_DAYS` entries.
    pub fn recent_days(&self) -> Vec<(String, u64)> {
        self.daycount
            .iter()
            .flatten()
            .rev()
            .take(ACTIVITY_DAYS)
            .map(|(day, count)| (day.clone(), *count))
            .collect()
    }
}
