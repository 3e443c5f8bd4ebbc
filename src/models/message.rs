//! Incoming SMS models

use serde::{Deserialize, Deserializer, Serialize};

/// An SMS received by one of the gateway's modems.
///
/// Decoding is per-field lenient: a missing or null field becomes empty
/// rather than rejecting the whole payload, and a numeric-string `id` is
/// accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingMessage {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<i64>,
    /// Server-side timestamp, displayed as-is.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub created_at: String,
    /// Sender number.
    #[serde(default, deserialize_with = "text_or_empty")]
    pub mobile: String,
    #[serde(default, deserialize_with = "text_or_empty")]
    pub body: String,
    /// Id of the modem that received the message, when the gateway reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
}

/// Response body of `GET /api/incoming/`.
///
/// `messages: None` (field absent or null) is not the same as an empty list:
/// the former leaves the view untouched, the latter clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomingResponse {
    #[serde(default)]
    pub messages: Option<Vec<IncomingMessage>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(i64),
    Text(String),
}

/// Integer id, numeric string, or nothing. Unparseable strings become `None`.
pub(crate) fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(n)) => Some(n),
        Some(RawId::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

/// String field where null reads as empty.
pub(crate) fn text_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
