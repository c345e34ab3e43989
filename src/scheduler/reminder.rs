//! Reminder Record Module
//!
//! A single pending notification and its on-disk representation.

use serde::{Deserialize, Serialize};

// == Reminder ==
/// One pending notification inside a timestamp bucket.
///
/// Ids are persisted as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Reminder {
    /// Channel the reminder is delivered to
    #[serde(rename = "channel", with = "id_string")]
    pub channel_id: u64,
    /// Text delivered after the author mention
    pub message: String,
    /// User who asked for the reminder
    #[serde(rename = "author", with = "id_string")]
    pub author_id: u64,
}

impl Reminder {
    pub fn new(author_id: u64, channel_id: u64, message: impl Into<String>) -> Self {
        Self {
            channel_id,
            message: message.into(),
            author_id,
        }
    }
}

/// Serializes numeric ids as decimal strings.
pub(crate) mod id_string {
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(id: &u64, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(id)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u64, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.trim()
            .parse()
            .map_err(|_| de::Error::custom(format!("invalid id string: {:?}", raw)))
    }
}
