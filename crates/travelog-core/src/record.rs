//! Record types and identity generation

use crate::attachment::Attachment;
use chrono::{DateTime, TimeZone, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Key prefix reserved for records in the key-value store
pub const RECORD_PREFIX: &str = "record_";

const ID_SUFFIX_LEN: usize = 9;
const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// A dated location entry with optional attachments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: String,
    pub location: String,
    pub date: String,
    /// Data URI of the image attachment
    #[serde(default)]
    pub image: Option<String>,
    /// Data URI of the video attachment
    #[serde(default)]
    pub video: Option<String>,
    #[serde(with = "iso_millis")]
    pub created_at: DateTime<Utc>,
}

/// Input for creating a record
#[derive(Debug, Clone, Default)]
pub struct NewRecord {
    pub location: String,
    pub date: String,
    pub image: Option<Attachment>,
    pub video: Option<Attachment>,
}

impl NewRecord {
    pub fn new(location: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            date: date.into(),
            image: None,
            video: None,
        }
    }

    pub fn with_image(mut self, image: Attachment) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_video(mut self, video: Attachment) -> Self {
        self.video = Some(video);
        self
    }
}

/// Whether a key or id belongs to the record namespace
pub fn is_record_id(id: &str) -> bool {
    id.starts_with(RECORD_PREFIX)
}

/// Generate a record id of the form `record_<epoch-millis>_<suffix>`
pub fn generate_id(now: DateTime<Utc>) -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ID_SUFFIX_LEN)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("{}{}_{}", RECORD_PREFIX, now.timestamp_millis(), suffix)
}

/// Current time truncated to whole milliseconds
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    Utc.timestamp_millis_opt(now.timestamp_millis())
        .single()
        .unwrap_or(now)
}

/// `createdAt` is written as `2024-01-01T08:30:00.123Z`
mod iso_millis {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
