//! Attachment encoding
//!
//! Uploaded binaries are stored inline as data URIs
//! (`data:<mime>;base64,<payload>`) so a record stays a single JSON value.

use crate::{Result, TravelogError};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::Bytes;

/// MIME type used when an upload does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// A fully buffered uploaded file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content_type: String,
    pub bytes: Bytes,
}

impl Attachment {
    pub fn new(content_type: Option<&str>, bytes: impl Into<Bytes>) -> Self {
        let content_type = content_type
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string();
        Self {
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn to_data_uri(&self) -> String {
        encode_data_uri(&self.content_type, &self.bytes)
    }
}

/// Encode bytes as a `data:<mime>;base64,<payload>` URI
pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = STANDARD.encode(bytes);
    let mut uri = String::with_capacity(mime.len() + payload.len() + 13);
    uri.push_str("data:");
    uri.push_str(mime);
    uri.push_str(";base64,");
    uri.push_str(&payload);
    uri
}

/// Split a base64 data URI back into its MIME type and bytes
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>)> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| TravelogError::InvalidDataUri("missing data: scheme".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| TravelogError::InvalidDataUri("missing payload separator".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| TravelogError::InvalidDataUri("not base64 encoded".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| TravelogError::InvalidDataUri(e.to_string()))?;

    Ok((mime.to_string(), bytes))
}
