use crate::{Error, Result};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];
const JPEG_SOI: &[u8] = &[0xff, 0xd8, 0xff];

/// Media types accepted for uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MediaType {
    #[serde(rename = "image/png")]
    Png,
    #[serde(rename = "image/jpeg")]
    Jpeg,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Png => "image/png",
            MediaType::Jpeg => "image/jpeg",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(MediaType::Png),
            "image/jpeg" | "image/jpg" | "image/pjpeg" => Some(MediaType::Jpeg),
            _ => None,
        }
    }

    /// Guesses the media type from the leading magic bytes.
    pub fn sniff(data: &[u8]) -> Option<Self> {
        if data.starts_with(PNG_SIGNATURE) {
            Some(MediaType::Png)
        } else if data.starts_with(JPEG_SOI) {
            Some(MediaType::Jpeg)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw image bytes plus the media type they were declared with.
///
/// Uploaded payloads are restricted to [`MediaType`]; images coming back from
/// the generation service keep whatever type the service reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    data: Bytes,
    mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Builds an upload payload, rejecting empty data and unsupported types.
    pub fn from_upload(data: impl Into<Bytes>, declared: &str) -> Result<Self> {
        let data = data.into();
        if data.is_empty() {
            return Err(Error::invalid_payload("image data is empty"));
        }

        let declared_type = MediaType::parse(declared)
            .ok_or_else(|| Error::invalid_payload(format!("unsupported media type: {declared}")))?;

        let media_type = match MediaType::sniff(&data) {
            Some(sniffed) if sniffed != declared_type => {
                warn!(
                    "Declared media type {} does not match image content, using {}",
                    declared_type, sniffed
                );
                sniffed
            }
            _ => declared_type,
        };

        Ok(Self::new(data, media_type.as_str()))
    }

    /// Strips a `data:<mime>;base64,<payload>` envelope.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let rest = data_url
            .trim()
            .strip_prefix("data:")
            .ok_or_else(|| Error::invalid_payload("expected a data URL"))?;

        let (header, encoded) = rest
            .split_once(',')
            .ok_or_else(|| Error::invalid_payload("data URL has no payload"))?;

        let mut params = header.split(';');
        let mime_type = params.next().unwrap_or_default();
        if !params.any(|param| param.eq_ignore_ascii_case("base64")) {
            return Err(Error::invalid_payload("data URL is not base64 encoded"));
        }

        let data = STANDARD
            .decode(encoded.trim())
            .map_err(|e| Error::invalid_payload(format!("invalid base64 payload: {e}")))?;

        Self::from_upload(data, mime_type)
    }

    /// Decodes base64 image data as returned inline by the generation service.
    pub fn from_base64(encoded: &str, mime_type: impl Into<String>) -> Result<Self> {
        let data = STANDARD.decode(encoded.trim())?;
        Ok(Self::new(data, mime_type))
    }

    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.data)
    }
}

/// The two independent upload slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    Person,
    Clothing,
}

impl FromStr for Slot {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "person" => Ok(Slot::Person),
            "clothing" => Ok(Slot::Clothing),
            other => Err(Error::invalid_payload(format!("unknown slot: {other}"))),
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Slot::Person => f.write_str("person"),
            Slot::Clothing => f.write_str("clothing"),
        }
    }
}
