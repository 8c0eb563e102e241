//! Image source handling: data URLs and fetched bytes.

use crate::error::{Error, Result};
use base64::Engine as _;
use base64::alphabet;
use base64::engine::general_purpose::STANDARD;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

/// Standard alphabet; padding optional, trailing bits ignored.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

/// Image bytes ready for classification, with their textual form.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    /// Raw image bytes.
    pub bytes: Vec<u8>,
    /// The same image as a `data:` URL, as seen by the heuristic analyzer.
    pub data_url: String,
}

impl ImagePayload {
    /// Build a payload from raw bytes and an optional content type.
    pub fn from_bytes(bytes: Vec<u8>, content_type: Option<&str>) -> Self {
        let data_url = to_data_url(&bytes, content_type);
        Self { bytes, data_url }
    }

    /// Decode a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(data_url: &str) -> Result<Self> {
        let bytes = decode_data_url(data_url)?;
        Ok(Self {
            bytes,
            data_url: data_url.to_string(),
        })
    }
}

/// Whether the input is a data URL rather than a fetchable location.
pub fn is_data_url(image: &str) -> bool {
    image.starts_with("data:")
}

/// Decode the base64 payload of a data URL.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| Error::InvalidDataUrl {
            reason: "missing data: scheme".to_string(),
        })?;

    let (header, payload) = rest.split_once(',').ok_or_else(|| Error::InvalidDataUrl {
        reason: "missing comma separator".to_string(),
    })?;

    if !header.ends_with(";base64") {
        return Err(Error::InvalidDataUrl {
            reason: format!("unsupported encoding in '{header}'"),
        });
    }

    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = LENIENT
        .decode(&compact)
        .map_err(|e| Error::InvalidDataUrl {
            reason: format!("payload is not base64 ({e})"),
        })?;

    if bytes.is_empty() {
        return Err(Error::InvalidDataUrl {
            reason: "empty payload".to_string(),
        });
    }

    Ok(bytes)
}

/// Encode bytes as a base64 data URL.
pub fn to_data_url(bytes: &[u8], content_type: Option<&str>) -> String {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(str::trim)
        .filter(|ct| !ct.is_empty())
        .unwrap_or("image/jpeg");
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Guess a MIME type from a file extension.
pub fn mime_from_extension(path: &std::path::Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "image/jpeg",
    }
}
