//! Self-contained product images.
//!
//! Products carry their image inline as a `data:<mime>;base64,<payload>` URL
//! rather than a link to an asset host.

use core::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building an [`ImagePayload`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ImageError {
    /// The payload is empty.
    #[error("image payload cannot be empty")]
    Empty,
    /// The file extension does not name a supported image type.
    #[error("unsupported image type: {0}")]
    UnsupportedType(String),
    /// The string is not a base64 `data:` URL.
    #[error("image must be a base64 data URL")]
    NotDataUrl,
    /// The base64 payload does not decode.
    #[error("invalid base64 image data: {0}")]
    InvalidBase64(String),
}

/// An inline image encoded as a base64 data URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    /// Encode raw image bytes.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError::Empty`] if `bytes` is empty or
    /// [`ImageError::UnsupportedType`] if `mime` is not an image type.
    pub fn from_bytes(mime: &str, bytes: &[u8]) -> Result<Self, ImageError> {
        if bytes.is_empty() {
            return Err(ImageError::Empty);
        }
        if !mime.starts_with("image/") {
            return Err(ImageError::UnsupportedType(mime.to_string()));
        }
        Ok(Self(format!("data:{mime};base64,{}", STANDARD.encode(bytes))))
    }

    /// Parse and check an existing data URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not a base64 image data URL,
    /// or its payload does not decode.
    pub fn parse(s: &str) -> Result<Self, ImageError> {
        if s.is_empty() {
            return Err(ImageError::Empty);
        }
        let (header, data) = split_data_url(s).ok_or(ImageError::NotDataUrl)?;
        if !header.starts_with("image/") {
            return Err(ImageError::UnsupportedType(header.to_string()));
        }
        STANDARD
            .decode(data)
            .map_err(|e| ImageError::InvalidBase64(e.to_string()))?;
        Ok(Self(s.to_owned()))
    }

    /// Wrap a payload exactly as the backend stored it.
    pub(crate) const fn from_backend(raw: String) -> Self {
        Self(raw)
    }

    /// The MIME type for a file extension, if it is a supported image type.
    #[must_use]
    pub fn mime_for_extension(extension: &str) -> Option<&'static str> {
        match extension.to_ascii_lowercase().as_str() {
            "png" => Some("image/png"),
            "jpg" | "jpeg" => Some("image/jpeg"),
            "gif" => Some("image/gif"),
            "webp" => Some("image/webp"),
            "svg" => Some("image/svg+xml"),
            _ => None,
        }
    }

    /// The MIME type named in the data URL header.
    #[must_use]
    pub fn mime_type(&self) -> Option<&str> {
        split_data_url(&self.0).map(|(mime, _)| mime)
    }

    /// Size of the decoded image in bytes, if the payload decodes.
    #[must_use]
    pub fn decoded_len(&self) -> Option<usize> {
        let (_, data) = split_data_url(&self.0)?;
        STANDARD.decode(data).ok().map(|bytes| bytes.len())
    }

    /// The full data URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the payload and returns the data URL.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Split `data:<mime>;base64,<data>` into its MIME type and payload.
fn split_data_url(s: &str) -> Option<(&str, &str)> {
    let rest = s.strip_prefix("data:")?;
    let (header, data) = rest.split_once(',')?;
    let mime = header.strip_suffix(";base64")?;
    Some((mime, data))
}

impl fmt::Display for ImagePayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.mime_type(), self.decoded_len()) {
            (Some(mime), Some(len)) => write!(f, "{mime} image, {len} bytes"),
            _ => f.write_str("image"),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_from_bytes_builds_data_url() {
        let image = ImagePayload::from_bytes("image/png", b"\x89PNG").unwrap();
        assert_eq!(image.as_str(), "data:image/png;base64,iVBORw==");
        assert_eq!(image.mime_type(), Some("image/png"));
        assert_eq!(image.decoded_len(), Some(4));
        assert_eq!(image.to_string(), "image/png image, 4 bytes");
    }

    #[test]
    fn test_from_bytes_rejects_bad_input() {
        assert_eq!(ImagePayload::from_bytes("image/png", b""), Err(ImageError::Empty));
        assert!(matches!(
            ImagePayload::from_bytes("text/plain", b"hi"),
            Err(ImageError::UnsupportedType(_))
        ));
    }

    #[test]
    fn test_parse() {
        assert!(ImagePayload::parse("data:image/gif;base64,R0lG").is_ok());
        assert_eq!(ImagePayload::parse("https://x/y.png"), Err(ImageError::NotDataUrl));
        assert!(matches!(
            ImagePayload::parse("data:image/gif;base64,***"),
            Err(ImageError::InvalidBase64(_))
        ));
    }

    #[test]
    fn test_mime_for_extension() {
        assert_eq!(ImagePayload::mime_for_extension("JPG"), Some("image/jpeg"));
        assert_eq!(ImagePayload::mime_for_extension("txt"), None);
    }
}
