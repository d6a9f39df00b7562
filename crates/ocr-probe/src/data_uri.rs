//! Base64 image data URIs.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::{Error, Result};

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// A syntactically valid `data:<mime>;base64,<payload>` string.
///
/// Only the shape is checked: the MIME type must look like `type/subtype`
/// and the payload must decode as standard base64. The encoded image is never
/// inspected, and the original string is kept byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageDataUri {
    raw: String,
    /// Byte offset where the media type (without parameters) ends.
    mime_end: usize,
    /// Byte offset where the base64 payload starts.
    payload_start: usize,
}

impl ImageDataUri {
    /// Parses and validates a data URI.
    pub fn parse(raw: impl Into<String>) -> Result<Self> {
        let raw = raw.into();

        let rest = raw
            .strip_prefix(SCHEME)
            .ok_or_else(|| Error::invalid_data_uri("missing 'data:' prefix"))?;
        let (media_type, payload) = rest
            .split_once(BASE64_MARKER)
            .ok_or_else(|| Error::invalid_data_uri("missing ';base64,' marker"))?;

        // Parameters such as `;name=scan.png` may precede the marker.
        let mime = media_type.split(';').next().unwrap_or_default();
        match mime.split_once('/') {
            Some((kind, subtype))
                if !kind.is_empty()
                    && !subtype.is_empty()
                    && !mime.contains(char::is_whitespace) => {}
            _ => {
                return Err(Error::invalid_data_uri(format!(
                    "invalid media type '{mime}'"
                )));
            }
        }

        if payload.is_empty() {
            return Err(Error::invalid_data_uri("empty base64 payload"));
        }

        STANDARD
            .decode(payload)
            .map_err(|e| Error::invalid_data_uri(format!("payload is not valid base64: {e}")))?;

        let mime_end = SCHEME.len() + mime.len();
        let payload_start = SCHEME.len() + media_type.len() + BASE64_MARKER.len();

        Ok(Self {
            raw,
            mime_end,
            payload_start,
        })
    }

    /// Encodes raw image bytes into a data URI with the given MIME type.
    pub fn from_bytes(bytes: &[u8], mime_type: &str) -> Self {
        let raw = format!("{SCHEME}{mime_type}{BASE64_MARKER}{}", STANDARD.encode(bytes));

        Self {
            mime_end: SCHEME.len() + mime_type.len(),
            payload_start: SCHEME.len() + mime_type.len() + BASE64_MARKER.len(),
            raw,
        }
    }

    /// Reads an image file and encodes it as a data URI.
    ///
    /// The MIME type is derived from the file extension.
    pub async fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mime_type = mime_type_for_path(path)?;

        let bytes = tokio::fs::read(path).await.map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read image '{}': {}", path.display(), e),
            ))
        })?;

        if bytes.is_empty() {
            return Err(Error::invalid_input(format!(
                "Image file '{}' is empty",
                path.display()
            )));
        }

        Ok(Self::from_bytes(&bytes, mime_type))
    }

    /// Returns the MIME type, without parameters.
    pub fn mime_type(&self) -> &str {
        &self.raw[SCHEME.len()..self.mime_end]
    }

    /// Returns the base64 payload.
    pub fn payload(&self) -> &str {
        &self.raw[self.payload_start..]
    }

    /// Returns the full data URI.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Consumes the data URI and returns the underlying string.
    pub fn into_string(self) -> String {
        self.raw
    }
}

impl FromStr for ImageDataUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl AsRef<str> for ImageDataUri {
    fn as_ref(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for ImageDataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Determines the image MIME type from a file extension.
fn mime_type_for_path(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| Error::invalid_input("File has no extension"))?;

    let mime_type = match extension.to_lowercase().as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tiff" | "tif" => "image/tiff",
        ext => {
            return Err(Error::unsupported(format!(
                "Unsupported image extension: {ext}"
            )));
        }
    };

    Ok(mime_type)
}
