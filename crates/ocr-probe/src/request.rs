//! Probe request and wire payload types.

use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::{Error, ImageDataUri, Result};

/// A single probe of an OCR endpoint.
///
/// Built fresh for every invocation and never reused.
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    /// Identifier used to correlate log lines; never sent on the wire.
    pub request_id: Uuid,
    /// Absolute `http` or `https` URL of the OCR endpoint.
    pub target_url: Url,
    /// The JSON body posted to the endpoint.
    pub payload: ProbePayload,
}

impl ProbeRequest {
    /// Creates a request from a target URL and a data-URI image string.
    ///
    /// The image is only required to be non-empty; rejecting malformed
    /// images is left to the remote service.
    pub fn new(target_url: &str, image: impl Into<String>) -> Result<Self> {
        let image = image.into();
        if image.is_empty() {
            return Err(Error::invalid_input("Image data URI must not be empty"));
        }

        Ok(Self {
            request_id: Uuid::now_v7(),
            target_url: Self::parse_target_url(target_url)?,
            payload: ProbePayload { image },
        })
    }

    /// Creates a request carrying an already validated data URI.
    pub fn with_image(target_url: &str, image: ImageDataUri) -> Result<Self> {
        Self::new(target_url, image.into_string())
    }

    /// Serializes the payload into the JSON request body.
    pub fn to_body(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.payload)
    }

    /// Parses a target URL, requiring an absolute `http` or `https` URL.
    pub fn parse_target_url(target_url: &str) -> Result<Url> {
        let url =
            Url::parse(target_url).map_err(|e| Error::invalid_url(target_url, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => {}
            scheme => {
                return Err(Error::invalid_url(
                    target_url,
                    format!("unsupported scheme '{scheme}'"),
                ));
            }
        }

        if url.host_str().is_none() {
            return Err(Error::invalid_url(target_url, "missing host"));
        }

        Ok(url)
    }
}

/// The JSON body posted to the OCR endpoint: `{"image": "<data-URI>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbePayload {
    /// The data-URI encoded image, forwarded unchanged.
    pub image: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "data:image/png;base64,aGVsbG8=";

    #[test]
    fn test_request_creation() {
        let request = ProbeRequest::new("http://localhost:5000/ocr", IMAGE).unwrap();

        assert_eq!(request.target_url.as_str(), "http://localhost:5000/ocr");
        assert_eq!(request.payload.image, IMAGE);
    }

    #[test]
    fn test_request_ids_are_unique() {
        let first = ProbeRequest::new("http://localhost:5000/ocr", IMAGE).unwrap();
        let second = ProbeRequest::new("http://localhost:5000/ocr", IMAGE).unwrap();
        assert_ne!(first.request_id, second.request_id);
    }

    #[test]
    fn test_rejects_invalid_urls() {
        for url in ["", "/ocr", "localhost:5000/ocr", "ftp://host/ocr", "not a url"] {
            let error = ProbeRequest::new(url, IMAGE).unwrap_err();
            assert!(matches!(error, Error::InvalidUrl { .. }), "accepted {url:?}");
        }
    }

    #[test]
    fn test_rejects_empty_image() {
        let error = ProbeRequest::new("http://localhost:5000/ocr", "").unwrap_err();
        assert!(matches!(error, Error::InvalidInput { .. }));
    }

    #[test]
    fn test_body_carries_image_unchanged() {
        let image = format!("data:image/png;base64,{}", "A".repeat(64 * 1024));
        let request = ProbeRequest::new("https://ocr.example.com/api", image.clone()).unwrap();

        let body = request.to_body().unwrap();
        let decoded: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(decoded, serde_json::json!({ "image": image }));
    }

    #[test]
    fn test_with_image() {
        let image = ImageDataUri::from_bytes(b"hello", "image/png");
        let request = ProbeRequest::with_image("http://localhost:5000/ocr", image).unwrap();
        assert_eq!(request.payload.image, IMAGE);
    }
}
