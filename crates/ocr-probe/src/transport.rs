//! The HTTP exchange behind a probe.

use bytes::Bytes;
use strum::{AsRefStr, Display, EnumString, IntoStaticStr};
use thiserror::Error;
use url::Url;

/// Sends one JSON request and hands back the raw response.
///
/// Implement this trait to run probes over a custom HTTP stack.
#[async_trait::async_trait]
pub trait ProbeTransport: Send + Sync {
    /// Posts `body` to `url` with `Content-Type: application/json`.
    ///
    /// Must perform exactly one request and must not retry.
    async fn post_json(
        &self,
        url: &Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError>;
}

/// Status and undecoded body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Bytes,
}

impl TransportResponse {
    /// Creates a new transport response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Where in the exchange a transport failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TransportErrorKind {
    /// Connection could not be established (refused, DNS, TLS).
    Connect,
    /// The transport gave up waiting.
    Timeout,
    /// The request could not be built or sent.
    Request,
    /// The response body could not be read.
    Body,
}

/// Failure to complete the HTTP exchange.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} error: {message}")]
pub struct TransportError {
    /// Where the exchange failed.
    pub kind: TransportErrorKind,
    /// Underlying failure description, including its source chain.
    pub message: String,
}

impl TransportError {
    /// Creates a new transport error.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Builds a transport error from an error and its whole source chain.
    pub fn from_error(kind: TransportErrorKind, error: &(dyn std::error::Error + 'static)) -> Self {
        Self::new(kind, error_chain(error))
    }
}

/// Joins an error with its sources, outermost first.
fn error_chain(error: &(dyn std::error::Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        // Some wrappers repeat their source's message verbatim.
        if !message.ends_with(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }

    message
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[derive(Debug, Error)]
    #[error("error sending request")]
    struct Outer(#[source] std::io::Error);

    #[test]
    fn test_error_chain_includes_sources() {
        let io_error = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let error = TransportError::from_error(TransportErrorKind::Connect, &Outer(io_error));

        assert_eq!(error.kind, TransportErrorKind::Connect);
        assert_eq!(error.message, "error sending request: connection refused");
        assert_eq!(
            error.to_string(),
            "connect error: error sending request: connection refused"
        );
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!(
            TransportErrorKind::from_str("timeout").unwrap(),
            TransportErrorKind::Timeout
        );
        let name: &'static str = TransportErrorKind::Body.into();
        assert_eq!(name, "body");
        assert!(TransportErrorKind::from_str("dns").is_err());
    }
}
