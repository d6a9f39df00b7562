//! Reqwest-based HTTP transport for probes.

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use url::Url;

use super::{ReqwestConfig, TRACING_TARGET};
use crate::{Error, ProbeTransport, Result, TransportError, TransportResponse};

/// Reqwest-based transport that posts probe payloads to OCR endpoints.
///
/// # Examples
///
/// ```rust,ignore
/// use ocr_probe::reqwest::{ReqwestConfig, ReqwestTransport};
///
/// let config = ReqwestConfig::default().with_timeout(10);
/// let transport = ReqwestTransport::new(config)?;
/// ```
#[derive(Clone)]
pub struct ReqwestTransport {
    http: Client,
    config: ReqwestConfig,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    /// Creates a new reqwest transport with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be built.
    pub fn new(config: ReqwestConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Client::builder()
            .user_agent(config.effective_user_agent())
            .danger_accept_invalid_certs(config.accept_invalid_certs);

        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        if let Some(api_key) = config.api_key.as_deref() {
            let mut value = HeaderValue::from_str(&format!("Bearer {api_key}"))
                .map_err(|e| Error::config(format!("Invalid API key: {e}")))?;
            value.set_sensitive(true);

            let mut headers = HeaderMap::new();
            headers.insert(AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }

        let http = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        tracing::debug!(
            target: TRACING_TARGET,
            timeout = ?config.timeout(),
            has_api_key = config.api_key.is_some(),
            "Reqwest transport created"
        );

        Ok(Self { http, config })
    }
}

#[async_trait::async_trait]
impl ProbeTransport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: Vec<u8>,
    ) -> std::result::Result<TransportResponse, TransportError> {
        tracing::trace!(
            target: TRACING_TARGET,
            url = %url,
            body_bytes = body.len(),
            "Sending request"
        );

        let response = self
            .http
            .post(url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.bytes().await?;

        tracing::trace!(
            target: TRACING_TARGET,
            status,
            body_bytes = body.len(),
            "Response received"
        );

        Ok(TransportResponse::new(status, body))
    }
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddr;
    use std::time::Duration;

    use axum::Router;
    use axum::http::{HeaderMap as AxumHeaderMap, StatusCode};
    use axum::routing::post;
    use tokio::net::TcpListener;

    use super::*;
    use crate::{ProbeClient, ProbeRequest, ProbeResult, TransportErrorKind};

    const IMAGE: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    /// Serves `router` on an ephemeral local port.
    async fn spawn_stub(router: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        addr
    }

    /// Echoes the decoded request body back, together with the request headers
    /// the probe is expected to send.
    async fn echo(headers: AxumHeaderMap, body: String) -> (StatusCode, String) {
        let payload: serde_json::Value = serde_json::from_str(&body).unwrap();
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or_default()
                .to_owned()
        };

        let reply = serde_json::json!({
            "image": payload["image"],
            "content_type": header("content-type"),
            "authorization": header("authorization"),
            "user_agent": header("user-agent"),
        });
        (StatusCode::OK, reply.to_string())
    }

    #[test]
    fn test_transport_creation() {
        let transport = ReqwestTransport::new(ReqwestConfig::default().with_timeout(5)).unwrap();
        let debug = format!("{transport:?}");
        assert!(debug.contains("http_timeout: Some(5)"), "{debug}");
    }

    #[test]
    fn test_transport_rejects_invalid_config() {
        assert!(ReqwestTransport::new(ReqwestConfig::default().with_timeout(0)).is_err());
        assert!(ReqwestTransport::new(ReqwestConfig::default().with_api_key("bad\nkey")).is_err());
    }

    #[tokio::test]
    async fn test_stub_server_receives_exact_image() {
        let addr = spawn_stub(Router::new().route("/ocr", post(echo))).await;
        let config = ReqwestConfig::default()
            .with_api_key("test-key")
            .with_user_agent("probe-test/1.0");
        let client = ProbeClient::new(ReqwestTransport::new(config).unwrap());

        let request = ProbeRequest::new(&format!("http://{addr}/ocr"), IMAGE).unwrap();
        let result = client.probe(&request).await;

        let ProbeResult::Success { status_code, body } = result else {
            panic!("expected success, got {result:?}");
        };
        assert_eq!(status_code, 200);
        assert_eq!(body["image"], IMAGE);
        assert_eq!(body["content_type"], "application/json");
        assert_eq!(body["authorization"], "Bearer test-key");
        assert_eq!(body["user_agent"], "probe-test/1.0");
    }

    #[tokio::test]
    async fn test_stub_server_api_error() {
        let router = Router::new().route(
            "/ocr",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    r#"{"error":"bad image"}"#.to_owned(),
                )
            }),
        );
        let addr = spawn_stub(router).await;

        let result = crate::probe(&format!("http://{addr}/ocr"), IMAGE).await;
        assert_eq!(
            result,
            ProbeResult::ApiError {
                status_code: 400,
                body: serde_json::json!({ "error": "bad image" }),
            }
        );
    }

    #[tokio::test]
    async fn test_stub_server_non_json_body() {
        let router = Router::new().route("/ocr", post(|| async { "not json" }));
        let addr = spawn_stub(router).await;

        let result = crate::probe(&format!("http://{addr}/ocr"), IMAGE).await;
        assert_eq!(result.outcome(), "transport_failure");
    }

    #[tokio::test]
    async fn test_connection_refused() {
        // Bind and drop to obtain a local port nobody listens on.
        let addr = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap()
        };
        let url = Url::parse(&format!("http://{addr}/ocr")).unwrap();

        let transport = ReqwestTransport::new(ReqwestConfig::default()).unwrap();
        let error = transport.post_json(&url, b"{}".to_vec()).await.unwrap_err();
        assert_eq!(error.kind, TransportErrorKind::Connect);

        let result = crate::probe(url.as_str(), IMAGE).await;
        let ProbeResult::TransportFailure { message } = result else {
            panic!("expected transport failure, got {result:?}");
        };
        assert!(message.to_lowercase().contains("connect"), "{message}");
    }

    #[tokio::test]
    async fn test_timeout() {
        let router = Router::new().route(
            "/ocr",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(3)).await;
                "{}"
            }),
        );
        let addr = spawn_stub(router).await;
        let url = Url::parse(&format!("http://{addr}/ocr")).unwrap();

        let transport = ReqwestTransport::new(ReqwestConfig::default().with_timeout(1)).unwrap();
        let error = transport.post_json(&url, b"{}".to_vec()).await.unwrap_err();
        assert_eq!(error.kind, TransportErrorKind::Timeout, "{error}");

        let client = ProbeClient::new(transport);
        let request = ProbeRequest::new(url.as_str(), IMAGE).unwrap();
        let result = client.probe(&request).await;
        let ProbeResult::TransportFailure { message } = result else {
            panic!("expected transport failure, got {result:?}");
        };
        assert!(message.starts_with("timeout error"), "{message}");
    }

    #[tokio::test]
    async fn test_unresolvable_host() {
        let url = Url::parse("http://nonexistent.invalid/ocr").unwrap();

        let transport = ReqwestTransport::new(ReqwestConfig::default().with_timeout(10)).unwrap();
        let error = transport.post_json(&url, b"{}".to_vec()).await.unwrap_err();
        assert_ne!(error.kind, TransportErrorKind::Body);

        let result = crate::probe(url.as_str(), IMAGE).await;
        let ProbeResult::TransportFailure { message } = result else {
            panic!("expected transport failure, got {result:?}");
        };
        assert!(message.to_lowercase().contains("dns"), "{message}");
    }
}
