//! Probe client with observability.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use crate::{
    ProbeRequest, ProbeResult, ProbeTransport, ReqwestConfig, ReqwestTransport, Result,
    TRACING_TARGET,
};

/// Runs probes over a [`ProbeTransport`] and logs their outcome.
///
/// The transport is wrapped in `Arc` for cheap cloning. Clones share the
/// transport but no per-probe state.
#[derive(Clone)]
pub struct ProbeClient {
    inner: Arc<dyn ProbeTransport>,
}

impl fmt::Debug for ProbeClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProbeClient").finish_non_exhaustive()
    }
}

impl ProbeClient {
    /// Creates a probe client over the given transport.
    pub fn new<T>(transport: T) -> Self
    where
        T: ProbeTransport + 'static,
    {
        Self {
            inner: Arc::new(transport),
        }
    }

    /// Creates a probe client over a reqwest transport.
    ///
    /// # Errors
    ///
    /// Returns an error if the transport configuration is invalid.
    pub fn with_reqwest(config: ReqwestConfig) -> Result<Self> {
        ReqwestTransport::new(config).map(Self::new)
    }

    /// Sends the request once and classifies the outcome.
    ///
    /// Never fails: every failure is reported as
    /// [`ProbeResult::TransportFailure`].
    pub async fn probe(&self, request: &ProbeRequest) -> ProbeResult {
        let started_at = Instant::now();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request.request_id,
            url = %request.target_url,
            image_bytes = request.payload.image.len(),
            "Sending OCR probe"
        );

        let result = match request.to_body() {
            Ok(body) => match self.inner.post_json(&request.target_url, body).await {
                Ok(response) => ProbeResult::from_response(response.status, &response.body),
                Err(error) => ProbeResult::transport_failure(error.to_string()),
            },
            Err(error) => {
                ProbeResult::transport_failure(format!("Failed to serialize request body: {error}"))
            }
        };

        let elapsed_ms = u64::try_from(started_at.elapsed().as_millis()).unwrap_or(u64::MAX);
        match &result {
            ProbeResult::Success { status_code, .. } => {
                tracing::info!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code,
                    elapsed_ms,
                    "OCR probe succeeded"
                );
            }
            ProbeResult::ApiError { status_code, .. } => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    status_code,
                    elapsed_ms,
                    "OCR endpoint returned an error status"
                );
            }
            ProbeResult::TransportFailure { message } => {
                tracing::error!(
                    target: TRACING_TARGET,
                    request_id = %request.request_id,
                    error = %message,
                    elapsed_ms,
                    "OCR probe transport failure"
                );
            }
        }

        result
    }
}

/// Probes `target_url` once with `image_data_uri` using the default reqwest
/// transport.
///
/// Invalid arguments are reported as [`ProbeResult::TransportFailure`] like
/// any other failure, so this function always returns a result.
pub async fn probe(target_url: &str, image_data_uri: &str) -> ProbeResult {
    let request = match ProbeRequest::new(target_url, image_data_uri) {
        Ok(request) => request,
        Err(error) => {
            return ProbeResult::transport_failure(format!(
                "Failed to build probe request: {error}"
            ));
        }
    };

    match ProbeClient::with_reqwest(ReqwestConfig::default()) {
        Ok(client) => client.probe(&request).await,
        Err(error) => {
            ProbeResult::transport_failure(format!("Failed to create HTTP transport: {error}"))
        }
    }
}
