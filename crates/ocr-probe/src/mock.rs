//! In-memory transport for tests.

use std::sync::{Arc, Mutex};

use url::Url;

use crate::{ProbeTransport, TransportError, TransportResponse};

/// Transport that replays a canned outcome and records what it was sent.
#[derive(Debug, Clone)]
pub(crate) struct MockTransport {
    outcome: Result<TransportResponse, TransportError>,
    requests: Arc<Mutex<Vec<(Url, Vec<u8>)>>>,
}

impl MockTransport {
    /// Answers every request with `response`.
    pub(crate) fn respond(response: TransportResponse) -> Self {
        Self {
            outcome: Ok(response),
            requests: Arc::default(),
        }
    }

    /// Fails every request with `error`.
    pub(crate) fn fail(error: TransportError) -> Self {
        Self {
            outcome: Err(error),
            requests: Arc::default(),
        }
    }

    /// Number of requests received so far.
    pub(crate) fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// The most recent request.
    pub(crate) fn last_request(&self) -> Option<(Url, Vec<u8>)> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait::async_trait]
impl ProbeTransport for MockTransport {
    async fn post_json(
        &self,
        url: &Url,
        body: Vec<u8>,
    ) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push((url.clone(), body));
        self.outcome.clone()
    }
}
