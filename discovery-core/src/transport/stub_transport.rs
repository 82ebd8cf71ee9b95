use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::service::ServiceRef;
use crate::transport::{EndpointsTransport, TransportError};

/// Replays scripted responses; the last one repeats once the script runs out.
#[derive(Debug, Default)]
pub(crate) struct StubTransport {
    responses: Mutex<VecDeque<Result<String, reqwest::StatusCode>>>,
    fetches: AtomicUsize,
    delay: Option<Duration>,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn payload(self, payload: impl Into<String>) -> Self {
        self.push(Ok(payload.into()))
    }

    pub(crate) fn failure(self, status: reqwest::StatusCode) -> Self {
        self.push(Err(status))
    }

    pub(crate) fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn push(self, response: Result<String, reqwest::StatusCode>) -> Self {
        self.responses.lock().unwrap().push_back(response);
        self
    }

    fn next_response(&self) -> Result<String, reqwest::StatusCode> {
        let mut responses = self.responses.lock().unwrap();
        if responses.len() > 1 {
            responses.pop_front().unwrap()
        } else {
            responses.front().cloned().unwrap_or_else(|| Ok(String::new()))
        }
    }
}

#[async_trait]
impl EndpointsTransport for StubTransport {
    async fn fetch_endpoints(&self, service: &ServiceRef) -> Result<String, TransportError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.next_response().map_err(|status| TransportError::Status {
            url: service.endpoints_path(),
            status,
        })
    }
}
