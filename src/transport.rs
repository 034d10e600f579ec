//! HTTP transport for built payloads.
//!
//! The [`Transport`] trait is the only place courier talks to the network,
//! so transmission logic can be exercised with [`MockTransport`] instead of
//! a live endpoint.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::blocking::multipart::{Form, Part};
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;

use crate::{Error, Payload, Result};

/// Raw response to one request.
///
/// The body is passed through untouched; courier imposes no structure on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body bytes.
    pub body: Vec<u8>,
}

impl Response {
    /// Whether the status is 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one payload and waits for the full response.
pub trait Transport {
    /// POST `payload` to the endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the request cannot be built or sent,
    /// or the response body cannot be read. HTTP error statuses are not
    /// errors.
    fn post(&self, payload: Payload) -> Result<Response>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn post(&self, payload: Payload) -> Result<Response> {
        (**self).post(payload)
    }
}

// ============================================================================
// Production Implementation using reqwest
// ============================================================================

/// Blocking reqwest client bound to one webhook URL.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    endpoint: Url,
}

impl ReqwestTransport {
    /// Create a transport for `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] if the HTTP client cannot be initialized.
    pub fn new(endpoint: Url) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("courier/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, endpoint })
    }

    /// The webhook URL requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl Transport for ReqwestTransport {
    #[tracing::instrument(skip_all, fields(kind = payload_kind(&payload), size = payload.size()))]
    fn post(&self, payload: Payload) -> Result<Response> {
        let request = match payload {
            Payload::Json { body } => self
                .client
                .post(self.endpoint.clone())
                .header(CONTENT_TYPE, "application/json")
                .body(body),
            Payload::Multipart { parts } => {
                // Filenames go out as given, slashes included.
                let mut form = Form::new().percent_encode_noop();
                for part in parts {
                    let file = Part::bytes(part.bytes)
                        .file_name(part.file_name)
                        .mime_str("application/octet-stream")?;
                    form = form.part(part.field, file);
                }
                self.client.post(self.endpoint.clone()).multipart(form)
            }
        };

        tracing::debug!("sending request");
        let response = request.send().map_err(|e| {
            tracing::error!(error = %e, "request failed");
            e
        })?;

        let status = response.status();
        let body = response.bytes()?.to_vec();

        if status.is_success() {
            tracing::info!(
                status = status.as_u16(),
                response_len = body.len(),
                "request completed"
            );
        } else {
            tracing::warn!(
                status = status.as_u16(),
                response_len = body.len(),
                "endpoint returned an error status"
            );
        }

        Ok(Response {
            status: status.as_u16(),
            body,
        })
    }
}

fn payload_kind(payload: &Payload) -> &'static str {
    match payload {
        Payload::Json { .. } => "json",
        Payload::Multipart { .. } => "multipart",
    }
}

// ============================================================================
// Test/Mock Implementation
// ============================================================================

/// Transport that records payloads and replays queued outcomes.
///
/// Clones share state, so a test can hand one clone to a
/// [`Transmitter`](crate::Transmitter) and inspect the other.
///
/// ```rust
/// use courier::{MockTransport, Payload, Transport};
///
/// let mock = MockTransport::new();
/// mock.push_response(200, "ok");
///
/// let response = mock.post(Payload::text("hi").unwrap()).unwrap();
/// assert_eq!(response.body, b"ok");
/// assert_eq!(mock.call_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    outcomes: Arc<Mutex<VecDeque<MockOutcome>>>,
    calls: Arc<Mutex<Vec<Payload>>>,
}

#[derive(Debug)]
enum MockOutcome {
    Respond(Response),
    Fail(String),
}

impl MockTransport {
    /// Create a mock that answers `204` with an empty body unless told
    /// otherwise.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next unanswered call.
    pub fn push_response(&self, status: u16, body: impl Into<Vec<u8>>) {
        self.outcomes.lock().push_back(MockOutcome::Respond(Response {
            status,
            body: body.into(),
        }));
    }

    /// Queue a transport failure for the next unanswered call.
    pub fn push_failure(&self, message: impl Into<String>) {
        self.outcomes
            .lock()
            .push_back(MockOutcome::Fail(message.into()));
    }

    /// Every payload received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Payload> {
        self.calls.lock().clone()
    }

    /// Number of payloads received so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

impl Transport for MockTransport {
    fn post(&self, payload: Payload) -> Result<Response> {
        self.calls.lock().push(payload);
        match self.outcomes.lock().pop_front() {
            Some(MockOutcome::Respond(response)) => Ok(response),
            Some(MockOutcome::Fail(message)) => Err(Error::Transport(message.into())),
            None => Ok(Response {
                status: 204,
                body: Vec::new(),
            }),
        }
    }
}
