//! HTTP transport abstraction
//!
//! `WingsConnection` never talks to the network directly; it builds a
//! [`TransportRequest`] and hands it to a [`Transport`]. The default
//! implementation is [`UreqTransport`], a blocking ureq agent. Tests and
//! embedders can substitute their own implementation.

use std::fmt;
use std::io::ErrorKind;
use std::time::Duration;

use strum::{AsRefStr, EnumIter};
use tracing::trace;
use ureq::Agent;

/// Upper bound on a single response body (raw file downloads included)
const MAX_RESPONSE_BYTES: u64 = 256 * 1024 * 1024;

/// HTTP verbs used against the daemon
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, AsRefStr)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Outgoing request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestBody {
    Empty,
    /// Already-serialized JSON document
    Json(String),
    /// Unencoded payload (file contents, plain text)
    Raw(String),
}

impl RequestBody {
    pub fn as_str(&self) -> &str {
        match self {
            RequestBody::Empty => "",
            RequestBody::Json(s) | RequestBody::Raw(s) => s,
        }
    }
}

/// A fully resolved request: absolute URL, merged headers, encoded body
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: RequestBody,
    pub timeout: Duration,
}

impl TransportRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Status and body of a completed exchange, whatever the status
#[derive(Debug, Clone, Default)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Failures below the HTTP layer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// DNS, refused/reset connection, timeout
    Connect(String),
    /// The request could not be built or the exchange broke mid-way
    Request(String),
    Other(String),
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "{}", msg),
            TransportError::Request(msg) => write!(f, "{}", msg),
            TransportError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

/// Sends one request and returns the raw outcome.
///
/// Implementations must return `Ok` for every response that carried an HTTP
/// status, including 4xx and 5xx. Status interpretation belongs to the
/// connection.
pub trait Transport: Send + Sync {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError>;

    /// Transport name (for logs)
    fn name(&self) -> &'static str;
}

/// Blocking transport backed by a ureq [`Agent`]
pub struct UreqTransport {
    agent: Agent,
    timeout: Duration,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        Self {
            agent: build_agent(timeout),
            timeout,
        }
    }

    /// Agent for this request; a one-off agent when the timeout is overridden
    fn agent_for(&self, timeout: Duration) -> Agent {
        if timeout == self.timeout {
            self.agent.clone()
        } else {
            build_agent(timeout)
        }
    }
}

fn build_agent(timeout: Duration) -> Agent {
    Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_with_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    body: &RequestBody,
) -> Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match body {
        RequestBody::Empty => builder.send_empty(),
        RequestBody::Json(s) | RequestBody::Raw(s) => builder.send(s.as_bytes()),
    }
}

/// 将 ureq 错误归类为连接/请求/其他
fn classify(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(_) | ureq::Error::HostNotFound | ureq::Error::ConnectionFailed => {
            TransportError::Connect(err.to_string())
        }
        ureq::Error::Io(ref io) => match io.kind() {
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected
            | ErrorKind::AddrNotAvailable
            | ErrorKind::TimedOut => TransportError::Connect(err.to_string()),
            _ => TransportError::Request(err.to_string()),
        },
        ureq::Error::StatusCode(_)
        | ureq::Error::Http(_)
        | ureq::Error::BadUri(_)
        | ureq::Error::Protocol(_)
        | ureq::Error::TooManyRedirects
        | ureq::Error::RedirectFailed
        | ureq::Error::BodyExceedsLimit(_)
        | ureq::Error::Tls(_) => TransportError::Request(err.to_string()),
        other => TransportError::Other(other.to_string()),
    }
}

impl Transport for UreqTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        let agent = self.agent_for(request.timeout);
        let url = request.url.as_str();
        let headers = request.headers.as_slice();

        let result = match request.method {
            Method::Get => with_headers(agent.get(url), headers).call(),
            Method::Delete => with_headers(agent.delete(url), headers).call(),
            Method::Post => send_with_body(with_headers(agent.post(url), headers), &request.body),
            Method::Put => send_with_body(with_headers(agent.put(url), headers), &request.body),
            Method::Patch => {
                send_with_body(with_headers(agent.patch(url), headers), &request.body)
            }
        };

        let mut response = result.map_err(classify)?;
        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(MAX_RESPONSE_BYTES)
            .read_to_vec()
            .map_err(classify)?;

        trace!(
            "{} {} -> {} ({} bytes)",
            request.method,
            request.url,
            status,
            body.len()
        );

        Ok(TransportResponse { status, body })
    }

    fn name(&self) -> &'static str {
        "ureq"
    }
}
