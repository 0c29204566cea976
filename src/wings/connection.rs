//! Authenticated HTTP access to one Wings daemon.
//!
//! Every verb goes through [`WingsConnection::request`]: merge headers, hand
//! the request to the [`Transport`], map status >= 400 onto [`WingsError`],
//! decode the body. Bodies are decoded leniently; anything that is not a JSON
//! object or array becomes an empty map.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use super::response::{ResponseData, error_message};
use super::token::TokenGenerator;
use super::transport::{
    Method, RequestBody, Transport, TransportError, TransportRequest, TransportResponse,
    UreqTransport,
};
use crate::config::Scheme;
use crate::errors::{Result, WingsError};
use crate::utils::trim_base_url;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("wings-client/", env!("CARGO_PKG_VERSION"));

pub struct WingsConnection {
    base_url: String,
    auth_token: String,
    timeout: Duration,
    token_generator: TokenGenerator,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for WingsConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WingsConnection")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("transport", &self.transport.name())
            .finish_non_exhaustive()
    }
}

impl WingsConnection {
    /// The token generator is seeded with `auth_token` as its signing secret.
    pub fn new(
        host: &str,
        port: u16,
        scheme: Scheme,
        auth_token: &str,
        timeout_secs: u64,
    ) -> Self {
        let timeout = Duration::from_secs(timeout_secs);
        Self {
            base_url: format!("{}://{}:{}", scheme, trim_base_url(host), port),
            auth_token: auth_token.to_string(),
            timeout,
            token_generator: TokenGenerator::new(auth_token),
            transport: Arc::new(UreqTransport::new(timeout)),
        }
    }

    pub fn with_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn auth_token(&self) -> &str {
        &self.auth_token
    }

    /// Affects requests issued after this call only
    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.auth_token = token.into();
    }

    pub fn token_generator(&self) -> &TokenGenerator {
        &self.token_generator
    }

    pub fn token_generator_mut(&mut self) -> &mut TokenGenerator {
        &mut self.token_generator
    }

    pub fn get(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<ResponseData> {
        let response = self.request(Method::Get, endpoint, RequestBody::Empty, headers, None)?;
        Ok(decode_body(&response.body))
    }

    /// GET returning the body bytes untouched (file contents, archives)
    pub fn get_raw(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self.request(Method::Get, endpoint, RequestBody::Empty, headers, None)?;
        Ok(response.body)
    }

    pub fn post(&self, endpoint: &str, data: &Value, headers: &[(&str, &str)]) -> Result<ResponseData> {
        self.send_json(Method::Post, endpoint, data, headers, None)
    }

    /// POST with a per-request timeout (archive operations)
    pub fn post_with_timeout(
        &self,
        endpoint: &str,
        data: &Value,
        headers: &[(&str, &str)],
        timeout: Duration,
    ) -> Result<ResponseData> {
        self.send_json(Method::Post, endpoint, data, headers, Some(timeout))
    }

    pub fn put(&self, endpoint: &str, data: &Value, headers: &[(&str, &str)]) -> Result<ResponseData> {
        self.send_json(Method::Put, endpoint, data, headers, None)
    }

    pub fn patch(&self, endpoint: &str, data: &Value, headers: &[(&str, &str)]) -> Result<ResponseData> {
        self.send_json(Method::Patch, endpoint, data, headers, None)
    }

    pub fn delete(&self, endpoint: &str, headers: &[(&str, &str)]) -> Result<ResponseData> {
        let response = self.request(Method::Delete, endpoint, RequestBody::Empty, headers, None)?;
        Ok(decode_body(&response.body))
    }

    /// POST an unencoded body; `Content-Type: text/plain` unless the caller sets one
    pub fn post_raw(&self, endpoint: &str, body: &str, headers: &[(&str, &str)]) -> Result<ResponseData> {
        let mut merged: Vec<(&str, &str)> = vec![("Content-Type", "text/plain")];
        merged.extend_from_slice(headers);

        let response = self.request(
            Method::Post,
            endpoint,
            RequestBody::Raw(body.to_string()),
            &merged,
            None,
        )?;
        Ok(decode_body(&response.body))
    }

    /// `GET /api/system`; any failure reads as `false`
    pub fn test_connection(&self) -> bool {
        match self.get("/api/system", &[]) {
            Ok(_) => true,
            Err(e) => {
                debug!("Connection test against {} failed: {}", self.base_url, e);
                false
            }
        }
    }

    /// `/api/system`, or `/api/system?v=2` for the detailed payload
    pub fn system_info(&self, detailed: bool) -> Result<ResponseData> {
        let endpoint = if detailed {
            "/api/system?v=2"
        } else {
            "/api/system"
        };
        self.get(endpoint, &[])
    }

    pub fn system_ips(&self) -> Result<ResponseData> {
        self.get("/api/system/ips", &[])
    }

    fn send_json(
        &self,
        method: Method,
        endpoint: &str,
        data: &Value,
        headers: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<ResponseData> {
        let response = self.request(method, endpoint, json_body(data)?, headers, timeout)?;
        Ok(decode_body(&response.body))
    }

    /// Send one request and apply status mapping
    pub fn request(
        &self,
        method: Method,
        endpoint: &str,
        body: RequestBody,
        headers: &[(&str, &str)],
        timeout: Option<Duration>,
    ) -> Result<TransportResponse> {
        let request = TransportRequest {
            method,
            url: format!("{}{}", self.base_url, endpoint),
            headers: self.merge_headers(headers),
            body,
            timeout: timeout.unwrap_or(self.timeout),
        };

        debug!("{} {} via {}", request.method, request.url, self.transport.name());

        let response = self
            .transport
            .send(&request)
            .map_err(map_transport_error)?;

        if response.status >= 400 {
            let err = map_status(response.status, &decode_body(&response.body), endpoint);
            warn!("{} {} failed: {}", request.method, endpoint, err);
            return Err(err);
        }

        Ok(response)
    }

    /// Defaults first; caller headers replace defaults of the same name
    fn merge_headers(&self, extra: &[(&str, &str)]) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = vec![
            ("Accept".into(), "application/json".into()),
            ("User-Agent".into(), USER_AGENT.into()),
            ("Content-Type".into(), "application/json".into()),
        ];
        if !self.auth_token.is_empty() {
            headers.push(("Authorization".into(), format!("Bearer {}", self.auth_token)));
        }

        for (name, value) in extra {
            match headers
                .iter_mut()
                .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            {
                Some(slot) => slot.1 = value.to_string(),
                None => headers.push((name.to_string(), value.to_string())),
            }
        }
        headers
    }
}

/// `{}` for null or an empty object, otherwise the serialized value
fn json_body(data: &Value) -> Result<RequestBody> {
    let is_empty = match data {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(RequestBody::Json("{}".to_string()));
    }

    serde_json::to_string(data)
        .map(RequestBody::Json)
        .map_err(|e| WingsError::connection(format!("Unexpected error: {}", e)))
}

/// Lenient body decoding
pub(crate) fn decode_body(body: &[u8]) -> ResponseData {
    if body.is_empty() {
        return Map::new();
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => map,
        Ok(Value::Array(items)) => items
            .into_iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), v))
            .collect(),
        Ok(other) => {
            trace!("Ignoring non-object response body: {}", other);
            Map::new()
        }
        Err(e) => {
            trace!("Response body is not JSON ({} bytes): {}", body.len(), e);
            Map::new()
        }
    }
}

fn map_status(status: u16, data: &ResponseData, endpoint: &str) -> WingsError {
    let err = error_message(data);
    match status {
        401 => WingsError::authentication(format!("Authentication failed: {}", err)),
        403 => WingsError::authentication(format!("Access forbidden: {}", err)),
        404 => WingsError::request(format!("Endpoint not found: {}", endpoint)),
        429 => WingsError::request(format!("Rate limit exceeded: {}", err)),
        500 => WingsError::request(format!("Server error: {}", err)),
        _ => WingsError::request(format!("HTTP {}: {}", status, err)),
    }
}

fn map_transport_error(err: TransportError) -> WingsError {
    let message = match err {
        TransportError::Connect(msg) => format!("Connection failed: {}", msg),
        TransportError::Request(msg) => format!("Request failed: {}", msg),
        TransportError::Other(msg) => format!("Unexpected error: {}", msg),
    };
    warn!("{}", message);
    WingsError::connection(message)
}
