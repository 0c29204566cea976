//! 测试公共工具：可录制请求的 mock Transport
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use wings_client::config::Scheme;
use wings_client::wings::{
    Transport, TransportError, TransportRequest, TransportResponse, Wings, WingsConnection,
};

pub const HOST: &str = "10.0.0.5";
pub const PORT: u16 = 8080;
pub const TOKEN: &str = "abc";

type Reply = Result<TransportResponse, TransportError>;

/// Returns queued replies in order, then the fallback reply forever.
/// Every request is recorded.
pub struct MockTransport {
    queue: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    requests: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn replying(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Ok(TransportResponse::new(status, body)),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(err: TransportError) -> Arc<Self> {
        Arc::new(Self {
            queue: Mutex::new(VecDeque::new()),
            fallback: Err(err),
            requests: Mutex::new(Vec::new()),
        })
    }

    pub fn push(&self, status: u16, body: &str) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse::new(status, body)));
    }

    pub fn push_bytes(&self, status: u16, body: &[u8]) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(TransportResponse::new(status, body)));
    }

    pub fn requests(&self) -> Vec<TransportRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> TransportRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: &TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request.clone());
        match self.queue.lock().unwrap().pop_front() {
            Some(reply) => reply,
            None => self.fallback.clone(),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

pub fn mock_connection(transport: &Arc<MockTransport>) -> WingsConnection {
    let transport: Arc<dyn Transport> = transport.clone();
    WingsConnection::new(HOST, PORT, Scheme::Http, TOKEN, 30).with_transport(transport)
}

pub fn mock_wings(transport: &Arc<MockTransport>) -> Wings {
    let transport: Arc<dyn Transport> = transport.clone();
    Wings::new(HOST, PORT, Scheme::Http, TOKEN, 30).with_transport(transport)
}

/// Parse the JSON body of a recorded request
pub fn json_body(request: &TransportRequest) -> serde_json::Value {
    serde_json::from_str(request.body.as_str()).expect("request body is not JSON")
}
