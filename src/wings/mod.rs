//! Wings daemon client
//!
//! ```text
//! Wings ─┬─ WingsConnection ── Transport (ureq / mock)
//!        └─ services: system, server, files, backups, transfers, websocket
//! ```
//!
//! A `Wings` value is cheap to build and meant to live for one request.

pub mod connection;
pub mod response;
pub mod services;
pub mod token;
pub mod transport;

pub use connection::{DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, WingsConnection};
pub use response::{ResponseData, WingsResponse};
pub use services::{
    BackupService, FileService, PowerAction, ServerService, SystemService, TransferService,
    WebsocketService,
};
pub use token::TokenGenerator;
pub use transport::{Transport, TransportError, TransportRequest, TransportResponse, UreqTransport};

use std::sync::Arc;

use crate::config::{NodeConfig, NodeRecord, Scheme};

/// Client handle for one Wings node
#[derive(Debug)]
pub struct Wings {
    connection: WingsConnection,
}

impl Wings {
    pub fn new(host: &str, port: u16, scheme: Scheme, token: &str, timeout_secs: u64) -> Self {
        Self {
            connection: WingsConnection::new(host, port, scheme, token, timeout_secs),
        }
    }

    /// Build from the node row the panel stores
    pub fn from_node(node: &NodeRecord, timeout_secs: u64) -> Self {
        Self::new(
            &node.fqdn,
            node.daemon_listen,
            node.scheme,
            &node.daemon_token,
            timeout_secs,
        )
    }

    pub fn from_config(node: &NodeConfig) -> Self {
        Self::new(&node.host, node.port, node.scheme, &node.token, node.timeout_secs)
    }

    pub fn with_transport(self, transport: Arc<dyn Transport>) -> Self {
        Self {
            connection: self.connection.with_transport(transport),
        }
    }

    pub fn connection(&self) -> &WingsConnection {
        &self.connection
    }

    pub fn system(&self) -> SystemService<'_> {
        SystemService::new(&self.connection)
    }

    pub fn server(&self) -> ServerService<'_> {
        ServerService::new(&self.connection)
    }

    pub fn files(&self) -> FileService<'_> {
        FileService::new(&self.connection)
    }

    pub fn backups(&self) -> BackupService<'_> {
        BackupService::new(&self.connection)
    }

    pub fn transfers(&self) -> TransferService<'_> {
        TransferService::new(&self.connection)
    }

    pub fn websocket(&self) -> WebsocketService<'_> {
        WebsocketService::new(&self.connection)
    }

    pub fn test_connection(&self) -> bool {
        self.connection.test_connection()
    }

    pub fn set_auth_token(&mut self, token: impl Into<String>) {
        self.connection.set_auth_token(token);
    }

    pub fn auth_token(&self) -> &str {
        self.connection.auth_token()
    }

    pub fn token_generator(&self) -> &TokenGenerator {
        self.connection.token_generator()
    }

    pub fn token_generator_mut(&mut self) -> &mut TokenGenerator {
        self.connection.token_generator_mut()
    }
}
