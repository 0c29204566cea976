use serde_json::Value;

use crate::errors::Result;
use crate::wings::{WingsConnection, WingsResponse};

use super::{NO_CONTENT, OK, server_endpoint};

/// Node-to-node server transfers
pub struct TransferService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> TransferService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    /// Kick off an outgoing transfer. `data` carries the destination `url`
    /// and a `token` signed for the receiving node.
    pub fn start(&self, server_uuid: &str, data: &Value) -> Result<WingsResponse> {
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/transfer"), data, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn cancel(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .delete(&server_endpoint(server_uuid, "/transfer"), &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    /// Transfer token signed with this node's generator
    pub fn token(&self, server_uuid: &str) -> Result<String> {
        self.connection
            .token_generator()
            .generate_transfer_token(server_uuid)
    }
}
