use serde_json::json;

use crate::errors::Result;
use crate::wings::{WingsConnection, WingsResponse};

use super::{NO_CONTENT, server_endpoint};

/// Console websocket credentials
pub struct WebsocketService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> WebsocketService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    pub fn token(&self, server_uuid: &str, user_uuid: &str, permissions: &[String]) -> Result<String> {
        self.connection
            .token_generator()
            .generate_websocket_token(server_uuid, user_uuid, permissions)
    }

    /// `ws(s)://.../api/servers/{uuid}/ws?token=...`
    pub fn url(&self, server_uuid: &str, user_uuid: &str, permissions: &[String]) -> Result<String> {
        self.connection.token_generator().generate_websocket_url(
            self.connection.base_url(),
            server_uuid,
            user_uuid,
            permissions,
        )
    }

    /// Revoke previously issued websocket tokens by `jti`
    pub fn deny_tokens(&self, server_uuid: &str, jtis: &[String]) -> Result<WingsResponse> {
        let body = json!({ "jtis": jtis });
        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/ws/deny"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }
}
