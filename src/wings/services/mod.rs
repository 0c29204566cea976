//! Per-area daemon services
//!
//! Each service borrows a [`WingsConnection`](super::WingsConnection) and maps
//! one method to one endpoint. Successful calls are wrapped in a
//! [`WingsResponse`](super::WingsResponse) carrying the status the daemon
//! documents for that endpoint.

mod backups;
mod files;
mod server;
mod system;
mod transfers;
mod websocket;

pub use backups::BackupService;
pub use files::{ChmodEntry, CompressOptions, FileService, PullOptions, RenameEntry};
pub use server::{PowerAction, ServerService};
pub use system::SystemService;
pub use transfers::TransferService;
pub use websocket::WebsocketService;

/// 200 OK
pub(crate) const OK: u16 = 200;
/// 201 Created
pub(crate) const CREATED: u16 = 201;
/// 202 Accepted
pub(crate) const ACCEPTED: u16 = 202;
/// 204 No Content
pub(crate) const NO_CONTENT: u16 = 204;

pub(crate) fn server_endpoint(server_uuid: &str, suffix: &str) -> String {
    format!("/api/servers/{}{}", server_uuid, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_endpoint() {
        assert_eq!(server_endpoint("abc", ""), "/api/servers/abc");
        assert_eq!(server_endpoint("abc", "/power"), "/api/servers/abc/power");
    }
}
