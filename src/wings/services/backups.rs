use serde_json::{Value, json};

use crate::errors::Result;
use crate::wings::{WingsConnection, WingsResponse};

use super::{NO_CONTENT, OK, server_endpoint};

/// Backup endpoints under `/api/servers/{uuid}/backup`
pub struct BackupService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> BackupService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    /// Start a backup; `ignore` is a newline separated list of patterns
    pub fn create(
        &self,
        server_uuid: &str,
        adapter: &str,
        backup_uuid: &str,
        ignore: Option<&str>,
    ) -> Result<WingsResponse> {
        let mut body = json!({ "adapter": adapter, "uuid": backup_uuid });
        if let Some(ignore) = ignore.filter(|i| !i.is_empty()) {
            body["ignore"] = Value::from(ignore);
        }

        let data = self
            .connection
            .post(&server_endpoint(server_uuid, "/backup"), &body, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// `download_url` is required by remote (s3) adapters
    pub fn restore(
        &self,
        server_uuid: &str,
        backup_uuid: &str,
        adapter: &str,
        truncate_directory: bool,
        download_url: Option<&str>,
    ) -> Result<WingsResponse> {
        let mut body = json!({
            "adapter": adapter,
            "truncate_directory": truncate_directory,
        });
        if let Some(url) = download_url.filter(|u| !u.is_empty()) {
            body["download_url"] = Value::from(url);
        }

        let endpoint = server_endpoint(server_uuid, &format!("/backup/{}/restore", backup_uuid));
        let data = self.connection.post(&endpoint, &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn delete(&self, server_uuid: &str, backup_uuid: &str) -> Result<WingsResponse> {
        let endpoint = server_endpoint(server_uuid, &format!("/backup/{}", backup_uuid));
        let data = self.connection.delete(&endpoint, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    /// Signed `/download/backup` URL on this node
    pub fn download_url(
        &self,
        server_uuid: &str,
        backup_uuid: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        self.connection.token_generator().generate_backup_download_url(
            self.connection.base_url(),
            server_uuid,
            backup_uuid,
            unique_id,
        )
    }
}
