use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};

use crate::errors::{Result, WingsError};
use crate::utils::encode_query_value;
use crate::wings::{WingsConnection, WingsResponse};

use super::{NO_CONTENT, OK, server_endpoint};

/// Archive operations can run far longer than a normal request
pub const ARCHIVE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// One entry of a rename request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameEntry {
    pub from: String,
    pub to: String,
}

/// One entry of a chmod request; `mode` is octal, e.g. `"644"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChmodEntry {
    pub file: String,
    pub mode: String,
}

/// Optional parts of a compress request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    /// Archive name; the daemon picks one when absent
    pub name: Option<String>,
    /// zip, tar.gz, tgz, tar.bz2, tbz2, tar.xz or txz
    pub extension: String,
    pub timeout: Duration,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            name: None,
            extension: "tar.gz".to_string(),
            timeout: ARCHIVE_TIMEOUT,
        }
    }
}

/// Remote download into the server's filesystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PullOptions {
    pub url: String,
    pub root: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Block until the download finishes
    pub foreground: bool,
    /// Take the file name from `Content-Disposition`
    pub use_header: bool,
}

impl PullOptions {
    pub fn new(url: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            root: root.into(),
            file_name: None,
            foreground: false,
            use_header: true,
        }
    }
}

/// File manager endpoints under `/api/servers/{uuid}/files`
pub struct FileService<'a> {
    connection: &'a WingsConnection,
}

impl<'a> FileService<'a> {
    pub fn new(connection: &'a WingsConnection) -> Self {
        Self { connection }
    }

    fn endpoint(server_uuid: &str, action: &str) -> String {
        server_endpoint(server_uuid, &format!("/files/{}", action))
    }

    pub fn list_directory(&self, server_uuid: &str, directory: &str) -> Result<WingsResponse> {
        let endpoint = Self::endpoint(
            server_uuid,
            &format!("list-directory?directory={}", encode_query_value(directory)),
        );
        let data = self.connection.get(&endpoint, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    fn contents_endpoint(server_uuid: &str, file: &str, download: bool) -> String {
        Self::endpoint(
            server_uuid,
            &format!("contents?file={}&download={}", encode_query_value(file), download),
        )
    }

    /// File contents decoded as JSON; other files come back empty, see [`Self::contents_raw`]
    pub fn contents(&self, server_uuid: &str, file: &str, download: bool) -> Result<WingsResponse> {
        let endpoint = Self::contents_endpoint(server_uuid, file, download);
        let data = self.connection.get(&endpoint, &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// Exact file bytes
    pub fn contents_raw(&self, server_uuid: &str, file: &str, download: bool) -> Result<Vec<u8>> {
        let endpoint = Self::contents_endpoint(server_uuid, file, download);
        self.connection.get_raw(&endpoint, &[])
    }

    /// Lossy UTF-8 view of a text file; invalid sequences become U+FFFD
    pub fn contents_text(&self, server_uuid: &str, file: &str) -> Result<String> {
        let bytes = self.contents_raw(server_uuid, file, false)?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }

    pub fn download(&self, server_uuid: &str, file: &str) -> Result<Vec<u8>> {
        self.contents_raw(server_uuid, file, true)
    }

    /// Overwrite (or create) `file` with `content`, sent unencoded
    pub fn write(&self, server_uuid: &str, file: &str, content: &str) -> Result<WingsResponse> {
        let endpoint = Self::endpoint(
            server_uuid,
            &format!("write?file={}", encode_query_value(file)),
        );
        let data = self
            .connection
            .post_raw(&endpoint, content, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn rename(&self, server_uuid: &str, root: &str, files: &[RenameEntry]) -> Result<WingsResponse> {
        let body = json!({ "root": root, "files": files });
        let data = self
            .connection
            .put(&Self::endpoint(server_uuid, "rename"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn copy(&self, server_uuid: &str, location: &str, files: &[String]) -> Result<WingsResponse> {
        let body = json!({ "location": location, "files": files });
        let data = self
            .connection
            .post(&Self::endpoint(server_uuid, "copy"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn delete(&self, server_uuid: &str, root: &str, files: &[String]) -> Result<WingsResponse> {
        let body = json!({ "root": root, "files": files });
        let data = self
            .connection
            .post(&Self::endpoint(server_uuid, "delete"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn create_directory(&self, server_uuid: &str, name: &str, path: &str) -> Result<WingsResponse> {
        let body = json!({ "name": name, "path": path });
        let data = self
            .connection
            .post(&Self::endpoint(server_uuid, "create-directory"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    /// Pack `files` (relative to `root`) into a single archive.
    ///
    /// Blank names are dropped; if nothing is left no request is sent.
    pub fn compress(
        &self,
        server_uuid: &str,
        root: &str,
        files: &[String],
        options: &CompressOptions,
    ) -> Result<WingsResponse> {
        let files: Vec<&str> = files
            .iter()
            .map(String::as_str)
            .filter(|f| !f.trim().is_empty())
            .collect();
        if files.is_empty() {
            return Err(WingsError::request("No valid file names provided"));
        }

        let mut body = json!({ "root": root, "files": files });
        if let Some(name) = options.name.as_deref().filter(|n| !n.is_empty()) {
            body["name"] = Value::from(name);
        }
        if !options.extension.is_empty() {
            body["extension"] = Value::from(options.extension.as_str());
        }

        let data = self.connection.post_with_timeout(
            &Self::endpoint(server_uuid, "compress"),
            &body,
            &[],
            options.timeout,
        )?;
        Ok(WingsResponse::new(data, OK))
    }

    pub fn decompress(
        &self,
        server_uuid: &str,
        file: &str,
        root: &str,
        timeout: Option<Duration>,
    ) -> Result<WingsResponse> {
        let body = json!({ "file": file, "root": root });
        let data = self.connection.post_with_timeout(
            &Self::endpoint(server_uuid, "decompress"),
            &body,
            &[],
            timeout.unwrap_or(ARCHIVE_TIMEOUT),
        )?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    pub fn chmod(&self, server_uuid: &str, root: &str, files: &[ChmodEntry]) -> Result<WingsResponse> {
        let body = json!({ "root": root, "files": files });
        let data = self
            .connection
            .post(&Self::endpoint(server_uuid, "chmod"), &body, &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    /// Remote downloads in progress
    pub fn pull_list(&self, server_uuid: &str) -> Result<WingsResponse> {
        let data = self.connection.get(&Self::endpoint(server_uuid, "pull"), &[])?;
        Ok(WingsResponse::new(data, OK))
    }

    /// 200 with the file object for foreground pulls, 204 otherwise
    pub fn pull(&self, server_uuid: &str, options: &PullOptions) -> Result<WingsResponse> {
        let body = serde_json::to_value(options)
            .map_err(|e| WingsError::request(format!("Invalid pull request: {}", e)))?;
        let data = self
            .connection
            .post(&Self::endpoint(server_uuid, "pull"), &body, &[])?;
        let status = if options.foreground { OK } else { NO_CONTENT };
        Ok(WingsResponse::new(data, status))
    }

    pub fn delete_pull(&self, server_uuid: &str, pull_id: &str) -> Result<WingsResponse> {
        let data = self
            .connection
            .delete(&Self::endpoint(server_uuid, &format!("pull/{}", pull_id)), &[])?;
        Ok(WingsResponse::new(data, NO_CONTENT))
    }

    /// Signed `/download/file` URL on this node
    pub fn download_url(&self, server_uuid: &str, file_path: &str) -> Result<String> {
        self.connection.token_generator().generate_file_download_url(
            self.connection.base_url(),
            server_uuid,
            file_path,
            None,
        )
    }

    /// Signed `/upload/file` URL on this node
    pub fn upload_url(&self, server_uuid: &str, user_uuid: &str) -> Result<String> {
        self.connection.token_generator().generate_file_upload_url(
            self.connection.base_url(),
            server_uuid,
            user_uuid,
            None,
        )
    }
}
