//! Signed, short-lived tokens for daemon endpoints that are reached without
//! the bearer token: backup/file downloads, file uploads, server transfers
//! and the console websocket.

use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{Result, WingsError};
use crate::utils::{encode_query_value, generate_jti, generate_unique_id, trim_base_url};

/// Default token lifetime: 15 minutes
pub const DEFAULT_EXPIRATION_SECS: i64 = 900;

/// Backup download claims (`/download/backup`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupDownloadClaims {
    pub server_uuid: String,
    pub backup_uuid: String,
    pub unique_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// File download claims (`/download/file`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDownloadClaims {
    pub file_path: String,
    pub server_uuid: String,
    pub unique_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// File upload claims (`/upload/file`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileUploadClaims {
    pub server_uuid: String,
    pub user_uuid: String,
    pub unique_id: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Server transfer claims; `subject` is the server uuid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferClaims {
    pub subject: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// Console websocket claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsocketClaims {
    pub user_uuid: String,
    pub server_uuid: String,
    pub permissions: Vec<String>,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// `iat`/`exp`/`jti` shared by every token
struct Stamp {
    iat: i64,
    exp: i64,
    jti: String,
}

/// Token generator for Wings signed URLs
#[derive(Debug, Clone)]
pub struct TokenGenerator {
    secret: String,
    algorithm: Algorithm,
    expiration: i64,
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new("")
    }
}

impl TokenGenerator {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: Algorithm::HS256,
            expiration: DEFAULT_EXPIRATION_SECS,
        }
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Lifetime in seconds; negative values produce already-expired tokens
    pub fn with_expiration(mut self, seconds: i64) -> Self {
        self.expiration = seconds;
        self
    }

    pub fn set_secret(&mut self, secret: impl Into<String>) {
        self.secret = secret.into();
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub fn set_algorithm(&mut self, algorithm: Algorithm) {
        self.algorithm = algorithm;
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn set_expiration(&mut self, seconds: i64) {
        self.expiration = seconds;
    }

    pub fn expiration(&self) -> i64 {
        self.expiration
    }

    fn stamp(&self) -> Stamp {
        let iat = Utc::now().timestamp();
        Stamp {
            iat,
            exp: iat.saturating_add(self.expiration),
            jti: generate_jti(),
        }
    }

    fn encode_claims<T: Serialize>(&self, claims: &T) -> Result<String> {
        if self.secret.is_empty() {
            return Err(WingsError::token_configuration("JWT secret is not set"));
        }

        let key = EncodingKey::from_secret(self.secret.as_bytes());
        encode(&Header::new(self.algorithm), claims, &key).map_err(|e| {
            WingsError::token_configuration(format!("Failed to encode token: {}", e))
        })
    }

    pub fn generate_backup_download_token(
        &self,
        server_uuid: &str,
        backup_uuid: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let Stamp { iat, exp, jti } = self.stamp();
        self.encode_claims(&BackupDownloadClaims {
            server_uuid: server_uuid.to_string(),
            backup_uuid: backup_uuid.to_string(),
            unique_id: resolve_unique_id(unique_id),
            iat,
            exp,
            jti,
        })
    }

    pub fn generate_file_download_token(
        &self,
        server_uuid: &str,
        file_path: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let Stamp { iat, exp, jti } = self.stamp();
        self.encode_claims(&FileDownloadClaims {
            file_path: file_path.to_string(),
            server_uuid: server_uuid.to_string(),
            unique_id: resolve_unique_id(unique_id),
            iat,
            exp,
            jti,
        })
    }

    pub fn generate_file_upload_token(
        &self,
        server_uuid: &str,
        user_uuid: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let Stamp { iat, exp, jti } = self.stamp();
        self.encode_claims(&FileUploadClaims {
            server_uuid: server_uuid.to_string(),
            user_uuid: user_uuid.to_string(),
            unique_id: resolve_unique_id(unique_id),
            iat,
            exp,
            jti,
        })
    }

    pub fn generate_transfer_token(&self, server_uuid: &str) -> Result<String> {
        let Stamp { iat, exp, jti } = self.stamp();
        self.encode_claims(&TransferClaims {
            subject: server_uuid.to_string(),
            iat,
            exp,
            jti,
        })
    }

    pub fn generate_websocket_token(
        &self,
        server_uuid: &str,
        user_uuid: &str,
        permissions: &[String],
    ) -> Result<String> {
        let Stamp { iat, exp, jti } = self.stamp();
        self.encode_claims(&WebsocketClaims {
            user_uuid: user_uuid.to_string(),
            server_uuid: server_uuid.to_string(),
            permissions: permissions.to_vec(),
            iat,
            exp,
            jti,
        })
    }

    /// `{base}/download/backup?token=..&server=..&backup=..`
    pub fn generate_backup_download_url(
        &self,
        base_url: &str,
        server_uuid: &str,
        backup_uuid: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let token = self.generate_backup_download_token(server_uuid, backup_uuid, unique_id)?;
        Ok(format!(
            "{}/download/backup?token={}&server={}&backup={}",
            trim_base_url(base_url),
            token,
            server_uuid,
            backup_uuid
        ))
    }

    /// `{base}/download/file?token=..&server=..&file=..`, file path percent-encoded
    pub fn generate_file_download_url(
        &self,
        base_url: &str,
        server_uuid: &str,
        file_path: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let token = self.generate_file_download_token(server_uuid, file_path, unique_id)?;
        Ok(format!(
            "{}/download/file?token={}&server={}&file={}",
            trim_base_url(base_url),
            token,
            server_uuid,
            encode_query_value(file_path)
        ))
    }

    /// `{base}/upload/file?token=..&server=..`
    pub fn generate_file_upload_url(
        &self,
        base_url: &str,
        server_uuid: &str,
        user_uuid: &str,
        unique_id: Option<&str>,
    ) -> Result<String> {
        let token = self.generate_file_upload_token(server_uuid, user_uuid, unique_id)?;
        Ok(format!(
            "{}/upload/file?token={}&server={}",
            trim_base_url(base_url),
            token,
            server_uuid
        ))
    }

    /// `ws(s)://host:port/api/servers/{uuid}/ws?token=..`
    pub fn generate_websocket_url(
        &self,
        base_url: &str,
        server_uuid: &str,
        user_uuid: &str,
        permissions: &[String],
    ) -> Result<String> {
        let token = self.generate_websocket_token(server_uuid, user_uuid, permissions)?;
        Ok(format!(
            "{}/api/servers/{}/ws?token={}",
            to_websocket_scheme(trim_base_url(base_url)),
            server_uuid,
            token
        ))
    }

    /// Verify signature and expiry, returning the raw claim map
    pub fn decode_token(&self, token: &str) -> Result<Map<String, Value>> {
        self.decode_claims(token)
    }

    /// Verify signature and expiry, decoding into a typed claim struct
    pub fn decode_claims<T: DeserializeOwned>(&self, token: &str) -> Result<T> {
        if self.secret.is_empty() {
            return Err(WingsError::token_configuration("JWT secret is not set"));
        }

        let mut validation = Validation::new(self.algorithm);
        validation.leeway = 0;

        let key = DecodingKey::from_secret(self.secret.as_bytes());
        let data = decode::<T>(token, &key, &validation)?;
        Ok(data.claims)
    }

    /// `true` when the token cannot be verified or its `exp` has passed
    pub fn is_token_expired(&self, token: &str) -> bool {
        match self.decode_token(token) {
            Ok(claims) => claims
                .get("exp")
                .and_then(Value::as_i64)
                .is_some_and(|exp| exp < Utc::now().timestamp()),
            Err(_) => true,
        }
    }

    /// `exp` claim, or `None` if the token does not verify
    pub fn get_token_expiration(&self, token: &str) -> Option<i64> {
        self.decode_token(token)
            .ok()
            .and_then(|claims| claims.get("exp").and_then(Value::as_i64))
    }
}

fn resolve_unique_id(unique_id: Option<&str>) -> String {
    match unique_id {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate_unique_id(),
    }
}

fn to_websocket_scheme(base_url: &str) -> String {
    if let Some(rest) = base_url.strip_prefix("https://") {
        format!("wss://{}", rest)
    } else if let Some(rest) = base_url.strip_prefix("http://") {
        format!("ws://{}", rest)
    } else {
        base_url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test_secret_key_32_bytes_long!!";

    fn create_test_generator() -> TokenGenerator {
        TokenGenerator::new(SECRET)
    }

    #[test]
    fn test_defaults() {
        let generator = create_test_generator();
        assert_eq!(generator.algorithm(), Algorithm::HS256);
        assert_eq!(generator.expiration(), 900);
        assert_eq!(generator.secret(), SECRET);
    }

    #[test]
    fn test_backup_download_round_trip() {
        let generator = create_test_generator();
        let token = generator
            .generate_backup_download_token("srv", "bak", Some("req-1"))
            .unwrap();
        let claims: BackupDownloadClaims = generator.decode_claims(&token).unwrap();

        assert_eq!(claims.server_uuid, "srv");
        assert_eq!(claims.backup_uuid, "bak");
        assert_eq!(claims.unique_id, "req-1");
        assert_eq!(claims.exp - claims.iat, 900);
        assert_eq!(claims.jti.len(), 32);
    }

    #[test]
    fn test_unique_id_generated_when_absent() {
        let generator = create_test_generator();
        for unique_id in [None, Some("")] {
            let token = generator
                .generate_file_upload_token("srv", "user", unique_id)
                .unwrap();
            let claims: FileUploadClaims = generator.decode_claims(&token).unwrap();
            assert!(claims.unique_id.starts_with("wings_"), "got: {}", claims.unique_id);
        }
    }

    #[test]
    fn test_extreme_expiration_saturates() {
        let generator = create_test_generator().with_expiration(i64::MAX);
        let token = generator.generate_transfer_token("srv").unwrap();
        let claims: TransferClaims = generator.decode_claims(&token).unwrap();
        assert_eq!(claims.exp, i64::MAX);
        assert!(!generator.is_token_expired(&token));

        let generator = create_test_generator().with_expiration(i64::MIN);
        let token = generator.generate_transfer_token("srv").unwrap();
        assert!(generator.is_token_expired(&token));
    }

    #[test]
    fn test_empty_secret_rejected() {
        let generator = TokenGenerator::default();
        let err = generator.generate_transfer_token("srv").unwrap_err();
        assert_eq!(err, WingsError::token_configuration("JWT secret is not set"));

        let err = generator.decode_token("a.b.c").unwrap_err();
        assert!(matches!(err, WingsError::TokenConfiguration(_)));
    }

    #[test]
    fn test_mismatched_algorithm_fails_to_encode() {
        let generator = create_test_generator().with_algorithm(Algorithm::RS256);
        let err = generator.generate_transfer_token("srv").unwrap_err();
        assert!(matches!(err, WingsError::TokenConfiguration(_)));
        assert!(err.message().starts_with("Failed to encode token: "));
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_test_generator()
            .generate_transfer_token("srv")
            .unwrap();
        let other = TokenGenerator::new("different_secret_key_32_bytes!!");

        let err = other.decode_token(&token).unwrap_err();
        assert!(matches!(err, WingsError::TokenDecode(_)));
        assert!(other.is_token_expired(&token));
        assert_eq!(other.get_token_expiration(&token), None);
    }

    #[test]
    fn test_websocket_scheme_rewrite() {
        assert_eq!(to_websocket_scheme("https://node1:8080"), "wss://node1:8080");
        assert_eq!(to_websocket_scheme("http://node1:8080"), "ws://node1:8080");
        assert_eq!(to_websocket_scheme("node1:8080"), "node1:8080");
    }

    #[test]
    fn test_file_download_url_encodes_path() {
        let generator = create_test_generator();
        let url = generator
            .generate_file_download_url("http://node1:8080/", "srv", "/logs/latest log.txt", None)
            .unwrap();
        assert!(url.starts_with("http://node1:8080/download/file?token="), "got: {}", url);
        assert!(url.ends_with("&server=srv&file=%2Flogs%2Flatest%20log.txt"), "got: {}", url);
    }
}
