//! 配置加载测试
//!
//! TOML 文件读取、默认值回退以及示例配置生成。

use std::fs;

use jsonwebtoken::Algorithm;
use tempfile::TempDir;

use wings_client::config::{Scheme, WingsConfig};
use wings_client::wings::{DEFAULT_PORT, DEFAULT_TIMEOUT_SECS, TokenGenerator};

fn write_config(dir: &TempDir, content: &str) -> String {
    let path = dir.path().join("wings.toml");
    fs::write(&path, content).unwrap();
    path.to_string_lossy().into_owned()
}

// =============================================================================
// 加载
// =============================================================================

#[test]
fn test_try_load_from_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        r#"
[node]
host = "node1.example.com"
port = 2053
scheme = "https"
token = "daemon-token"
timeout_secs = 10

[tokens]
expiration_secs = 300
algorithm = "HS512"

[logging]
level = "debug"
format = "json"
"#,
    );

    let config = WingsConfig::try_load(&path).unwrap();
    assert_eq!(config.node.host, "node1.example.com");
    assert_eq!(config.node.port, 2053);
    assert_eq!(config.node.scheme, Scheme::Https);
    assert_eq!(config.node.token, "daemon-token");
    assert_eq!(config.node.timeout_secs, 10);
    assert_eq!(config.tokens.expiration_secs, 300);
    assert_eq!(config.tokens.algorithm, Algorithm::HS512);
    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.logging.file, None);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[node]\nhost = \"10.0.0.5\"\n");

    let config = WingsConfig::try_load(&path).unwrap();
    assert_eq!(config.node.host, "10.0.0.5");
    assert_eq!(config.node.port, DEFAULT_PORT);
    assert_eq!(config.node.scheme, Scheme::Http);
    assert_eq!(config.node.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.tokens.expiration_secs, 900);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_missing_file_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let config = WingsConfig::load(Some(path.to_str().unwrap()));
    assert_eq!(config.node.host, "127.0.0.1");
    assert_eq!(config.node.port, DEFAULT_PORT);
    assert!(config.node.token.is_empty());
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[node]\nport = \"not-a-port\"\n");

    assert!(WingsConfig::try_load(&path).is_err());

    let config = WingsConfig::load(Some(&path));
    assert_eq!(config.node.port, DEFAULT_PORT);
}

// =============================================================================
// 保存与示例
// =============================================================================

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("wings.toml");

    let mut config = WingsConfig::default();
    config.node.host = "node2.example.com".into();
    config.node.scheme = Scheme::Https;
    config.tokens.algorithm = Algorithm::HS384;
    config.logging.file = Some("logs/wingsctl.log".into());
    config.save_to_file(&path).unwrap();

    let loaded = WingsConfig::try_load(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded.node.host, "node2.example.com");
    assert_eq!(loaded.node.scheme, Scheme::Https);
    assert_eq!(loaded.tokens.algorithm, Algorithm::HS384);
    assert_eq!(loaded.logging.file.as_deref(), Some("logs/wingsctl.log"));
}

#[test]
fn test_sample_config_parses() {
    let sample = WingsConfig::generate_sample_config();
    assert!(sample.contains("[node]"));
    assert!(sample.contains("[tokens]"));
    assert!(sample.contains("[logging]"));

    let parsed: WingsConfig = toml::from_str(&sample).unwrap();
    assert_eq!(parsed.node.port, DEFAULT_PORT);
    assert_eq!(parsed.tokens.algorithm, Algorithm::HS256);
}

#[test]
fn test_node_record_and_token_config() {
    let mut config = WingsConfig::default();
    config.node.host = "node1".into();
    config.node.token = "t".into();
    config.tokens.expiration_secs = 60;
    config.tokens.algorithm = Algorithm::HS512;

    let record = config.node.to_record();
    assert_eq!(record.fqdn, "node1");
    assert_eq!(record.daemon_listen, DEFAULT_PORT);
    assert_eq!(record.daemon_token, "t");

    let mut generator = TokenGenerator::new("t");
    config.tokens.apply(&mut generator);
    assert_eq!(generator.expiration(), 60);
    assert_eq!(generator.algorithm(), Algorithm::HS512);
}
