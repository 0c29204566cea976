use jsonwebtoken::Algorithm;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter};

use crate::wings::TokenGenerator;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "wings.toml";

/// 环境变量前缀，例如 WINGS__NODE__PORT=8443
pub const ENV_PREFIX: &str = "WINGS";

/// Daemon URL scheme
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Scheme {
    #[default]
    Http,
    Https,
}

impl std::fmt::Display for Scheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http => write!(f, "http"),
            Self::Https => write!(f, "https"),
        }
    }
}

impl std::str::FromStr for Scheme {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "http" => Ok(Self::Http),
            "https" => Ok(Self::Https),
            _ => Err(format!("Invalid scheme: '{}'. Valid: http, https", s)),
        }
    }
}

/// Node row as stored by the panel; the only input `Wings::from_node` needs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub scheme: Scheme,
    pub fqdn: String,
    pub daemon_listen: u16,
    pub daemon_token: String,
}

/// 客户端配置（从 TOML 和环境变量加载）
///
/// - node: 目标 Wings 节点
/// - tokens: 签名 URL 的 token 参数
/// - logging: 日志配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WingsConfig {
    #[serde(default)]
    pub node: NodeConfig,
    #[serde(default)]
    pub tokens: TokenConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl WingsConfig {
    /// Like [`Self::try_load`], falling back to defaults on error.
    ///
    /// 优先级：ENV > wings.toml > 默认值
    pub fn load(path: Option<&str>) -> Self {
        let path = path.unwrap_or(DEFAULT_CONFIG_PATH);
        match Self::try_load(path) {
            Ok(config) => {
                if std::path::Path::new(path).exists() {
                    eprintln!("[INFO] Configuration loaded from: {}", path);
                }
                config
            }
            Err(e) => {
                eprintln!("[ERROR] Failed to load config: {}", e);
                Self::default()
            }
        }
    }

    /// 从 TOML 文件（可选）和环境变量加载配置
    pub fn try_load(path: &str) -> Result<Self, config::ConfigError> {
        use config::{Config, Environment, File};

        Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<WingsConfig>()
    }

    /// 生成示例 TOML 配置文件
    pub fn generate_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config)
            .unwrap_or_else(|e| format!("Error generating sample config: {}", e))
    }

    /// 保存配置到 TOML 文件
    pub fn save_to_file<P: AsRef<std::path::Path>>(
        &self,
        path: P,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;

        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }
}

/// 节点连接配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    #[serde(default = "default_node_host")]
    pub host: String,
    #[serde(default = "default_node_port")]
    pub port: u16,
    #[serde(default)]
    pub scheme: Scheme,
    /// Daemon token; also the signing secret for generated URLs
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl NodeConfig {
    pub fn to_record(&self) -> NodeRecord {
        NodeRecord {
            scheme: self.scheme,
            fqdn: self.host.clone(),
            daemon_listen: self.port,
            daemon_token: self.token.clone(),
        }
    }
}

/// 签名 token 配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenConfig {
    #[serde(default = "default_token_expiration")]
    pub expiration_secs: i64,
    #[serde(default = "default_token_algorithm")]
    pub algorithm: Algorithm,
}

impl TokenConfig {
    pub fn apply(&self, generator: &mut TokenGenerator) {
        generator.set_expiration(self.expiration_secs);
        generator.set_algorithm(self.algorithm);
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default = "default_max_backups")]
    pub max_backups: u32,
    #[serde(default)]
    pub enable_rotation: bool,
}

// ============================================================
// Default value functions
// ============================================================

fn default_node_host() -> String {
    "127.0.0.1".to_string()
}

fn default_node_port() -> u16 {
    crate::wings::DEFAULT_PORT
}

fn default_timeout_secs() -> u64 {
    crate::wings::DEFAULT_TIMEOUT_SECS
}

fn default_token_expiration() -> i64 {
    crate::wings::token::DEFAULT_EXPIRATION_SECS
}

fn default_token_algorithm() -> Algorithm {
    Algorithm::HS256
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

fn default_max_backups() -> u32 {
    5
}

// ============================================================
// Default implementations
// ============================================================

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            host: default_node_host(),
            port: default_node_port(),
            scheme: Scheme::default(),
            token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            expiration_secs: default_token_expiration(),
            algorithm: default_token_algorithm(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            file: None,
            max_backups: default_max_backups(),
            enable_rotation: false,
        }
    }
}
