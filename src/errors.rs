use std::fmt;

/// Failure kinds surfaced by the Wings client.
///
/// Every fallible operation in this crate returns one of these. The message
/// carried by each variant is the full human-readable text, e.g.
/// `"Endpoint not found: /api/servers/xyz"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WingsError {
    /// Transport-level failure: DNS, refused connection, timeout, protocol.
    Connection(String),
    /// The daemon answered 401 or 403.
    Authentication(String),
    /// The daemon answered any other status >= 400.
    Request(String),
    /// A token operation was attempted without a usable signing setup.
    TokenConfiguration(String),
    /// A presented token could not be verified or decoded.
    TokenDecode(String),
}

impl WingsError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            WingsError::Connection(_) => "W001",
            WingsError::Authentication(_) => "W002",
            WingsError::Request(_) => "W003",
            WingsError::TokenConfiguration(_) => "W004",
            WingsError::TokenDecode(_) => "W005",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            WingsError::Connection(_) => "Connection Error",
            WingsError::Authentication(_) => "Authentication Error",
            WingsError::Request(_) => "Request Error",
            WingsError::TokenConfiguration(_) => "Token Configuration Error",
            WingsError::TokenDecode(_) => "Token Decode Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            WingsError::Connection(msg) => msg,
            WingsError::Authentication(msg) => msg,
            WingsError::Request(msg) => msg,
            WingsError::TokenConfiguration(msg) => msg,
            WingsError::TokenDecode(msg) => msg,
        }
    }

    /// Whether the failure came back from the daemon as an HTTP status
    pub fn is_http(&self) -> bool {
        matches!(
            self,
            WingsError::Authentication(_) | WingsError::Request(_)
        )
    }

    /// 格式化为彩色输出（用于 CLI 模式）
    #[cfg(feature = "cli")]
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        format!(
            "{} {} {}\n  {}",
            "[ERROR]".red().bold(),
            self.code().yellow(),
            self.error_type().red(),
            self.message().white()
        )
    }

    /// 格式化为简洁输出
    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for WingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for WingsError {}

// 便捷的构造函数
impl WingsError {
    pub fn connection<T: Into<String>>(msg: T) -> Self {
        WingsError::Connection(msg.into())
    }

    pub fn authentication<T: Into<String>>(msg: T) -> Self {
        WingsError::Authentication(msg.into())
    }

    pub fn request<T: Into<String>>(msg: T) -> Self {
        WingsError::Request(msg.into())
    }

    pub fn token_configuration<T: Into<String>>(msg: T) -> Self {
        WingsError::TokenConfiguration(msg.into())
    }

    pub fn token_decode<T: Into<String>>(msg: T) -> Self {
        WingsError::TokenDecode(msg.into())
    }
}

impl From<jsonwebtoken::errors::Error> for WingsError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        WingsError::TokenDecode(format!("Invalid token: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, WingsError>;
