//! CLI interface module
//!
//! Executes clap-parsed [`Commands`] against one node.

pub mod commands;

use std::fmt;

use crate::cli::{Commands, ConfigCommands};
use crate::config::WingsConfig;
use crate::errors::WingsError;
use crate::wings::Wings;
use commands::{
    config_generate, decode_token, node_ips, node_logs, node_ping, node_power, node_servers,
    node_system, sign,
};

#[derive(Debug)]
pub enum CliError {
    /// Daemon or token error
    Wings(WingsError),
    ConfigError(String),
    CommandError(String),
}

impl CliError {
    /// 进程退出码：daemon 返回的 HTTP 错误为 2，其余为 1
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Wings(e) if e.is_http() => 2,
            _ => 1,
        }
    }

    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Wings(e) => e.format_simple(),
            CliError::ConfigError(msg) => format!("Config error: {}", msg),
            CliError::CommandError(msg) => format!("Command error: {}", msg),
        }
    }

    /// Format as colored output
    pub fn format_colored(&self) -> String {
        use colored::Colorize;
        match self {
            CliError::Wings(e) => e.format_colored(),
            CliError::ConfigError(msg) => {
                format!("{} {}", "Config error:".yellow().bold(), msg.white())
            }
            CliError::CommandError(msg) => {
                format!("{} {}", "Command error:".red().bold(), msg.white())
            }
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<WingsError> for CliError {
    fn from(err: WingsError) -> Self {
        CliError::Wings(err)
    }
}

/// Build the client for the configured node, with `[tokens]` applied
pub fn build_client(config: &WingsConfig) -> Wings {
    let mut wings = Wings::from_config(&config.node);
    config.tokens.apply(wings.token_generator_mut());
    wings
}

/// Run a CLI command from clap-parsed input
pub fn run_cli_command(cmd: Commands, config: &WingsConfig) -> Result<(), CliError> {
    // 仅节点命令需要客户端
    let wings = || build_client(config);

    match cmd {
        Commands::Ping => node_ping(&wings()),
        Commands::System { detailed } => node_system(&wings(), detailed),
        Commands::Ips => node_ips(&wings()),
        Commands::Servers => node_servers(&wings()),
        Commands::Logs { uuid, lines } => node_logs(&wings(), &uuid, lines),
        Commands::Power { uuid, action } => node_power(&wings(), &uuid, action),
        Commands::Sign { target } => sign(&wings(), target),
        Commands::Decode { token } => decode_token(&wings(), &token),
        Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        } => config_generate(output_path, force),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_applies_token_config() {
        let mut config = WingsConfig::default();
        config.node.token = "node-token".into();
        config.tokens.expiration_secs = 120;

        let wings = build_client(&config);
        assert_eq!(wings.token_generator().secret(), "node-token");
        assert_eq!(wings.token_generator().expiration(), 120);
    }

    #[test]
    fn test_exit_code() {
        assert_eq!(CliError::from(WingsError::request("HTTP 409: busy")).exit_code(), 2);
        assert_eq!(CliError::from(WingsError::authentication("Access forbidden: x")).exit_code(), 2);
        assert_eq!(CliError::from(WingsError::connection("Connection failed: x")).exit_code(), 1);
        assert_eq!(CliError::from(WingsError::token_decode("Invalid token: x")).exit_code(), 1);
        assert_eq!(CliError::CommandError("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_cli_error_format() {
        let err = CliError::from(WingsError::request("HTTP 422: bad"));
        assert_eq!(err.format_simple(), "Request Error: HTTP 422: bad");
        assert_eq!(
            CliError::ConfigError("missing".into()).to_string(),
            "Config error: missing"
        );
    }
}
