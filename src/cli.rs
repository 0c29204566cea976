//! Command-line interface definitions using clap
//!
//! This module defines the CLI structure for wingsctl using clap's derive macros.

use clap::{Args, Parser, Subcommand};

use crate::config::{Scheme, WingsConfig};
use crate::wings::PowerAction;

/// wingsctl - talk to a Wings daemon from the command line
#[derive(Parser)]
#[command(name = "wingsctl")]
#[command(version)]
#[command(about = "Query and control a Wings node, and sign daemon URLs", long_about = None)]
pub struct Cli {
    /// Config file path (default: wings.toml)
    #[arg(long, short = 'c', global = true)]
    pub config: Option<String>,

    #[command(flatten)]
    pub node: NodeOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

/// Per-invocation overrides for `[node]`
#[derive(Args, Debug, Default)]
pub struct NodeOverrides {
    /// Node hostname or IP
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Daemon port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// http or https
    #[arg(long, global = true)]
    pub scheme: Option<Scheme>,

    /// Daemon token
    #[arg(long, global = true, env = "WINGS_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,
}

impl NodeOverrides {
    pub fn apply(&self, config: &mut WingsConfig) {
        if let Some(host) = &self.host {
            config.node.host = host.clone();
        }
        if let Some(port) = self.port {
            config.node.port = port;
        }
        if let Some(scheme) = self.scheme {
            config.node.scheme = scheme;
        }
        if let Some(token) = &self.token {
            config.node.token = token.clone();
        }
        if let Some(timeout) = self.timeout {
            config.node.timeout_secs = timeout;
        }
    }
}

/// Available commands
#[derive(Subcommand)]
pub enum Commands {
    /// Check that the node answers GET /api/system
    Ping,

    /// Show node system information
    System {
        /// Detailed (v2) payload
        #[arg(long)]
        detailed: bool,
    },

    /// List IP addresses on the node
    Ips,

    /// List servers on the node
    Servers,

    /// Show console output of a server
    Logs {
        /// Server UUID
        uuid: String,

        /// Number of lines
        #[arg(long, default_value_t = 100)]
        lines: u32,
    },

    /// Send a power action (start, stop, restart, kill)
    Power {
        /// Server UUID
        uuid: String,

        /// Action
        action: PowerAction,
    },

    /// Generate signed tokens and URLs
    Sign {
        #[command(subcommand)]
        target: SignCommands,
    },

    /// Verify a token against the node token and print its claims
    Decode {
        /// Token to decode
        token: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Signed URL targets
#[derive(Subcommand)]
pub enum SignCommands {
    /// Backup download URL
    Backup {
        server: String,
        backup: String,
        #[arg(long)]
        unique_id: Option<String>,
    },

    /// File download URL
    File { server: String, path: String },

    /// File upload URL
    Upload { server: String, user: String },

    /// Server transfer token
    Transfer { server: String },

    /// Console websocket URL
    Websocket {
        server: String,
        user: String,
        /// Granted permission (repeatable), e.g. websocket.connect
        #[arg(long = "permission", short = 'p')]
        permissions: Vec<String>,
    },
}

/// Configuration management commands
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: wings.toml)
        output_path: Option<String>,

        /// Force overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_power() {
        let cli = Cli::try_parse_from(["wingsctl", "power", "abc", "restart"]).unwrap();
        match cli.command {
            Commands::Power { uuid, action } => {
                assert_eq!(uuid, "abc");
                assert_eq!(action, PowerAction::Restart);
            }
            _ => panic!("expected power command"),
        }
    }

    #[test]
    fn test_reject_unknown_power_action() {
        assert!(Cli::try_parse_from(["wingsctl", "power", "abc", "explode"]).is_err());
    }

    #[test]
    fn test_global_overrides() {
        let cli = Cli::try_parse_from([
            "wingsctl", "logs", "abc", "--lines", "20", "--host", "node1", "--scheme", "https",
        ])
        .unwrap();

        let mut config = WingsConfig::default();
        cli.node.apply(&mut config);
        assert_eq!(config.node.host, "node1");
        assert_eq!(config.node.scheme, Scheme::Https);
        assert_eq!(config.node.port, 8080);

        match cli.command {
            Commands::Logs { lines, .. } => assert_eq!(lines, 20),
            _ => panic!("expected logs command"),
        }
    }

    #[test]
    fn test_sign_websocket_permissions() {
        let cli = Cli::try_parse_from([
            "wingsctl", "sign", "websocket", "srv", "usr", "-p", "control.console", "-p",
            "websocket.connect",
        ])
        .unwrap();
        match cli.command {
            Commands::Sign {
                target: SignCommands::Websocket { permissions, .. },
            } => assert_eq!(permissions, vec!["control.console", "websocket.connect"]),
            _ => panic!("expected sign websocket"),
        }
    }
}
