//! wings-client - a typed client for the Wings game-server daemon
//!
//! Covers authenticated REST calls against a node, mapping of daemon errors
//! onto a small error taxonomy, and signed short-lived URLs for downloads,
//! uploads, transfers and the console websocket.
//!
//! ```no_run
//! use wings_client::config::{NodeRecord, Scheme};
//! use wings_client::wings::Wings;
//!
//! let node = NodeRecord {
//!     scheme: Scheme::Https,
//!     fqdn: "node1.example.com".into(),
//!     daemon_listen: 8080,
//!     daemon_token: "daemon-token".into(),
//! };
//! let wings = Wings::from_node(&node, 30);
//! let logs = wings.server().logs("8d3a0f1e-5b1c-4f3e-9a55-0c2a7b6e9d10", 100)?;
//! assert!(logs.is_successful());
//! # Ok::<(), wings_client::errors::WingsError>(())
//! ```
//!
//! # Features
//! - **cli**: the `wingsctl` binary (default)
//!
//! # Architecture
//! - `wings`: connection, transport, tokens, responses and per-area services
//! - `config`: node/token/logging configuration
//! - `errors`: `WingsError` and the crate `Result`
//! - `system`: logging initialization
//! - `cli` / `interfaces`: command-line front end

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod system;
pub mod utils;
pub mod wings;

pub use errors::{Result, WingsError};
pub use wings::{Wings, WingsConnection, WingsResponse};
