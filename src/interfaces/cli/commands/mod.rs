//! CLI command implementations
//!
//! This module re-exports all CLI command functions.

mod config_gen;
mod node;
mod sign;

pub use config_gen::*;
pub use node::*;
pub use sign::*;
