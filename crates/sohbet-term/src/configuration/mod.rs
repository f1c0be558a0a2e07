//! Configuration management for the chat client.
//!
//! Endpoint addresses, the startup model and the log level, resolved from
//! defaults, a `config.toml`, the environment and command-line overrides.

mod config;

pub use config::*;
