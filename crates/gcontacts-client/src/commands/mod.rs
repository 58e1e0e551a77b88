//! Subcommand implementations.

pub mod config;
pub mod contact;
pub mod server;
pub mod token;
