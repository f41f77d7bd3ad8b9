//! tdns Library
//!
//! Command-line client for the Technitium DNS server HTTP API: zones, zone
//! options, records, logs, settings backups and administrative sessions.

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod options;

#[cfg(test)]
pub(crate) mod testing;

pub use client::TechnitiumClient;
pub use config::Config;
pub use error::ApiError;
