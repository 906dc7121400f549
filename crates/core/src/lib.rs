//! Core functionality shared by the Courier crates and binaries.
//!
//! This crate provides configuration loading, logging initialization and the
//! error type used at binary boundaries.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{Config, DomainConfig, LoggingConfig, NodeConfig};
pub use error::{CoreError, CoreResult};
