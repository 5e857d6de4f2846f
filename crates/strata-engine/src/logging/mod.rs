//! Logging utilities.
//!
//! The engine only speaks the `log` facade. This module offers a one-shot
//! `env_logger` setup for binaries and demos.

mod init;

pub use init::{init_logging, LoggingConfig};
