//! # Observability
//!
//! Structured logging for the extension server, built on `tracing`.

pub mod logging;

pub use logging::{init_logging, log_config_info};
