//! # Structured Logging
//!
//! Subscriber setup and span helpers for hook processing.
//!
//! `RUST_LOG` takes precedence over the configured log level. Per-item skips
//! inside a hook are logged at `warn`/`error`, hook entry and exit at `info`,
//! and request/response dumps at `debug`.

use crate::config::{AppConfig, ObservabilityConfig};
use crate::errors::{Error, Result};
use tracing_subscriber::EnvFilter;

/// Create a tracing span for one extension hook invocation
#[macro_export]
macro_rules! hook_span {
    ($hook:expr) => {
        tracing::info_span!(
            "extension_hook",
            hook = %$hook,
            operation_id = %uuid::Uuid::new_v4()
        )
    };
    ($hook:expr, $($field:tt)*) => {
        tracing::info_span!(
            "extension_hook",
            hook = %$hook,
            operation_id = %uuid::Uuid::new_v4(),
            $($field)*
        )
    };
}

/// Install the global subscriber.
///
/// A subscriber installed earlier (tests, embedding applications) is kept and
/// the call succeeds.
pub fn init_logging(config: &ObservabilityConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_level).map_err(|e| {
            Error::config(format!("Invalid log level '{}': {}", config.log_level, e))
        })?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);
    let installed = if config.json_logging {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if !installed {
        tracing::debug!("Global tracing subscriber already installed; keeping it");
    }
    Ok(())
}

/// Log configuration at startup
pub fn log_config_info(config: &AppConfig) {
    tracing::info!(
        listener_type = ?config.listener.kind,
        tcp_address = %config.listener.tcp.address,
        unix_socket = %config.listener.unix.socket_path.display(),
        jwt_computation_disabled = config.features.jwt_computation_disabled(),
        allow_missing_fallback = config.features.allow_missing_fallback(),
        discovery_timeout_seconds = config.discovery.timeout_seconds,
        "Gateway JWT extension configuration"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_macros_compile() {
        let _span = hook_span!("PostTranslateModify");
        let _span = hook_span!("PostHTTPListenerModify", listener = "default/eg/http");
    }

    #[test]
    fn invalid_log_level_is_rejected_when_rust_log_unset() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let config = ObservabilityConfig { log_level: "gateway_jwt_extension=verbose".to_string(), json_logging: false };
        assert!(init_logging(&config).is_err());
    }

    #[test]
    fn repeated_init_is_harmless() {
        let config = ObservabilityConfig::default();
        assert!(init_logging(&config).is_ok());
        assert!(init_logging(&config).is_ok());
    }

    #[test]
    fn test_log_config_info() {
        log_config_info(&AppConfig::default());
    }
}
