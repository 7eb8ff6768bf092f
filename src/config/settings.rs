//! # Configuration Settings
//!
//! Defines the configuration structure for the gateway JWT extension.

use crate::config::flags::FeatureGates;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use validator::Validate;

/// Default TCP address for the extension gRPC server
pub const DEFAULT_TCP_ADDRESS: &str = "0.0.0.0:9092";

/// Default UNIX socket path for the extension gRPC server
pub const DEFAULT_UNIX_SOCKET_PATH: &str = "/etc/envoy/gateway/extension.sock";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Where the gRPC server listens
    #[validate(nested)]
    pub listener: ListenerConfig,

    /// Feature gates consulted by the hooks
    pub features: FeatureGates,

    /// OIDC discovery client settings
    #[validate(nested)]
    pub discovery: DiscoveryConfig,

    /// Logging settings
    #[validate(nested)]
    pub observability: ObservabilityConfig,

    /// Shutdown behaviour
    #[validate(nested)]
    pub shutdown: ShutdownConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(Error::from)?;
        self.validate_custom()?;
        Ok(())
    }

    fn validate_custom(&self) -> Result<()> {
        match self.listener.kind {
            ListenerType::Tcp => {
                self.listener.tcp.socket_addr()?;
            }
            ListenerType::Unix => {
                if self.listener.unix.socket_path.as_os_str().is_empty() {
                    return Err(Error::config("UNIX listener requires a socket path"));
                }
            }
        }
        Ok(())
    }
}

/// Transport used by the gRPC server
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ListenerType {
    #[default]
    Tcp,
    Unix,
}

/// gRPC listener configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listener transport
    #[serde(rename = "type")]
    pub kind: ListenerType,

    #[validate(nested)]
    pub tcp: TcpListenerConfig,

    pub unix: UnixListenerConfig,
}

/// TCP listener settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct TcpListenerConfig {
    /// `host:port`, or `:port` to bind every interface
    #[validate(length(min = 1, message = "TCP address cannot be empty"))]
    pub address: String,
}

impl Default for TcpListenerConfig {
    fn default() -> Self {
        Self { address: DEFAULT_TCP_ADDRESS.to_string() }
    }
}

impl TcpListenerConfig {
    /// Parse the configured address, treating a bare `:port` as `0.0.0.0:port`
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let address = if self.address.starts_with(':') {
            format!("0.0.0.0{}", self.address)
        } else {
            self.address.clone()
        };

        address
            .parse()
            .map_err(|e| Error::config(format!("Invalid TCP listener address '{}': {}", self.address, e)))
    }
}

/// UNIX domain socket listener settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UnixListenerConfig {
    pub socket_path: PathBuf,
}

impl Default for UnixListenerConfig {
    fn default() -> Self {
        Self { socket_path: PathBuf::from(DEFAULT_UNIX_SOCKET_PATH) }
    }
}

/// OIDC discovery client configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DiscoveryConfig {
    /// Total request timeout for a discovery document fetch
    #[validate(range(min = 1, max = 300, message = "Timeout must be between 1 and 300 seconds"))]
    pub timeout_seconds: u64,
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self { timeout_seconds: 10 }
    }
}

impl DiscoveryConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Emit JSON formatted log lines
    pub json_logging: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self { log_level: "info".to_string(), json_logging: false }
    }
}

/// Shutdown configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Delay between the shutdown signal and process exit
    #[validate(range(max = 300, message = "Grace period must be at most 300 seconds"))]
    pub grace_period_seconds: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { grace_period_seconds: 1 }
    }
}

impl ShutdownConfig {
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_seconds)
    }
}
