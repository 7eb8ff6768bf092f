//! # Configuration Management
//!
//! Layered configuration for the extension server: built-in defaults, then an
//! optional YAML file, then `GATEWAY_EXTENSION__*` environment variables.
//!
//! ```yaml
//! listener:
//!   type: unix
//!   unix:
//!     socket_path: /var/run/extension.sock
//! features:
//!   enable-allow-missing-jwt-authentication-envoy: true
//! ```

pub mod flags;
pub mod settings;

pub use flags::{
    FeatureGates, DISABLE_JWT_PROVIDER_COMPUTATION, ENABLE_ALLOW_MISSING_JWT_AUTHENTICATION,
};
pub use settings::{
    AppConfig, DiscoveryConfig, ListenerConfig, ListenerType, ObservabilityConfig, ShutdownConfig,
    TcpListenerConfig, UnixListenerConfig, DEFAULT_TCP_ADDRESS, DEFAULT_UNIX_SOCKET_PATH,
};

use crate::errors::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "GATEWAY_EXTENSION";

/// File name searched for in the default config directories
pub const CONFIG_FILE_NAME: &str = "config.yaml";

impl AppConfig {
    /// Load configuration from `path`, or from the first `config.yaml` found in
    /// the default search directories, then apply environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        let file = match path {
            Some(explicit) => {
                if !explicit.is_file() {
                    return Err(Error::config(format!(
                        "Config file '{}' does not exist",
                        explicit.display()
                    )));
                }
                Some(explicit.to_path_buf())
            }
            None => default_search_paths().into_iter().find(|candidate| candidate.is_file()),
        };

        if let Some(file) = &file {
            tracing::debug!(path = %file.display(), "Loading configuration file");
            builder = builder.add_source(
                config::File::from(file.as_path())
                    .format(config::FileFormat::Yaml)
                    .required(true),
            );
        }

        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}

/// Candidate `config.yaml` locations, in lookup order. The first existing file is used.
pub fn default_search_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/gateway-extension").join(CONFIG_FILE_NAME)];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".gateway-extension").join(CONFIG_FILE_NAME));
    }
    paths.push(PathBuf::from(".").join(CONFIG_FILE_NAME));
    paths
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_paths_end_with_working_directory() {
        let paths = default_search_paths();
        assert_eq!(paths.first().unwrap(), &PathBuf::from("/etc/gateway-extension/config.yaml"));
        assert_eq!(paths.last().unwrap(), &PathBuf::from("./config.yaml"));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let err = AppConfig::load(Some(Path::new("/definitely/not/here.yaml"))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }
}
