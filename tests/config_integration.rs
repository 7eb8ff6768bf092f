//! Integration tests for configuration management
//!
//! These tests validate that the layered configuration reads YAML files and
//! environment overrides, and that the extension server binds the configured
//! listener.

use gateway_jwt_extension::config::{
    AppConfig, FeatureGates, ListenerType, DISABLE_JWT_PROVIDER_COMPUTATION,
    ENABLE_ALLOW_MISSING_JWT_AUTHENTICATION,
};
use gateway_jwt_extension::extension::{start_extension_server, GatewayExtension, OidcDiscoveryClient};
use gateway_jwt_extension::{init_logging, Result};
use std::env;
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::timeout;
use tracing_test::traced_test;

// Use a mutex to serialize tests that modify environment variables
static ENV_MUTEX: Mutex<()> = Mutex::new(());

const ADDRESS_VAR: &str = "GATEWAY_EXTENSION__LISTENER__TCP__ADDRESS";
const TIMEOUT_VAR: &str = "GATEWAY_EXTENSION__DISCOVERY__TIMEOUT_SECONDS";

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

/// Restores an environment variable when dropped
struct EnvGuard {
    key: &'static str,
    original: Option<String>,
}

impl EnvGuard {
    fn set(key: &'static str, value: &str) -> Self {
        let original = env::var(key).ok();
        env::set_var(key, value);
        Self { key, original }
    }
}

impl Drop for EnvGuard {
    fn drop(&mut self) {
        match &self.original {
            Some(value) => env::set_var(self.key, value),
            None => env::remove_var(self.key),
        }
    }
}

#[test]
fn test_yaml_file_is_loaded() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let file = write_config(
        r#"
listener:
  type: unix
  unix:
    socket_path: /tmp/gateway-extension-test.sock
features:
  enable-allow-missing-jwt-authentication-envoy: true
discovery:
  timeout_seconds: 30
observability:
  log_level: debug
  json_logging: true
shutdown:
  grace_period_seconds: 5
"#,
    );

    let config = AppConfig::load(Some(file.path()))?;
    assert_eq!(config.listener.kind, ListenerType::Unix);
    assert_eq!(
        config.listener.unix.socket_path.to_str(),
        Some("/tmp/gateway-extension-test.sock")
    );
    assert!(config.features.allow_missing_fallback());
    assert!(!config.features.jwt_computation_disabled());
    assert_eq!(config.discovery.timeout(), Duration::from_secs(30));
    assert_eq!(config.observability.log_level, "debug");
    assert!(config.observability.json_logging);
    assert_eq!(config.shutdown.grace_period(), Duration::from_secs(5));
    Ok(())
}

#[test]
fn test_environment_overrides_file() -> Result<()> {
    let _guard = ENV_MUTEX.lock().unwrap();
    let file = write_config(
        r#"
listener:
  tcp:
    address: "127.0.0.1:9000"
features:
  disable-jwt-provider-computation: true
"#,
    );

    let _address = EnvGuard::set(ADDRESS_VAR, ":19092");
    let _timeout = EnvGuard::set(TIMEOUT_VAR, "45");

    let config = AppConfig::load(Some(file.path()))?;
    assert_eq!(config.listener.tcp.address, ":19092");
    assert_eq!(config.listener.tcp.socket_addr()?.to_string(), "0.0.0.0:19092");
    assert_eq!(config.discovery.timeout_seconds, 45);
    assert!(config.features.is_enabled(DISABLE_JWT_PROVIDER_COMPUTATION));
    Ok(())
}

#[test]
fn test_invalid_values_are_rejected() {
    let _guard = ENV_MUTEX.lock().unwrap();

    let out_of_range = write_config("discovery:\n  timeout_seconds: 0\n");
    assert!(AppConfig::load(Some(out_of_range.path())).is_err());

    let bad_address = write_config("listener:\n  tcp:\n    address: \"not-an-address\"\n");
    assert!(AppConfig::load(Some(bad_address.path())).is_err());

    let bad_type = write_config("listener:\n  type: pipe\n");
    assert!(AppConfig::load(Some(bad_type.path())).is_err());
}

#[test]
fn test_feature_gate_defaults() {
    let gates = FeatureGates::new();
    assert!(!gates.is_enabled(DISABLE_JWT_PROVIDER_COMPUTATION));
    assert!(!gates.is_enabled(ENABLE_ALLOW_MISSING_JWT_AUTHENTICATION));
}

/// Test that the extension server binds the configured port and shuts down cleanly
#[tokio::test]
#[traced_test]
async fn test_extension_server_binds_configured_port() -> Result<()> {
    let port = {
        let probe = std::net::TcpListener::bind("127.0.0.1:0")?;
        probe.local_addr()?.port()
    };

    let file = write_config(&format!("listener:\n  tcp:\n    address: \"127.0.0.1:{port}\"\n"));
    let config = {
        let _guard = ENV_MUTEX.lock().unwrap();
        AppConfig::load(Some(file.path()))?
    };
    init_logging(&config.observability)?;

    let discovery = Arc::new(OidcDiscoveryClient::new(&config.discovery)?);
    let extension = GatewayExtension::new(config.features.clone(), discovery);

    let (tx, rx) = tokio::sync::oneshot::channel::<()>();
    let listener_config = config.listener.clone();
    let server = tokio::spawn(async move {
        start_extension_server(&listener_config, extension, async {
            let _ = rx.await;
        })
        .await
    });

    let mut connected = false;
    for _ in 0..50 {
        if tokio::net::TcpStream::connect(("127.0.0.1", port)).await.is_ok() {
            connected = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert!(connected, "extension server did not accept connections on port {port}");

    let _ = tx.send(());
    let result = timeout(Duration::from_secs(5), server).await.expect("server shutdown timed out");
    result.expect("server task panicked")?;
    Ok(())
}
