//! # Gateway JWT Extension
//!
//! An Envoy Gateway extension server that turns `JWTProvider` resources into
//! Envoy JWT authentication configuration.
//!
//! ## Architecture
//!
//! ```text
//! Envoy Gateway ──gRPC hooks──▶ GatewayExtension
//!                                 ├─ listener hook  → JwtProviderTranslator ─┐
//!                                 ├─ translate hook → ClusterSynchronizer  ◀─┤ ClusterCache
//!                                 └─ vhost hook     → route annotator        │
//!                                                                            │
//!                   OIDC discovery (well-known document) ◀───────────────────┘
//! ```
//!
//! ## Core Components
//!
//! - **Translator**: builds the `envoy.filters.http.jwt_authn` filter for every
//!   filter chain of a listener and records each JWKS upstream
//! - **Synchronizer**: adds one managed cluster per recorded upstream and drops
//!   stale managed clusters
//! - **Annotator**: points every route at the shared requirement
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gateway_jwt_extension::config::AppConfig;
//! use gateway_jwt_extension::extension::{start_extension_server, GatewayExtension, OidcDiscoveryClient};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> gateway_jwt_extension::Result<()> {
//!     let config = AppConfig::load(None)?;
//!     let discovery = Arc::new(OidcDiscoveryClient::new(&config.discovery)?);
//!     let extension = GatewayExtension::new(config.features.clone(), discovery);
//!     start_extension_server(&config.listener, extension, async {
//!         let _ = tokio::signal::ctrl_c().await;
//!     })
//!     .await
//! }
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod extension;
pub mod observability;
pub mod xds;

// Re-export commonly used types and traits
pub use config::AppConfig;
pub use errors::{Error, Result};
pub use extension::GatewayExtension;
pub use observability::init_logging;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
