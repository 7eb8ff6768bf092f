//! # Envoy xDS Resource Helpers
//!
//! Envoy protobuf construction and navigation used by the extension hooks:
//!
//! - `url_cluster`: JWKS URL to upstream descriptor resolution
//! - `cluster`: managed JWKS clusters
//! - `filters`: JWT authentication filter and per-route configs
//! - `helpers`: listener and route accessors

pub mod cluster;
pub mod filters;
pub mod helpers;
pub mod url_cluster;

pub use cluster::{build_managed_cluster, strip_managed_clusters};
pub use helpers::{find_hcm, ListenerModifier, PerFilterConfig};
pub use url_cluster::{
    cluster_name, is_managed_cluster_name, EndpointType, UpstreamDescriptor, MANAGED_CLUSTER_SUFFIX,
};
