//! Managed JWKS upstream clusters using envoy-types
//!
//! Builds the Envoy clusters that back remote JWKS fetches and separates them
//! from the clusters the gateway generated on its own.

use crate::xds::filters::any_from_message;
use crate::xds::url_cluster::{is_managed_cluster_name, UpstreamDescriptor};
use envoy_types::pb::envoy::config::{
    cluster::v3::{
        cluster::{ClusterDiscoveryType, DiscoveryType, DnsLookupFamily},
        Cluster,
    },
    core::v3::{
        address::Address as AddressType,
        data_source::Specifier,
        socket_address::{PortSpecifier, Protocol},
        transport_socket::ConfigType as TransportSocketConfigType,
        Address, DataSource, SocketAddress, TransportSocket,
    },
    endpoint::v3::{lb_endpoint::HostIdentifier, ClusterLoadAssignment, Endpoint, LbEndpoint, LocalityLbEndpoints},
};
use envoy_types::pb::envoy::extensions::transport_sockets::tls::v3::{
    common_tls_context::ValidationContextType, CertificateValidationContext, CommonTlsContext,
    UpstreamTlsContext,
};
use envoy_types::pb::google::protobuf::Duration;

/// Connect timeout for managed clusters, in seconds
pub const MANAGED_CLUSTER_CONNECT_TIMEOUT_SECONDS: i64 = 2;

/// Endpoint port of every managed cluster. The descriptor's port only feeds the cluster name.
pub const MANAGED_CLUSTER_PORT: u32 = 443;

/// System trust bundle used to verify JWKS servers
pub const TRUST_BUNDLE_PATH: &str = "/etc/ssl/certs/ca-certificates.crt";

/// Name of Envoy's TLS transport socket
pub const TLS_TRANSPORT_SOCKET_NAME: &str = "envoy.transport_sockets.tls";

const UPSTREAM_TLS_CONTEXT_TYPE_URL: &str =
    "type.googleapis.com/envoy.extensions.transport_sockets.tls.v3.UpstreamTlsContext";

/// Build the DNS-resolved cluster for a JWKS upstream
pub fn build_managed_cluster(descriptor: &UpstreamDescriptor) -> Cluster {
    let name = descriptor.managed_name();

    let socket_address = SocketAddress {
        address: descriptor.hostname.clone(),
        port_specifier: Some(PortSpecifier::PortValue(MANAGED_CLUSTER_PORT)),
        protocol: Protocol::Tcp as i32,
        ..Default::default()
    };

    let lb_endpoint = LbEndpoint {
        host_identifier: Some(HostIdentifier::Endpoint(Endpoint {
            address: Some(Address { address: Some(AddressType::SocketAddress(socket_address)) }),
            ..Default::default()
        })),
        ..Default::default()
    };

    Cluster {
        name: name.clone(),
        cluster_discovery_type: Some(ClusterDiscoveryType::Type(DiscoveryType::StrictDns as i32)),
        connect_timeout: Some(Duration { seconds: MANAGED_CLUSTER_CONNECT_TIMEOUT_SECONDS, nanos: 0 }),
        dns_lookup_family: DnsLookupFamily::V4Only as i32,
        load_assignment: Some(ClusterLoadAssignment {
            cluster_name: name,
            endpoints: vec![LocalityLbEndpoints { lb_endpoints: vec![lb_endpoint], ..Default::default() }],
            ..Default::default()
        }),
        transport_socket: descriptor.tls.then(|| upstream_tls_socket(&descriptor.hostname)),
        ..Default::default()
    }
}

/// TLS transport socket verifying the upstream against the system trust bundle
pub fn upstream_tls_socket(sni: &str) -> TransportSocket {
    let tls_context = UpstreamTlsContext {
        sni: sni.to_string(),
        common_tls_context: Some(CommonTlsContext {
            validation_context_type: Some(ValidationContextType::ValidationContext(
                CertificateValidationContext {
                    trusted_ca: Some(DataSource {
                        specifier: Some(Specifier::Filename(TRUST_BUNDLE_PATH.to_string())),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )),
            ..Default::default()
        }),
        ..Default::default()
    };

    TransportSocket {
        name: TLS_TRANSPORT_SOCKET_NAME.to_string(),
        config_type: Some(TransportSocketConfigType::TypedConfig(any_from_message(
            UPSTREAM_TLS_CONTEXT_TYPE_URL,
            &tls_context,
        ))),
    }
}

/// Drop every cluster carrying the managed suffix, keeping the rest in order
pub fn strip_managed_clusters(clusters: Vec<Cluster>) -> Vec<Cluster> {
    clusters.into_iter().filter(|c| !is_managed_cluster_name(&c.name)).collect()
}
