//! Wire messages for the `envoygateway.extension.EnvoyGatewayExtension` service.
//!
//! Field tags match the gateway's extension protocol. Envoy resources are
//! embedded as envoy-types messages so hooks work on typed protos directly.

use envoy_types::pb::envoy::config::cluster::v3::Cluster;
use envoy_types::pb::envoy::config::listener::v3::Listener;
use envoy_types::pb::envoy::config::route::v3::{Route, VirtualHost};
use envoy_types::pb::envoy::extensions::transport_sockets::tls::v3::Secret;

include!(concat!(env!("OUT_DIR"), "/envoygateway.extension.EnvoyGatewayExtension.rs"));

/// An extension resource attached to the hook, as raw JSON
#[derive(Clone, PartialEq, prost::Message)]
pub struct ExtensionResource {
    #[prost(bytes = "vec", tag = "1")]
    pub unstructured_bytes: Vec<u8>,
}

impl ExtensionResource {
    pub fn from_json(value: &serde_json::Value) -> Self {
        Self { unstructured_bytes: value.to_string().into_bytes() }
    }
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerExtensionContext {
    #[prost(message, repeated, tag = "1")]
    pub extension_resources: Vec<ExtensionResource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub listener: Option<Listener>,
    #[prost(message, optional, tag = "2")]
    pub post_listener_context: Option<PostHttpListenerExtensionContext>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostHttpListenerModifyResponse {
    #[prost(message, optional, tag = "1")]
    pub listener: Option<Listener>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateExtensionContext {
    #[prost(message, repeated, tag = "1")]
    pub extension_resources: Vec<ExtensionResource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub post_translate_context: Option<PostTranslateExtensionContext>,
    #[prost(message, repeated, tag = "2")]
    pub clusters: Vec<Cluster>,
    #[prost(message, repeated, tag = "3")]
    pub secrets: Vec<Secret>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostTranslateModifyResponse {
    #[prost(message, repeated, tag = "1")]
    pub clusters: Vec<Cluster>,
    #[prost(message, repeated, tag = "2")]
    pub secrets: Vec<Secret>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostVirtualHostExtensionContext {}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostVirtualHostModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub virtual_host: Option<VirtualHost>,
    #[prost(message, optional, tag = "2")]
    pub post_virtual_host_context: Option<PostVirtualHostExtensionContext>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostVirtualHostModifyResponse {
    #[prost(message, optional, tag = "1")]
    pub virtual_host: Option<VirtualHost>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostRouteExtensionContext {
    #[prost(message, repeated, tag = "1")]
    pub extension_resources: Vec<ExtensionResource>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostRouteModifyRequest {
    #[prost(message, optional, tag = "1")]
    pub route: Option<Route>,
    #[prost(message, optional, tag = "2")]
    pub post_route_context: Option<PostRouteExtensionContext>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct PostRouteModifyResponse {
    #[prost(message, optional, tag = "1")]
    pub route: Option<Route>,
}
