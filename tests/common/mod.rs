//! Common test utilities for all integration tests.
//!
//! Listener fixtures, JWTProvider resource builders and accessors for the
//! JWT filter config installed by the listener hook.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use envoy_types::pb::envoy::config::listener::v3::{filter, Filter, FilterChain, Listener};
use envoy_types::pb::envoy::extensions::filters::http::jwt_authn::v3::JwtAuthentication;
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::{
    HttpConnectionManager, HttpFilter,
};
use gateway_jwt_extension::extension::proto::{
    ExtensionResource, PostHttpListenerExtensionContext, PostHttpListenerModifyRequest,
};
use gateway_jwt_extension::xds::filters::any_from_message;
use gateway_jwt_extension::xds::filters::http::jwt_auth::{decode_jwt_authn_filter, JWT_AUTHN_FILTER_NAME};
use gateway_jwt_extension::xds::helpers::{find_hcm, find_http_filter, HCM_FILTER_NAME, HCM_TYPE_URL};
use serde_json::{json, Value};

pub const API_VERSION: &str = "gateway.extensions.envoyproxy.io/v1alpha1";

pub fn router_filter() -> HttpFilter {
    HttpFilter { name: "envoy.filters.http.router".to_string(), ..Default::default() }
}

pub fn hcm_chain(name: &str) -> FilterChain {
    let hcm = HttpConnectionManager {
        stat_prefix: name.to_string(),
        http_filters: vec![router_filter()],
        ..Default::default()
    };
    FilterChain {
        name: name.to_string(),
        filters: vec![Filter {
            name: HCM_FILTER_NAME.to_string(),
            config_type: Some(filter::ConfigType::TypedConfig(any_from_message(HCM_TYPE_URL, &hcm))),
        }],
        ..Default::default()
    }
}

/// Listener with two HTTP chains and a default HTTP chain
pub fn gateway_listener(name: &str) -> Listener {
    Listener {
        name: name.to_string(),
        filter_chains: vec![hcm_chain("https-a"), hcm_chain("https-b")],
        default_filter_chain: Some(hcm_chain("default")),
        ..Default::default()
    }
}

/// JWTProvider resource with an inline remote JWKS
pub fn provider_json(name: &str, jwks_uri: &str) -> Value {
    json!({
        "apiVersion": API_VERSION,
        "kind": "JWTProvider",
        "metadata": {"name": name, "namespace": "default"},
        "spec": {
            "name": name,
            "issuer": "https://example.com",
            "audiences": ["one", "two"],
            "remoteJwks": {"uri": jwks_uri},
        }
    })
}

/// JWTProvider resource resolved through OIDC discovery
pub fn issuer_only_provider_json(name: &str, issuer: &str) -> Value {
    json!({
        "apiVersion": API_VERSION,
        "kind": "JWTProvider",
        "metadata": {"name": name},
        "spec": {"name": name, "issuer": issuer}
    })
}

pub fn listener_request(listener: Listener, resources: &[Value]) -> PostHttpListenerModifyRequest {
    PostHttpListenerModifyRequest {
        listener: Some(listener),
        post_listener_context: Some(PostHttpListenerExtensionContext {
            extension_resources: resources.iter().map(ExtensionResource::from_json).collect(),
        }),
    }
}

/// Decoded HCM of every chain, default chain last
pub fn hcms(listener: &Listener) -> Vec<HttpConnectionManager> {
    listener
        .filter_chains
        .iter()
        .chain(listener.default_filter_chain.iter())
        .filter_map(|chain| find_hcm(chain).unwrap().map(|(hcm, _)| hcm))
        .collect()
}

/// The JWT filter config of an HCM, if installed
pub fn jwt_config(hcm: &HttpConnectionManager) -> Option<JwtAuthentication> {
    find_http_filter(&hcm.http_filters, JWT_AUTHN_FILTER_NAME)
        .map(|index| decode_jwt_authn_filter(&hcm.http_filters[index]).unwrap())
}
