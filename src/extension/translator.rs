//! JWT provider translation into listener filter chains
//!
//! Turns the providers attached to a listener into one JWT authentication
//! filter config, installs it into every HTTP connection manager and records
//! the JWKS upstreams in the shared cluster cache.

use crate::domain::JwtProviderResource;
use crate::errors::Result;
use crate::extension::cache::ClusterCache;
use crate::extension::discovery::JwksDiscovery;
use crate::xds::filters::http::jwt_auth::{
    decode_jwt_authn_filter, jwt_authn_http_filter, JwtAuthenticationConfig, JwtProviderConfig,
    RemoteJwksConfig, JWT_AUTHN_FILTER_NAME,
};
use crate::xds::helpers::{find_http_filter, ListenerModifier};
use crate::xds::url_cluster::UpstreamDescriptor;
use envoy_types::pb::envoy::config::listener::v3::Listener;
use envoy_types::pb::envoy::extensions::filters::http::jwt_authn::v3::JwtAuthentication;
use envoy_types::pb::envoy::extensions::filters::network::http_connection_manager::v3::HttpConnectionManager;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Outcome of one translation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Providers that made it into the filter config
    pub providers: usize,
    /// Providers skipped because their JWKS location or config was unusable
    pub skipped: usize,
    /// Connection managers rewritten
    pub chains_updated: usize,
}

/// Translates JWTProvider resources into listener configuration
#[derive(Clone)]
pub struct JwtProviderTranslator {
    cache: ClusterCache,
    discovery: Arc<dyn JwksDiscovery>,
    allow_missing_fallback: bool,
}

impl JwtProviderTranslator {
    pub fn new(
        cache: ClusterCache,
        discovery: Arc<dyn JwksDiscovery>,
        allow_missing_fallback: bool,
    ) -> Self {
        Self { cache, discovery, allow_missing_fallback }
    }

    /// Install the JWT filter for `providers` into every chain of `listener`.
    ///
    /// The cluster cache is cleared and repopulated under an exclusive lock
    /// held for the whole run, discovery requests included. Providers whose
    /// JWKS URL cannot be resolved, or whose config cannot be built, are
    /// skipped; a failed discovery request aborts the run.
    pub async fn translate(
        &self,
        providers: &[JwtProviderResource],
        listener: &mut Listener,
    ) -> Result<TranslationSummary> {
        let mut cycle = self.cache.begin_cycle().await;
        let mut summary = TranslationSummary::default();
        let mut configs: Vec<(String, JwtProviderConfig)> = Vec::with_capacity(providers.len());

        info!(listener = %listener.name, count = providers.len(), "Processing JWT providers");

        for resource in providers {
            let spec = &resource.spec;
            debug!(provider = %spec.name, resource = ?resource, "Processing JWT provider");

            let jwks_uri = match &spec.remote_jwks {
                Some(remote) => remote.uri.clone(),
                None => self.discovery.jwks_uri(&spec.issuer).await?,
            };

            let descriptor = match UpstreamDescriptor::from_url(&jwks_uri) {
                Ok(descriptor) => descriptor,
                Err(e) => {
                    error!(provider = %spec.name, jwks_uri = %jwks_uri, error = %e, "Invalid JWKS URI; skipping provider");
                    summary.skipped += 1;
                    continue;
                }
            };

            let remote =
                RemoteJwksConfig::from_spec(&jwks_uri, descriptor.managed_name(), spec.remote_jwks.as_ref());
            let config = JwtProviderConfig::from_spec(spec, remote);
            if let Err(e) = config.to_proto() {
                error!(provider = %spec.name, error = %e, "Invalid JWT provider config; skipping provider");
                summary.skipped += 1;
                continue;
            }

            match configs.iter_mut().find(|(name, _)| name == &spec.name) {
                Some(existing) => {
                    warn!(provider = %spec.name, "Duplicate JWT provider name; later definition wins");
                    existing.1 = config;
                }
                None => configs.push((spec.name.clone(), config)),
            }

            debug!(provider = %spec.name, cluster = %descriptor.managed_name(), endpoint_type = %descriptor.endpoint_type, "Resolved JWKS upstream");
            cycle.insert(descriptor);
            info!(provider = %spec.name, "Processed JWT provider");
        }

        summary.providers = configs.len();
        let auth_config = JwtAuthenticationConfig::new(configs, self.allow_missing_fallback);

        summary.chains_updated = ListenerModifier::new(listener)
            .for_each_hcm(|hcm, chain_name| install_jwt_filter(hcm, chain_name, &auth_config))?;

        info!(
            providers = summary.providers,
            skipped = summary.skipped,
            chains_updated = summary.chains_updated,
            cached_upstreams = cycle.len(),
            "JWT provider translation complete"
        );
        Ok(summary)
    }
}

/// Add, update or remove the JWT filter of one connection manager.
///
/// A new filter goes first in the chain. Without a requirement the filter is
/// removed. An existing filter that fails to decode leaves the chain untouched.
fn install_jwt_filter(
    hcm: &mut HttpConnectionManager,
    chain_name: &str,
    config: &JwtAuthenticationConfig,
) -> Result<bool> {
    match find_http_filter(&hcm.http_filters, JWT_AUTHN_FILTER_NAME) {
        None if !config.has_requirement() => Ok(false),
        None => {
            let proto = config.to_proto()?;
            hcm.http_filters.insert(0, jwt_authn_http_filter(&proto));
            debug!(filter_chain = %chain_name, "Inserted JWT authentication filter");
            Ok(true)
        }
        Some(index) if !config.has_requirement() => {
            hcm.http_filters.remove(index);
            debug!(filter_chain = %chain_name, "Removed JWT authentication filter");
            Ok(true)
        }
        Some(index) => {
            let mut existing: JwtAuthentication = match decode_jwt_authn_filter(&hcm.http_filters[index]) {
                Ok(existing) => existing,
                Err(e) => {
                    warn!(filter_chain = %chain_name, error = %e, "Failed to decode existing JWT authentication filter; skipping chain");
                    return Ok(false);
                }
            };
            config.apply_to(&mut existing)?;
            hcm.http_filters[index].config_type = jwt_authn_http_filter(&existing).config_type;
            debug!(filter_chain = %chain_name, "Updated JWT authentication filter");
            Ok(true)
        }
    }
}
