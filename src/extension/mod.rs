//! # Gateway Extension Hooks
//!
//! The gateway calls these hooks while it generates Envoy configuration:
//!
//! - `PostHTTPListenerModify`: installs the JWT filter for the providers
//!   attached to a listener and records their JWKS upstreams
//! - `PostTranslateModify`: adds one cluster per recorded upstream
//! - `PostVirtualHostModify`: points every route at the shared requirement
//! - `PostRouteModify`: returns the route unchanged
//!
//! The listener and translate hooks share state through [`ClusterCache`].

pub mod annotator;
pub mod cache;
pub mod discovery;
pub mod proto;
pub mod server;
pub mod service;
pub mod synchronizer;
pub mod translator;

pub use annotator::{annotate_routes, strip_routes};
pub use cache::ClusterCache;
pub use discovery::{JwksDiscovery, OidcDiscoveryClient};
pub use server::{serve_listener, start_extension_server};
pub use synchronizer::ClusterSynchronizer;
pub use translator::{JwtProviderTranslator, TranslationSummary};

use crate::config::FeatureGates;
use crate::domain::{ResourceSet, TypedResource};
use crate::errors::Result;
use crate::hook_span;
use proto::{
    ExtensionResource, PostHttpListenerModifyRequest, PostHttpListenerModifyResponse,
    PostRouteModifyRequest, PostRouteModifyResponse, PostTranslateModifyRequest,
    PostTranslateModifyResponse, PostVirtualHostModifyRequest, PostVirtualHostModifyResponse,
};
use std::sync::Arc;
use tracing::{debug, info, warn, Instrument};

/// Handler behind the extension gRPC service
#[derive(Clone)]
pub struct GatewayExtension {
    features: FeatureGates,
    cache: ClusterCache,
    translator: JwtProviderTranslator,
    synchronizer: ClusterSynchronizer,
}

impl GatewayExtension {
    pub fn new(features: FeatureGates, discovery: Arc<dyn JwksDiscovery>) -> Self {
        let cache = ClusterCache::new();
        let translator =
            JwtProviderTranslator::new(cache.clone(), discovery, features.allow_missing_fallback());
        let synchronizer = ClusterSynchronizer::new(cache.clone());

        Self { features, cache, translator, synchronizer }
    }

    pub fn cache(&self) -> &ClusterCache {
        &self.cache
    }

    pub fn features(&self) -> &FeatureGates {
        &self.features
    }

    /// Decode the resources attached to a hook, skipping anything unusable
    pub fn decode_resources(resources: &[ExtensionResource]) -> ResourceSet {
        let mut set = ResourceSet::default();

        for (index, resource) in resources.iter().enumerate() {
            match TypedResource::decode(&resource.unstructured_bytes) {
                Ok(Some(typed)) => set.push(typed),
                Ok(None) => {
                    debug!(index, "Skipping extension resource of unsupported kind");
                }
                Err(e) => {
                    warn!(index, error = %e, "Failed to decode extension resource; skipping");
                }
            }
        }

        set
    }

    pub async fn post_http_listener_modify(
        &self,
        request: PostHttpListenerModifyRequest,
    ) -> Result<PostHttpListenerModifyResponse> {
        let listener_name = request.listener.as_ref().map(|l| l.name.clone()).unwrap_or_default();
        let span = hook_span!("PostHTTPListenerModify", listener = %listener_name);
        self.listener_modify(request).instrument(span).await
    }

    async fn listener_modify(
        &self,
        request: PostHttpListenerModifyRequest,
    ) -> Result<PostHttpListenerModifyResponse> {
        debug!(request = ?request, "Received listener modify request");

        let PostHttpListenerModifyRequest { listener, post_listener_context } = request;
        let Some(mut listener) = listener else {
            debug!("No listener in request; nothing to do");
            return Ok(PostHttpListenerModifyResponse { listener: None });
        };

        if self.features.jwt_computation_disabled() {
            info!(listener = %listener.name, "JWT provider computation disabled; returning listener unchanged");
            return Ok(PostHttpListenerModifyResponse { listener: Some(listener) });
        }

        let resources = match post_listener_context {
            Some(context) if !context.extension_resources.is_empty() => context.extension_resources,
            _ => {
                debug!(listener = %listener.name, "No extension resources attached; returning listener unchanged");
                return Ok(PostHttpListenerModifyResponse { listener: Some(listener) });
            }
        };

        let set = Self::decode_resources(&resources);
        let summary = self.translator.translate(&set.jwt_providers, &mut listener).await?;

        info!(
            listener = %listener.name,
            providers = summary.providers,
            chains_updated = summary.chains_updated,
            "Listener modify complete"
        );
        Ok(PostHttpListenerModifyResponse { listener: Some(listener) })
    }

    pub async fn post_translate_modify(
        &self,
        request: PostTranslateModifyRequest,
    ) -> Result<PostTranslateModifyResponse> {
        let span = hook_span!("PostTranslateModify", clusters = request.clusters.len());
        self.translate_modify(request).instrument(span).await
    }

    async fn translate_modify(
        &self,
        request: PostTranslateModifyRequest,
    ) -> Result<PostTranslateModifyResponse> {
        let PostTranslateModifyRequest { clusters, secrets, .. } = request;

        let clusters = if self.features.jwt_computation_disabled() {
            info!("JWT provider computation disabled; removing managed clusters");
            self.synchronizer.strip(clusters)
        } else {
            self.synchronizer.synchronize(clusters).await
        };

        debug!(clusters = clusters.len(), secrets = secrets.len(), "Translate modify complete");
        Ok(PostTranslateModifyResponse { clusters, secrets })
    }

    pub async fn post_virtual_host_modify(
        &self,
        request: PostVirtualHostModifyRequest,
    ) -> Result<PostVirtualHostModifyResponse> {
        let name = request.virtual_host.as_ref().map(|vh| vh.name.clone()).unwrap_or_default();
        let span = hook_span!("PostVirtualHostModify", virtual_host = %name);
        self.virtual_host_modify(request).instrument(span).await
    }

    async fn virtual_host_modify(
        &self,
        request: PostVirtualHostModifyRequest,
    ) -> Result<PostVirtualHostModifyResponse> {
        let Some(mut virtual_host) = request.virtual_host else {
            debug!("No virtual host in request; nothing to do");
            return Ok(PostVirtualHostModifyResponse { virtual_host: None });
        };

        if self.features.jwt_computation_disabled() {
            info!(virtual_host = %virtual_host.name, "JWT provider computation disabled; clearing route annotations");
            strip_routes(&mut virtual_host.routes);
        } else {
            let annotated = annotate_routes(&mut virtual_host.routes)?;
            info!(
                virtual_host = %virtual_host.name,
                routes = virtual_host.routes.len(),
                annotated,
                "Virtual host modify complete"
            );
        }

        Ok(PostVirtualHostModifyResponse { virtual_host: Some(virtual_host) })
    }

    pub async fn post_route_modify(
        &self,
        request: PostRouteModifyRequest,
    ) -> Result<PostRouteModifyResponse> {
        let span = hook_span!("PostRouteModify");
        async move {
            debug!("Route modify is a pass-through");
            Ok(PostRouteModifyResponse { route: request.route })
        }
        .instrument(span)
        .await
    }
}
