//! Cluster list reconciliation for the translate hook
//!
//! Replaces managed clusters left over from earlier runs with one cluster per
//! upstream currently recorded in the cache.

use crate::extension::cache::ClusterCache;
use crate::xds::cluster::{build_managed_cluster, strip_managed_clusters};
use envoy_types::pb::envoy::config::cluster::v3::Cluster;
use tracing::{debug, info};

/// Merges cached JWKS upstreams into the gateway's cluster list
#[derive(Debug, Clone)]
pub struct ClusterSynchronizer {
    cache: ClusterCache,
}

impl ClusterSynchronizer {
    pub fn new(cache: ClusterCache) -> Self {
        Self { cache }
    }

    /// Reconcile `clusters` with the cache.
    ///
    /// An empty cache returns the input untouched. Otherwise managed clusters
    /// are dropped and rebuilt from the cache in name order, after the
    /// declared clusters.
    pub async fn synchronize(&self, clusters: Vec<Cluster>) -> Vec<Cluster> {
        let snapshot = self.cache.snapshot().await;
        if snapshot.is_empty() {
            debug!(clusters = clusters.len(), "No cached JWKS upstreams; clusters unchanged");
            return clusters;
        }

        let declared = clusters.len();
        let mut merged = strip_managed_clusters(clusters);
        let stale = declared - merged.len();

        merged.extend(snapshot.iter().map(|descriptor| {
            debug!(
                cluster = %descriptor.managed_name(),
                hostname = %descriptor.hostname,
                tls = descriptor.tls,
                "Synthesizing JWKS cluster"
            );
            build_managed_cluster(descriptor)
        }));

        info!(
            declared,
            stale_removed = stale,
            synthesized = snapshot.len(),
            total = merged.len(),
            "Synchronized JWKS clusters"
        );
        merged
    }

    /// Drop every managed cluster without adding any
    pub fn strip(&self, clusters: Vec<Cluster>) -> Vec<Cluster> {
        strip_managed_clusters(clusters)
    }
}
