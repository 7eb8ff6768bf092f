//! Shared upstream cluster cache
//!
//! The listener hook repopulates the cache from scratch on every run; the
//! translate hook reads it to materialize managed clusters. Both hooks may
//! run concurrently for different listeners, so access goes through an
//! async reader/writer lock.

use crate::xds::url_cluster::UpstreamDescriptor;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

type Descriptors = BTreeMap<String, UpstreamDescriptor>;

/// Upstream descriptors keyed by canonical cluster name
#[derive(Debug, Clone, Default)]
pub struct ClusterCache {
    inner: Arc<RwLock<Descriptors>>,
}

impl ClusterCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a repopulation cycle.
    ///
    /// The cache is cleared immediately and stays exclusively locked until
    /// the returned writer is dropped, so readers never observe a partially
    /// rebuilt cache.
    pub async fn begin_cycle(&self) -> CycleWriter<'_> {
        let mut guard = self.inner.write().await;
        guard.clear();
        CycleWriter { guard }
    }

    /// Consistent read view of the current descriptors
    pub async fn snapshot(&self) -> CacheSnapshot<'_> {
        CacheSnapshot { guard: self.inner.read().await }
    }

    /// Owned copy of the current descriptors, in name order
    pub async fn descriptors(&self) -> Vec<UpstreamDescriptor> {
        self.inner.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

/// Exclusive handle used while repopulating the cache
pub struct CycleWriter<'a> {
    guard: RwLockWriteGuard<'a, Descriptors>,
}

impl CycleWriter<'_> {
    /// Record an upstream. Re-inserting an existing name replaces it.
    pub fn insert(&mut self, descriptor: UpstreamDescriptor) {
        self.guard.insert(descriptor.name.clone(), descriptor);
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

/// Shared read handle over the cache
pub struct CacheSnapshot<'a> {
    guard: RwLockReadGuard<'a, Descriptors>,
}

impl CacheSnapshot<'_> {
    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &UpstreamDescriptor> {
        self.guard.values()
    }
}
