//! Option-list cache using moka
//!
//! Wraps any [`TaxonomyService`] and caches list results. Mutations drop
//! every cached list, so a reload after create/rename/delete always reaches
//! the inner service. A fetch that overlaps a mutation is returned to its
//! caller but never kept.

use crate::config::ClientConfig;
use crate::error::ServiceError;
use crate::service::TaxonomyService;
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};

/// Cache key: which list was requested
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ListKey {
    Rank(TaxonomicRank),
    Children(NodeId),
}

/// Statistics for cache monitoring
#[derive(Debug, Clone, Copy, Default)]
pub struct CacheStats {
    /// Number of cached lists
    pub entry_count: u64,
}

/// Caching decorator over a taxonomy service
#[derive(Debug, Clone)]
pub struct CachedTaxonomyService<S> {
    inner: S,
    lists: Cache<ListKey, Arc<Vec<TaxonomicNode>>>,
    /// Bumped on every invalidation, shared by clones
    epoch: Arc<AtomicU64>,
}

impl<S: TaxonomyService> CachedTaxonomyService<S> {
    /// Wrap with a bounded, time-limited cache
    #[inline]
    #[must_use]
    pub fn new(inner: S, max_capacity: u64, ttl: Duration) -> Self {
        Self {
            inner,
            lists: Cache::builder()
                .max_capacity(max_capacity)
                .time_to_live(ttl)
                .build(),
            epoch: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Wrap using the capacity and TTL from configuration
    ///
    /// Returns `None` when the configured TTL disables caching.
    #[must_use]
    pub fn from_config(inner: S, config: &ClientConfig) -> Option<Self> {
        config
            .cache_ttl()
            .map(|ttl| Self::new(inner, config.cache_capacity, ttl))
    }

    /// Wrapped service
    #[inline]
    #[must_use]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Drop every cached list
    #[inline]
    pub fn invalidate_all(&self) {
        self.epoch.fetch_add(1, Ordering::SeqCst);
        self.lists.invalidate_all();
    }

    /// Cache statistics
    #[inline]
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            entry_count: self.lists.entry_count(),
        }
    }

    async fn cached<F, Fut>(&self, key: ListKey, fetch: F) -> Result<Vec<TaxonomicNode>, ServiceError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<Vec<TaxonomicNode>, ServiceError>>,
    {
        if let Some(hit) = self.lists.get(&key).await {
            tracing::trace!(?key, "option list cache hit");
            return Ok(hit.as_ref().clone());
        }

        let epoch = self.epoch.load(Ordering::SeqCst);
        let fresh = fetch().await?;
        if self.epoch.load(Ordering::SeqCst) != epoch {
            tracing::debug!(?key, "option list fetched across an invalidation, not cached");
            return Ok(fresh);
        }

        self.lists.insert(key.clone(), Arc::new(fresh.clone())).await;
        // An invalidation may have landed between the check and the insert
        if self.epoch.load(Ordering::SeqCst) != epoch {
            self.lists.invalidate(&key).await;
        }
        Ok(fresh)
    }
}

#[async_trait]
impl<S: TaxonomyService> TaxonomyService for CachedTaxonomyService<S> {
    async fn list_by_rank(&self, rank: TaxonomicRank) -> Result<Vec<TaxonomicNode>, ServiceError> {
        self.cached(ListKey::Rank(rank), || self.inner.list_by_rank(rank))
            .await
    }

    async fn list_by_parent(&self, parent_id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError> {
        self.cached(ListKey::Children(parent_id.clone()), || {
            self.inner.list_by_parent(parent_id)
        })
        .await
    }

    async fn get(&self, id: &NodeId) -> Result<TaxonomicNode, ServiceError> {
        self.inner.get(id).await
    }

    async fn create(&self, request: NewTaxon) -> Result<TaxonomicNode, ServiceError> {
        let created = self.inner.create(request).await?;
        self.invalidate_all();
        Ok(created)
    }

    async fn rename(&self, id: &NodeId, name: &str) -> Result<TaxonomicNode, ServiceError> {
        let renamed = self.inner.rename(id, name).await?;
        self.invalidate_all();
        Ok(renamed)
    }

    async fn delete(&self, id: &NodeId) -> Result<(), ServiceError> {
        self.inner.delete(id).await?;
        self.invalidate_all();
        Ok(())
    }
}
