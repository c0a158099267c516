//! Taxonomy service contract
//!
//! The remote store owns every node. Implementations are plain
//! request/response; callers handle failures.

use crate::error::ServiceError;
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};

/// Remote taxonomy store
#[async_trait]
pub trait TaxonomyService: Send + Sync {
    /// All nodes at a rank, across every parent
    async fn list_by_rank(&self, rank: TaxonomicRank) -> Result<Vec<TaxonomicNode>, ServiceError>;

    /// Immediate children of a node
    async fn list_by_parent(&self, parent_id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError>;

    /// A single node
    async fn get(&self, id: &NodeId) -> Result<TaxonomicNode, ServiceError>;

    /// Create a node and return it as stored
    async fn create(&self, request: NewTaxon) -> Result<TaxonomicNode, ServiceError>;

    /// Change a node's display name; identity and position are unchanged
    async fn rename(&self, id: &NodeId, name: &str) -> Result<TaxonomicNode, ServiceError>;

    /// Remove a node; the store handles its descendants
    async fn delete(&self, id: &NodeId) -> Result<(), ServiceError>;
}

#[async_trait]
impl<S: TaxonomyService + ?Sized> TaxonomyService for Arc<S> {
    async fn list_by_rank(&self, rank: TaxonomicRank) -> Result<Vec<TaxonomicNode>, ServiceError> {
        (**self).list_by_rank(rank).await
    }

    async fn list_by_parent(&self, parent_id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError> {
        (**self).list_by_parent(parent_id).await
    }

    async fn get(&self, id: &NodeId) -> Result<TaxonomicNode, ServiceError> {
        (**self).get(id).await
    }

    async fn create(&self, request: NewTaxon) -> Result<TaxonomicNode, ServiceError> {
        (**self).create(request).await
    }

    async fn rename(&self, id: &NodeId, name: &str) -> Result<TaxonomicNode, ServiceError> {
        (**self).rename(id, name).await
    }

    async fn delete(&self, id: &NodeId) -> Result<(), ServiceError> {
        (**self).delete(id).await
    }
}

/// Rebuild the ancestry of a node by following parent pointers
///
/// Returns the nodes root first, ending with `id` itself.
///
/// # Errors
/// - any error from [`TaxonomyService::get`]
/// - `ServiceError::CorruptHierarchy` on a cycle or a path longer than the rank list
pub async fn resolve_ancestry<S>(service: &S, id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError>
where
    S: TaxonomyService + ?Sized,
{
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    let mut next = Some(id.clone());

    while let Some(current) = next {
        if !seen.insert(current.clone()) || path.len() >= TaxonomicRank::COUNT {
            return Err(ServiceError::CorruptHierarchy(current));
        }
        let node = service.get(&current).await?;
        // A parent always sits at a shallower rank than its child.
        if path.last().is_some_and(|child: &TaxonomicNode| node.rank >= child.rank) {
            return Err(ServiceError::CorruptHierarchy(current));
        }
        next = node.parent_id.clone();
        path.push(node);
    }

    path.reverse();
    tracing::debug!(node = %id, depth = path.len(), "resolved ancestry");
    Ok(path)
}
