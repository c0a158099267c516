//! Testing utilities for the taxa workspace
//!
//! An in-memory [`TaxonomyService`] that records every call, can be told to
//! fail or to hold a fetch until released, plus a seeded rose lineage.

#![allow(missing_docs)]

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;
use taxa_client::{ServiceError, TaxonomyService};
use taxa_core::{NewTaxon, NodeId, TaxonomicNode, TaxonomicRank};
use tokio::sync::Notify;

/// One recorded service call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListByRank(TaxonomicRank),
    ListByParent(NodeId),
    Get(NodeId),
    Create(String),
    Rename(NodeId, String),
    Delete(NodeId),
}

#[derive(Debug, Default)]
struct Store {
    nodes: BTreeMap<NodeId, TaxonomicNode>,
    next_id: u64,
    calls: Vec<Call>,
    failing_parents: HashSet<NodeId>,
    failing_ranks: HashSet<TaxonomicRank>,
    fail_mutations: bool,
    gates: HashMap<NodeId, Arc<Notify>>,
    rank_holds: HashMap<TaxonomicRank, Arc<Notify>>,
}

/// In-memory taxonomy store
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaxonomyService {
    store: Arc<Mutex<Store>>,
}

impl InMemoryTaxonomyService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nodes(nodes: impl IntoIterator<Item = TaxonomicNode>) -> Self {
        let service = Self::new();
        for node in nodes {
            service.insert(node);
        }
        service
    }

    pub fn insert(&self, node: TaxonomicNode) {
        self.store.lock().nodes.insert(node.id.clone(), node);
    }

    pub fn node(&self, id: &str) -> Option<TaxonomicNode> {
        self.store.lock().nodes.get(&NodeId::new(id)).cloned()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.store.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.store.lock().calls.clear();
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.store.lock().calls.iter().filter(|c| pred(c)).count()
    }

    /// Make `list_by_parent(id)` fail until [`Self::heal`]
    pub fn fail_children_of(&self, id: &str) {
        self.store.lock().failing_parents.insert(NodeId::new(id));
    }

    /// Make `list_by_rank(rank)` fail until [`Self::heal`]
    pub fn fail_rank(&self, rank: TaxonomicRank) {
        self.store.lock().failing_ranks.insert(rank);
    }

    /// Make create/rename/delete fail until [`Self::heal`]
    pub fn fail_mutations(&self) {
        self.store.lock().fail_mutations = true;
    }

    /// Clear every injected failure
    pub fn heal(&self) {
        let mut store = self.store.lock();
        store.failing_parents.clear();
        store.failing_ranks.clear();
        store.fail_mutations = false;
    }

    /// Hold `list_by_parent(id)` until the returned handle is notified
    pub fn gate_children_of(&self, id: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.store
            .lock()
            .gates
            .insert(NodeId::new(id), Arc::clone(&gate));
        gate
    }

    /// Let `list_by_rank(rank)` read the store, then hold its answer until
    /// the returned handle is notified
    pub fn hold_rank_after_read(&self, rank: TaxonomicRank) -> Arc<Notify> {
        let hold = Arc::new(Notify::new());
        self.store.lock().rank_holds.insert(rank, Arc::clone(&hold));
        hold
    }

    fn record(&self, call: Call) {
        self.store.lock().calls.push(call);
    }

    fn sorted(mut nodes: Vec<TaxonomicNode>) -> Vec<TaxonomicNode> {
        nodes.sort_by(|a, b| a.name.cmp(&b.name));
        nodes
    }

    fn check_mutations(&self) -> Result<(), ServiceError> {
        if self.store.lock().fail_mutations {
            return Err(ServiceError::Unavailable("mutations disabled".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl TaxonomyService for InMemoryTaxonomyService {
    async fn list_by_rank(&self, rank: TaxonomicRank) -> Result<Vec<TaxonomicNode>, ServiceError> {
        self.record(Call::ListByRank(rank));
        let (nodes, hold) = {
            let mut store = self.store.lock();
            if store.failing_ranks.contains(&rank) {
                return Err(ServiceError::Unavailable(format!("rank {rank} offline")));
            }
            let nodes: Vec<_> = store.nodes.values().filter(|n| n.rank == rank).cloned().collect();
            (nodes, store.rank_holds.remove(&rank))
        };
        if let Some(hold) = hold {
            hold.notified().await;
        }
        Ok(Self::sorted(nodes))
    }

    async fn list_by_parent(&self, parent_id: &NodeId) -> Result<Vec<TaxonomicNode>, ServiceError> {
        self.record(Call::ListByParent(parent_id.clone()));
        let gate = self.store.lock().gates.remove(parent_id);
        if let Some(gate) = gate {
            gate.notified().await;
        }

        let store = self.store.lock();
        if store.failing_parents.contains(parent_id) {
            return Err(ServiceError::Unavailable(format!("children of {parent_id} offline")));
        }
        let nodes = store
            .nodes
            .values()
            .filter(|n| n.parent_id.as_ref() == Some(parent_id))
            .cloned()
            .collect();
        Ok(Self::sorted(nodes))
    }

    async fn get(&self, id: &NodeId) -> Result<TaxonomicNode, ServiceError> {
        self.record(Call::Get(id.clone()));
        self.store
            .lock()
            .nodes
            .get(id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    async fn create(&self, request: NewTaxon) -> Result<TaxonomicNode, ServiceError> {
        self.record(Call::Create(request.name.clone()));
        self.check_mutations()?;

        let mut store = self.store.lock();
        if let Some(parent) = &request.parent_id {
            if !store.nodes.contains_key(parent) {
                return Err(ServiceError::NotFound(parent.clone()));
            }
        }
        store.next_id += 1;
        let node = TaxonomicNode {
            id: NodeId::new(format!("new-{}", store.next_id)),
            name: request.name,
            rank: request.rank,
            parent_id: request.parent_id,
        };
        store.nodes.insert(node.id.clone(), node.clone());
        Ok(node)
    }

    async fn rename(&self, id: &NodeId, name: &str) -> Result<TaxonomicNode, ServiceError> {
        self.record(Call::Rename(id.clone(), name.to_string()));
        self.check_mutations()?;

        let mut store = self.store.lock();
        let node = store
            .nodes
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))?;
        node.name = name.to_string();
        Ok(node.clone())
    }

    async fn delete(&self, id: &NodeId) -> Result<(), ServiceError> {
        self.record(Call::Delete(id.clone()));
        self.check_mutations()?;

        let mut store = self.store.lock();
        if store.nodes.remove(id).is_none() {
            return Err(ServiceError::NotFound(id.clone()));
        }
        // The store owns referential consequences: drop the whole subtree.
        let mut doomed = vec![id.clone()];
        while let Some(parent) = doomed.pop() {
            let children: Vec<NodeId> = store
                .nodes
                .values()
                .filter(|n| n.parent_id.as_ref() == Some(&parent))
                .map(|n| n.id.clone())
                .collect();
            for child in children {
                store.nodes.remove(&child);
                doomed.push(child);
            }
        }
        Ok(())
    }
}

/// Names of the seeded rose lineage, root first
pub const ROSE_LINEAGE: [(&str, &str); TaxonomicRank::COUNT] = [
    ("eukaryota", "Eukaryota"),
    ("plantae", "Plantae"),
    ("viridiplantae", "Viridiplantae"),
    ("tracheophyta", "Tracheophyta"),
    ("spermatophytina", "Spermatophytina"),
    ("angiospermae", "Angiospermae"),
    ("magnoliopsida", "Magnoliopsida"),
    ("rosidae", "Rosidae"),
    ("rosales", "Rosales"),
    ("rosineae", "Rosineae"),
    ("rosaceae", "Rosaceae"),
    ("rosoideae", "Rosoideae"),
    ("roseae", "Roseae"),
    ("rosinae", "Rosinae"),
    ("rosa", "Rosa"),
    ("rosa-subg-rosa", "Rosa subg. Rosa"),
    ("caninae", "Caninae"),
    ("rosa-canina", "Rosa canina"),
];

/// Full rose lineage, one node per rank, root first
pub fn rose_lineage() -> Vec<TaxonomicNode> {
    let mut parent: Option<NodeId> = None;
    TaxonomicRank::ALL
        .iter()
        .zip(ROSE_LINEAGE)
        .map(|(rank, (id, name))| TaxonomicNode {
            id: NodeId::new(id),
            name: name.to_string(),
            rank: *rank,
            parent_id: parent.replace(NodeId::new(id)),
        })
        .collect()
}

/// Node of the rose lineage at a rank
pub fn rose(rank: TaxonomicRank) -> TaxonomicNode {
    rose_lineage().swap_remove(rank.index())
}

/// Rose lineage plus a few siblings at the root, family, genus and species ranks
pub fn seeded_service() -> InMemoryTaxonomyService {
    let service = InMemoryTaxonomyService::with_nodes(rose_lineage());
    service.insert(TaxonomicNode::new("bacteria", "Bacteria", TaxonomicRank::Domain));
    service.insert(
        TaxonomicNode::new("ulmaceae", "Ulmaceae", TaxonomicRank::Family).with_parent("rosineae"),
    );
    service.insert(
        TaxonomicNode::new("hulthemia", "Hulthemia", TaxonomicRank::Genus).with_parent("rosinae"),
    );
    service.insert(
        TaxonomicNode::new("rosa-rubiginosa", "Rosa rubiginosa", TaxonomicRank::Species)
            .with_parent("caninae"),
    );
    service
}
