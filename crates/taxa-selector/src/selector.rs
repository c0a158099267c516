//! Cascading taxonomy chain selector
//!
//! Keeps one selection per rank and, for every rank, the list of nodes that
//! may be selected there given the parent chosen one rank up. Changing a
//! selection clears everything deeper and fetches the children of the new
//! node.
//!
//! All methods take `&self`. State sits behind a mutex that is never held
//! across a fetch; each rank carries a request generation so a result that
//! arrives after its rank was cleared, reloaded or the selector was closed
//! is dropped instead of installed.

use crate::error::SelectorError;
use futures::future::join_all;
use parking_lot::Mutex;
use serde::Serialize;
use taxa_client::{ServiceError, TaxonomyService};
use taxa_core::{
    Chain, Classification, LoadState, NodeId, RankMap, RankOptions, TaxonomicNode, TaxonomicRank,
};

/// Where a rank's options come from
#[derive(Debug, Clone, PartialEq, Eq)]
enum OptionSource {
    /// Every node at the root rank
    Root,
    /// Children of a selected node
    Children(NodeId),
}

/// Claim on a rank's next option install
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Ticket {
    rank: TaxonomicRank,
    generation: u64,
}

#[derive(Debug, Default)]
struct SelectorState {
    chain: Chain,
    options: RankMap<RankOptions>,
    generations: RankMap<u64>,
    closed: bool,
}

impl SelectorState {
    /// Invalidate any fetch in flight for `rank`
    fn bump(&mut self, rank: TaxonomicRank) -> u64 {
        let generation = self.generations.get_mut(rank);
        *generation += 1;
        *generation
    }

    /// Start a fetch for `rank`, superseding any in flight
    fn begin(&mut self, rank: TaxonomicRank) -> Ticket {
        let generation = self.bump(rank);
        self.options[rank].begin();
        Ticket { rank, generation }
    }

    fn is_current(&self, ticket: Ticket) -> bool {
        !self.closed && self.generations[ticket.rank] == ticket.generation
    }

    /// Drop the option lists of every rank strictly deeper than `rank`
    fn reset_after(&mut self, rank: TaxonomicRank) {
        for deeper in rank.descendants() {
            self.bump(deeper);
            self.options[deeper].reset();
        }
    }
}

/// One rank in a [`SelectorSnapshot`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankView {
    /// Rank
    pub rank: TaxonomicRank,
    /// Selected node
    pub selected: Option<TaxonomicNode>,
    /// Fetch state of the option list
    pub state: LoadState,
    /// Candidate nodes
    pub options: Vec<TaxonomicNode>,
}

/// Owned view of the whole selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectorSnapshot {
    /// Every rank, root first
    pub ranks: Vec<RankView>,
    /// Terminal classification
    pub classification: Classification,
    /// Whether the selector was closed
    pub closed: bool,
}

/// Per-rank taxonomy chain selector
#[derive(Debug)]
pub struct ChainSelector<S> {
    service: S,
    state: Mutex<SelectorState>,
}

impl<S: TaxonomyService> ChainSelector<S> {
    /// Build a selector without fetching anything
    ///
    /// With an `ancestry` the chain is rebuilt from it; otherwise it starts empty.
    #[must_use]
    pub fn new(service: S, ancestry: Option<&[TaxonomicNode]>) -> Self {
        let chain = ancestry.map_or_else(Chain::empty, Chain::from_ancestry);
        Self {
            service,
            state: Mutex::new(SelectorState {
                chain,
                ..SelectorState::default()
            }),
        }
    }

    /// Build a selector and load its initial option lists
    ///
    /// Load failures do not abort mounting: the failing ranks are left in
    /// [`LoadState::Failed`] and reported by [`Self::failures`].
    pub async fn mount(service: S, ancestry: Option<&[TaxonomicNode]>) -> Self {
        let selector = Self::new(service, ancestry);
        let failures = selector.load_initial().await;
        if !failures.is_empty() {
            tracing::warn!(failed = failures.len(), "taxonomy editor mounted with load failures");
        }
        selector
    }

    /// Fetch root options and replay the option lists implied by the chain
    ///
    /// Root options are always fetched. Then every rank whose parent is
    /// selected gets the parent's children, so the replay ends at the rank
    /// after the deepest selection. The fetches are independent and run
    /// concurrently.
    pub async fn load_initial(&self) -> Vec<SelectorError> {
        let plan = {
            let mut state = self.state.lock();
            if state.closed {
                return vec![SelectorError::Closed];
            }
            let mut plan = vec![(state.begin(TaxonomicRank::ROOT), OptionSource::Root)];
            for (rank, parent) in replay_plan(&state.chain) {
                plan.push((state.begin(rank), OptionSource::Children(parent)));
            }
            plan
        };

        tracing::debug!(fetches = plan.len(), "loading initial taxonomy options");
        join_all(plan.into_iter().map(|(ticket, source)| self.load(ticket, source)))
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }

    /// Select `node` at `rank`, or clear the rank with `None`
    ///
    /// Every deeper selection is cleared. Clearing also drops every deeper
    /// option list and fetches nothing. Selecting below the terminal rank
    /// fetches the node's children into the next rank.
    ///
    /// # Errors
    /// - `SelectorError::RankMismatch` if `node.rank != rank`
    /// - `SelectorError::MissingAncestor` if the parent rank has no selection
    /// - `SelectorError::Load` if the children could not be fetched; the
    ///   selection itself is kept
    /// - `SelectorError::Closed` after [`Self::close`]
    pub async fn select(&self, rank: TaxonomicRank, node: Option<TaxonomicNode>) -> Result<(), SelectorError> {
        let (ticket, parent_id) = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(SelectorError::Closed);
            }

            let Some(node) = node else {
                state.chain.select(rank, None);
                state.reset_after(rank);
                tracing::debug!(rank = %rank, "cleared selection");
                return Ok(());
            };

            if node.rank != rank {
                return Err(SelectorError::RankMismatch {
                    node: node.id,
                    expected: rank,
                    actual: node.rank,
                });
            }
            if let Some(parent) = rank.parent() {
                if !state.chain.is_selected(parent) {
                    return Err(SelectorError::MissingAncestor { rank, parent });
                }
            }

            tracing::debug!(rank = %rank, node = %node.id, "selected");
            let parent_id = node.id.clone();
            state.chain.select(rank, Some(node));

            let Some(child) = rank.child() else {
                return Ok(());
            };
            state.reset_after(rank);
            (state.begin(child), parent_id)
        };

        self.load(ticket, OptionSource::Children(parent_id)).await
    }

    /// Refresh one rank's option list without touching the chain
    ///
    /// The root rank always refetches every root node. Other ranks fetch the
    /// children of `parent_id`, or become empty when no parent is given.
    ///
    /// # Errors
    /// - `SelectorError::Load` if the fetch failed; the previous options are kept
    /// - `SelectorError::Closed` after [`Self::close`]
    pub async fn reload_options(&self, rank: TaxonomicRank, parent_id: Option<&NodeId>) -> Result<(), SelectorError> {
        let (ticket, source) = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(SelectorError::Closed);
            }

            let source = match (rank.is_root(), parent_id) {
                (true, _) => OptionSource::Root,
                (false, Some(parent)) => OptionSource::Children(parent.clone()),
                (false, None) => {
                    state.bump(rank);
                    state.options[rank].install(Vec::new());
                    return Ok(());
                }
            };
            (state.begin(rank), source)
        };

        self.load(ticket, source).await
    }

    /// Replace a selected node's display data after a rename
    ///
    /// Returns whether the chain held the node.
    pub fn refresh(&self, node: &TaxonomicNode) -> bool {
        self.state.lock().chain.refresh(node)
    }

    /// Tear the selector down; results still in flight are discarded
    ///
    /// Ranks that were loading go back to `Idle` and keep their options.
    pub fn close(&self) {
        let mut state = self.state.lock();
        state.closed = true;
        for rank in TaxonomicRank::ALL {
            state.bump(rank);
            state.options[rank].abandon();
        }
        tracing::debug!("taxonomy selector closed");
    }

    /// Whether [`Self::close`] was called
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    /// Underlying taxonomy service
    #[inline]
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Copy of the current chain
    #[must_use]
    pub fn chain(&self) -> Chain {
        self.state.lock().chain.clone()
    }

    /// Selected node at a rank
    #[must_use]
    pub fn selected(&self, rank: TaxonomicRank) -> Option<TaxonomicNode> {
        self.state.lock().chain.get(rank).cloned()
    }

    /// Candidate nodes for a rank
    #[must_use]
    pub fn options(&self, rank: TaxonomicRank) -> Vec<TaxonomicNode> {
        self.state.lock().options[rank].options().to_vec()
    }

    /// Load state of a rank's option list
    #[must_use]
    pub fn load_state(&self, rank: TaxonomicRank) -> LoadState {
        self.state.lock().options[rank].state().clone()
    }

    /// Whether a fetch for the rank is in flight
    #[must_use]
    pub fn is_loading(&self, rank: TaxonomicRank) -> bool {
        self.state.lock().options[rank].state().is_loading()
    }

    /// Whether the rank can take a selection (root, or parent selected)
    #[must_use]
    pub fn is_selectable(&self, rank: TaxonomicRank) -> bool {
        let state = self.state.lock();
        rank.parent().map_or(true, |parent| state.chain.is_selected(parent))
    }

    /// Selected node of the parent rank, which the rank's options derive from
    #[must_use]
    pub fn parent_of(&self, rank: TaxonomicRank) -> Option<TaxonomicNode> {
        let state = self.state.lock();
        rank.parent().and_then(|parent| state.chain.get(parent).cloned())
    }

    /// Deepest selected node
    #[must_use]
    pub fn terminal(&self) -> Option<TaxonomicNode> {
        self.state.lock().chain.terminal().cloned()
    }

    /// Classification to submit with a plant record
    #[must_use]
    pub fn classification(&self) -> Classification {
        self.state.lock().chain.classification()
    }

    /// Ranks whose last fetch failed, with the failure message
    #[must_use]
    pub fn failures(&self) -> Vec<(TaxonomicRank, String)> {
        let state = self.state.lock();
        state
            .options
            .iter()
            .filter_map(|(rank, options)| options.state().error().map(|msg| (rank, msg.to_string())))
            .collect()
    }

    /// Owned view of every rank
    #[must_use]
    pub fn snapshot(&self) -> SelectorSnapshot {
        let state = self.state.lock();
        let ranks = state
            .options
            .iter()
            .map(|(rank, options)| RankView {
                rank,
                selected: state.chain.get(rank).cloned(),
                state: options.state().clone(),
                options: options.options().to_vec(),
            })
            .collect();

        SelectorSnapshot {
            ranks,
            classification: state.chain.classification(),
            closed: state.closed,
        }
    }

    async fn fetch(&self, source: &OptionSource) -> Result<Vec<TaxonomicNode>, ServiceError> {
        match source {
            OptionSource::Root => self.service.list_by_rank(TaxonomicRank::ROOT).await,
            OptionSource::Children(parent) => self.service.list_by_parent(parent).await,
        }
    }

    async fn load(&self, ticket: Ticket, source: OptionSource) -> Result<(), SelectorError> {
        let rank = ticket.rank;
        let result = self.fetch(&source).await;

        let mut state = self.state.lock();
        if !state.is_current(ticket) {
            tracing::debug!(rank = %rank, ?source, "discarding stale taxonomy options");
            return Ok(());
        }

        match result {
            Ok(options) => {
                tracing::debug!(rank = %rank, count = options.len(), "installed taxonomy options");
                state.options[rank].install(options);
                Ok(())
            }
            Err(source) => {
                tracing::warn!(rank = %rank, error = %source, "failed to load taxonomy options");
                state.options[rank].fail(format!("failed to load taxonomy for rank {rank}: {source}"));
                Err(SelectorError::Load { rank, source })
            }
        }
    }
}

/// Option fetches implied by a chain
///
/// Every selected rank above the terminal one feeds its children to the
/// next rank. For a chain without gaps this is exactly the run from the
/// first selected rank down to the rank after the deepest selection.
fn replay_plan(chain: &Chain) -> Vec<(TaxonomicRank, NodeId)> {
    chain
        .iter()
        .filter_map(|(rank, selected)| Some((rank.child()?, selected?.id.clone())))
        .collect()
}
