//! Per-rank option lists and their load state

use crate::node::TaxonomicNode;
use serde::{Deserialize, Serialize};

/// Fetch state of one rank's option list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum LoadState {
    /// Nothing requested
    #[default]
    Idle,
    /// Fetch in flight
    Loading,
    /// Options reflect the last successful fetch
    Loaded,
    /// Last fetch failed; options hold the last known good list
    Failed(String),
}

impl LoadState {
    /// Whether a fetch is in flight
    #[inline]
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// Failure message, if the last fetch failed
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Candidate nodes for one rank
///
/// Derived data: always re-fetchable from the taxonomy service.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankOptions {
    state: LoadState,
    options: Vec<TaxonomicNode>,
}

impl RankOptions {
    /// Current load state
    #[inline]
    #[must_use]
    pub fn state(&self) -> &LoadState {
        &self.state
    }

    /// Candidate nodes
    #[inline]
    #[must_use]
    pub fn options(&self) -> &[TaxonomicNode] {
        &self.options
    }

    /// Whether a node with this id is a candidate
    #[must_use]
    pub fn contains(&self, node: &TaxonomicNode) -> bool {
        self.options.iter().any(|candidate| candidate.id == node.id)
    }

    /// Mark a fetch as started; current options stay visible
    pub fn begin(&mut self) {
        self.state = LoadState::Loading;
    }

    /// Install a fetched list
    pub fn install(&mut self, options: Vec<TaxonomicNode>) {
        self.options = options;
        self.state = LoadState::Loaded;
    }

    /// Record a failed fetch, keeping the last known good options
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = LoadState::Failed(message.into());
    }

    /// Forget a fetch that will never be installed
    ///
    /// A loading list returns to `Idle` with its options kept. Any other
    /// state is left alone.
    pub fn abandon(&mut self) {
        if self.state.is_loading() {
            self.state = LoadState::Idle;
        }
    }

    /// Drop the list entirely
    pub fn reset(&mut self) {
        self.options.clear();
        self.state = LoadState::Idle;
    }
}
