//! Error types for the chain selector
//!
//! No error is fatal: every failure is local to the operation attempted and
//! leaves the chain and option lists in their last known good state.

use taxa_client::ServiceError;
use taxa_core::{NodeId, TaxonomicRank};

/// Selector and editor errors
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// Option list for a rank could not be fetched
    #[error("failed to load taxonomy for rank {rank}")]
    Load {
        /// Rank whose options were requested
        rank: TaxonomicRank,
        /// Underlying service failure
        #[source]
        source: ServiceError,
    },

    /// Create, rename or delete failed
    #[error("taxonomy service error: {0}")]
    Service(#[from] ServiceError),

    /// Node offered for a rank it does not belong to
    #[error("node {node} is a {actual}, not a {expected}")]
    RankMismatch {
        /// Offending node
        node: NodeId,
        /// Rank the caller targeted
        expected: TaxonomicRank,
        /// Rank the node carries
        actual: TaxonomicRank,
    },

    /// Rank targeted before its parent rank has a selection
    #[error("cannot use rank {rank} before a {parent} is selected")]
    MissingAncestor {
        /// Rank the caller targeted
        rank: TaxonomicRank,
        /// Parent rank with no selection
        parent: TaxonomicRank,
    },

    /// Empty or blank node name
    #[error("invalid taxon name: {0:?}")]
    InvalidName(String),

    /// Editor already torn down
    #[error("selector is closed")]
    Closed,
}

impl SelectorError {
    /// Rank this error concerns, if any
    #[must_use]
    pub fn rank(&self) -> Option<TaxonomicRank> {
        match self {
            Self::Load { rank, .. } | Self::MissingAncestor { rank, .. } => Some(*rank),
            Self::RankMismatch { expected, .. } => Some(*expected),
            _ => None,
        }
    }

    /// Whether the same call may succeed if repeated
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Load { source, .. } | Self::Service(source) => source.is_retryable(),
            _ => false,
        }
    }
}
