//! Error types for taxa core

/// Errors raised by rank and chain helpers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// Rank name not in the fixed rank list
    #[error("unknown taxonomic rank: '{0}'")]
    UnknownRank(String),

    /// Rank position outside the fixed rank list
    #[error("rank index {0} out of range")]
    RankOutOfRange(usize),
}
