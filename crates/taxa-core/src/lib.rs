//! Taxa Core
//!
//! Plain data for taxonomy editing, with no I/O:
//! - [`TaxonomicRank`]: the fixed, ordered rank list and [`RankMap`] keyed by it
//! - [`TaxonomicNode`]: a node copied from the taxonomy store
//! - [`Chain`]: the per-rank working selection and [`cascade_clear`]
//! - [`RankOptions`]: one rank's candidate list with its [`LoadState`]
//!
//! # Example
//!
//! ```
//! use taxa_core::{Chain, TaxonomicNode, TaxonomicRank};
//!
//! let family = TaxonomicNode::new("f1", "Rosaceae", TaxonomicRank::Family);
//! let genus = TaxonomicNode::new("g1", "Rosa", TaxonomicRank::Genus).with_parent("f1");
//!
//! let chain = Chain::from_ancestry([&family, &genus]);
//! assert_eq!(chain.terminal(), Some(&genus));
//! assert_eq!(chain.lineage_names(), "Rosaceae > Rosa");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod chain;
pub mod error;
pub mod load;
pub mod node;
pub mod rank;

pub use chain::{cascade_clear, Chain};
pub use error::CoreError;
pub use load::{LoadState, RankOptions};
pub use node::{Classification, NewTaxon, NodeId, TaxonomicNode};
pub use rank::{RankMap, TaxonomicRank};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
