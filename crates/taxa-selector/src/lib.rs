//! Taxa Selector
//!
//! The taxonomy chain selector used by the plant editor:
//! - [`ChainSelector`]: one dropdown's worth of state per rank, with
//!   cascading clears and per-rank option loading
//! - [`TaxonomyEditor`]: create/rename/delete nodes and refresh local state
//!
//! # Example
//!
//! ```rust,ignore
//! use taxa_selector::ChainSelector;
//! use taxa_core::TaxonomicRank;
//!
//! # async fn example(service: impl taxa_client::TaxonomyService) -> Result<(), taxa_selector::SelectorError> {
//! let selector = ChainSelector::mount(service, None).await;
//! let domains = selector.options(TaxonomicRank::Domain);
//! selector.select(TaxonomicRank::Domain, domains.first().cloned()).await?;
//! let plant_taxon = selector.classification().taxon_id;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod editor;
pub mod error;
pub mod selector;

pub use editor::TaxonomyEditor;
pub use error::SelectorError;
pub use selector::{ChainSelector, RankView, SelectorSnapshot};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
