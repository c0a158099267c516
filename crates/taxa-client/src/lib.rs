//! Taxa Client
//!
//! Access to the remote taxonomy store:
//! - [`TaxonomyService`]: the async contract every backend implements
//! - [`HttpTaxonomyService`]: JSON-over-HTTP implementation
//! - [`CachedTaxonomyService`]: moka-backed option-list cache
//! - [`resolve_ancestry`]: rebuild a node's path to the root
//!
//! # Example
//!
//! ```rust,ignore
//! use taxa_client::{ClientConfig, HttpTaxonomyService, TaxonomyService};
//! use taxa_core::TaxonomicRank;
//!
//! # async fn example() -> Result<(), taxa_client::ServiceError> {
//! let config = ClientConfig::new().with_base_url("https://admin.example.com/api");
//! let service = HttpTaxonomyService::new(&config)?;
//! let domains = service.list_by_rank(TaxonomicRank::Domain).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cache;
pub mod config;
pub mod error;
pub mod http;
pub mod service;

pub use cache::{CacheStats, CachedTaxonomyService};
pub use config::ClientConfig;
pub use error::ServiceError;
pub use http::HttpTaxonomyService;
pub use service::{resolve_ancestry, TaxonomyService};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
