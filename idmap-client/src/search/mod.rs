//! Affiliation search against PubMed ESearch
//!
//! - `query` - affiliation/date query builder
//! - `variants` - loader for the approved institution name list
//! - `client` - the single-request [`AffiliationSearcher`]

pub mod client;
pub mod query;
pub(crate) mod responses;
pub mod variants;

pub use client::AffiliationSearcher;
pub use query::AffiliationQuery;
pub use variants::{DEFAULT_VARIANTS_PATH, load_variants};
