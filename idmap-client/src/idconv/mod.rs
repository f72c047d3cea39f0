//! PMID → PMCID conversion through the PMC ID Converter API
//!
//! - `client` - the batched [`IdConverter`]
//! - `responses` - wire types for the converter's JSON

pub mod client;
pub(crate) mod responses;

pub use client::IdConverter;
