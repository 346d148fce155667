//! # kgvec Graph
//!
//! Knowledge graph access for kgvec.
//!
//! Runs the entity snapshot query against a SPARQL endpoint and turns the
//! result rows into one [`kgvec_core::EntityRecord`] per URI.

pub mod client;
pub mod ingest;
pub mod query;
pub mod source;

pub use client::{GraphConfig, SparqlClient};
pub use query::EntityQuery;
pub use source::{EntitySource, FetchedEntities, SparqlSource};
