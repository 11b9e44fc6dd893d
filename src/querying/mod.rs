//! Query evaluation against a populated store

pub mod oxigraph_adapter;
pub mod query_processing;

pub use oxigraph_adapter::OxigraphAdapter;
pub use query_processing::{RawRow, SparqlEngine};
