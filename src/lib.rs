//! # sourced-sparql
//!
//! Runs SPARQL SELECT queries over RDF data gathered from heterogeneous
//! sources: remote documents, local files, named nodes, nested lists of
//! sources, and streaming quad providers. Sources are merged into an
//! in-memory Oxigraph store, the query is evaluated against it, and solutions
//! come back as a lazily consumed stream of [`Binding`]s that contain exactly
//! the projected variables.
//!
//! ## Features
//!
//! - Default sources loaded once in the background and reused across queries
//! - Per-query sources loaded into a fresh store for that call only
//! - Concurrent, fail-fast loading of source lists
//! - SPARQL UPDATE rejected before any data is touched
//!
//! ## Example
//!
//! ```no_run
//! use futures_util::TryStreamExt;
//! use sourced_sparql::{QueryEngine, Source};
//!
//! # async fn example() -> sourced_sparql::Result<()> {
//! let engine = QueryEngine::new(Some(Source::from("https://example.org/data.ttl")))?;
//! let mut bindings = engine.execute("SELECT ?s WHERE { ?s ?p ?o }", None);
//! while let Some(binding) = bindings.try_next().await? {
//!     println!("{:?}", binding.get("s"));
//! }
//! # Ok(())
//! # }
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::new_without_default)]
#![allow(clippy::doc_markdown)]

/// Public query facade
pub mod api;

/// Engine and fetcher configuration
pub mod config;

/// Core data structures and types
pub mod core;

pub mod error;

/// Raw row to binding conversion
pub mod execution;

/// Module for parsing SPARQL queries
pub mod parsing;

/// Query evaluation
pub mod querying;

/// Source descriptors, fetchers and the loader
pub mod sources;

pub mod storage;

// Re-export commonly used types
pub use api::{BindingStream, QueryEngine, QueryEngineBuilder};
pub use config::{EngineConfig, FetchConfig};
pub use core::Binding;
pub use error::{EngineError, Result};
pub use sources::{
    read_sources, DocumentFetcher, HttpDocumentFetcher, MemoryQuadSource, QuadPattern,
    QuadSource, QuadStream, Source, StreamQuadSource,
};
pub use storage::GraphStore;
