//! In-memory graph store shared by the loader and the executor.
//!
//! `GraphStore` is a cheap handle over an `oxigraph::store::Store`. Cloning the
//! handle shares the underlying quads; Oxigraph serializes concurrent writes
//! internally, so sibling sources can be loaded into the same store at once.
//!
//! Quads are only ever added. Abandoning every handle is the only way to
//! "clear" a store.

use crate::error::{EngineError, Result};
use crate::sources::fetcher::DocumentFetcher;
use oxigraph::io::RdfParser;
use oxigraph::model::Quad;
use oxigraph::store::Store;
use std::fmt;
use std::sync::Arc;

#[derive(Clone)]
pub struct GraphStore {
    store: Store,
    // Used to dereference document sources. Detached before querying.
    fetcher: Option<Arc<dyn DocumentFetcher>>,
}

impl GraphStore {
    /// Creates an empty store without a document fetcher.
    pub fn new() -> Result<Self> {
        Ok(Self { store: Store::new()?, fetcher: None })
    }

    /// Creates an empty store that dereferences documents through `fetcher`.
    pub fn with_fetcher(fetcher: Arc<dyn DocumentFetcher>) -> Result<Self> {
        Ok(Self { store: Store::new()?, fetcher: Some(fetcher) })
    }

    pub fn fetcher(&self) -> Option<&Arc<dyn DocumentFetcher>> {
        self.fetcher.as_ref()
    }

    pub fn set_fetcher(&mut self, fetcher: Option<Arc<dyn DocumentFetcher>>) {
        self.fetcher = fetcher;
    }

    /// Returns a handle over the same quads that cannot fetch documents.
    pub fn without_fetcher(&self) -> Self {
        Self { store: self.store.clone(), fetcher: None }
    }

    /// Adds a quad. Returns `false` if it was already present.
    pub fn add(&self, quad: &Quad) -> Result<bool> {
        if self.store.contains(quad)? {
            return Ok(false);
        }
        self.store.insert(quad)?;
        Ok(true)
    }

    pub fn contains(&self, quad: &Quad) -> Result<bool> {
        Ok(self.store.contains(quad)?)
    }

    /// Parses `data` with `parser` and adds every quad.
    /// Returns the number of quads that were not present before.
    pub fn load_bytes(&self, parser: RdfParser, data: &[u8]) -> Result<usize> {
        let mut added = 0;
        for quad in parser.for_slice(data) {
            let quad = quad.map_err(|e| EngineError::Store(e.to_string()))?;
            if self.add(&quad)? {
                added += 1;
            }
        }
        Ok(added)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.store.len()?)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.store.is_empty()?)
    }

    /// Snapshot of every quad currently in the store.
    pub fn quads(&self) -> Result<Vec<Quad>> {
        self.store.iter().map(|q| q.map_err(EngineError::from)).collect()
    }

    /// The underlying Oxigraph store, for evaluation.
    pub fn inner(&self) -> &Store {
        &self.store
    }
}

impl fmt::Debug for GraphStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphStore")
            .field("len", &self.store.len().ok())
            .field("has_fetcher", &self.fetcher.is_some())
            .finish()
    }
}
