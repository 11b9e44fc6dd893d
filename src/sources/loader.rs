//! Source loading: resolves source descriptors into quads in a shared store.

use crate::error::{EngineError, Result};
use crate::sources::fetcher::DocumentFetcher;
use crate::sources::quad_source::{QuadPattern, QuadSource};
use crate::sources::source::{document_id, Source};
use crate::storage::GraphStore;
use futures_util::future::{try_join_all, BoxFuture, FutureExt};
use futures_util::StreamExt;
use log::{debug, trace};
use std::sync::Arc;

/// Reads `source` into `store` and returns the same store.
///
/// Lists are loaded concurrently into the one store and fail fast: the first
/// failing element aborts the load, while quads already added by its siblings
/// stay in the store. An absent source, or an empty document id, leaves the
/// store unchanged.
pub fn read_sources(source: Option<Source>, store: GraphStore) -> BoxFuture<'static, Result<GraphStore>> {
    async move {
        let Some(source) = source else {
            return Ok(store);
        };
        match source {
            Source::Deferred(pending) => {
                let resolved = pending.await?;
                read_sources(resolved, store).await
            }
            Source::Document(id) if id.is_empty() => Ok(store),
            Source::Document(id) => {
                load_document(&id, &store).await?;
                Ok(store)
            }
            Source::List(items) => {
                trace!("Loading {} sources concurrently", items.len());
                try_join_all(items.into_iter().map(|item| read_sources(Some(item), store.clone())))
                    .await?;
                Ok(store)
            }
            Source::Quads(provider) => {
                load_quads(provider, &store).await?;
                Ok(store)
            }
        }
    }
    .boxed()
}

/// Reads `source` into a fresh store that fetches documents with `fetcher`.
pub async fn read_sources_into_new(
    source: Option<Source>,
    fetcher: Arc<dyn DocumentFetcher>,
) -> Result<GraphStore> {
    let store = GraphStore::with_fetcher(fetcher)?;
    read_sources(source, store).await
}

fn as_source_load(source_id: &str, err: EngineError) -> EngineError {
    match err {
        EngineError::SourceLoad { .. } => err,
        other => EngineError::source_load(source_id, other),
    }
}

async fn load_document(id: &str, store: &GraphStore) -> Result<usize> {
    let document = document_id(id);
    let fetcher = store
        .fetcher()
        .cloned()
        .ok_or_else(|| EngineError::source_load(document, "no document fetcher attached to the store"))?;
    fetcher.load(document, store).await.map_err(|e| as_source_load(document, e))
}

async fn load_quads(provider: Arc<dyn QuadSource>, store: &GraphStore) -> Result<usize> {
    // The stream is owned here and dropped on every exit path
    let mut quads = provider.match_quads(&QuadPattern::any());
    let mut added = 0;
    while let Some(quad) = quads.next().await {
        let quad = quad.map_err(|e| as_source_load("quad stream", e))?;
        if store.add(&quad).map_err(|e| as_source_load("quad stream", e))? {
            added += 1;
        }
    }
    debug!("Loaded {} quads from quad stream", added);
    Ok(added)
}
