use crate::config::EngineConfig;
use crate::core::Binding;
use crate::error::{EngineError, Result};
use crate::execution::ResultConverter;
use crate::parsing::SparqlQueryParser;
use crate::querying::{OxigraphAdapter, SparqlEngine};
use crate::sources::{read_sources, DocumentFetcher, HttpDocumentFetcher, Source};
use crate::storage::GraphStore;
use futures_util::future::{self, BoxFuture, FutureExt, Shared};
use futures_util::stream::{self, BoxStream, StreamExt, TryStreamExt};
use log::debug;
use std::sync::Arc;

/// Lazily consumed, finite stream of bindings for one `execute` call.
pub type BindingStream = BoxStream<'static, Result<Binding>>;

/// The default store, loaded once and shared by every query without sources.
/// Caches the failure too, so it is replayed to every awaiter.
type DefaultStore = Shared<BoxFuture<'static, Result<GraphStore>>>;

/// Builder for [`QueryEngine`].
#[derive(Default)]
pub struct QueryEngineBuilder {
    config: EngineConfig,
    fetcher: Option<Arc<dyn DocumentFetcher>>,
    engine: Option<Arc<dyn SparqlEngine>>,
}

impl QueryEngineBuilder {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Replaces the HTTP/file fetcher used for document sources.
    pub fn fetcher(mut self, fetcher: Arc<dyn DocumentFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// Replaces the Oxigraph evaluator.
    pub fn engine(mut self, engine: Arc<dyn SparqlEngine>) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Builds the engine and starts loading `default_sources`.
    ///
    /// Fails only on invalid configuration. A failure to load the default
    /// sources is not reported here; it surfaces from every query that
    /// relies on the default store.
    pub fn build(self, default_sources: Option<Source>) -> Result<QueryEngine> {
        let fetcher = match self.fetcher {
            Some(fetcher) => fetcher,
            None => Arc::new(HttpDocumentFetcher::new(self.config.fetch.clone())?),
        };
        let engine = self.engine.unwrap_or_else(|| Arc::new(OxigraphAdapter::new()));
        let parser = Arc::new(SparqlQueryParser::with_base_iri(self.config.base_iri.clone())?);
        let default_store =
            default_store(default_sources, fetcher.clone(), self.config.preload);

        Ok(QueryEngine { parser, engine, fetcher, default_store })
    }
}

fn default_store(
    sources: Option<Source>,
    fetcher: Arc<dyn DocumentFetcher>,
    preload: bool,
) -> DefaultStore {
    let load = async move {
        let store = GraphStore::with_fetcher(fetcher)?;
        let result = read_sources(sources, store).await;
        match &result {
            Ok(store) => debug!("Default store ready with {:?} quads", store.len().ok()),
            Err(e) => debug!("Default sources failed to load, deferring: {}", e),
        }
        result
    };

    let runtime = if preload { tokio::runtime::Handle::try_current().ok() } else { None };
    let load: BoxFuture<'static, Result<GraphStore>> = match runtime {
        Some(runtime) => {
            debug!("Preloading default sources");
            let task = runtime.spawn(load);
            async move {
                task.await.map_err(|e| {
                    EngineError::Store(format!("Default store preload was aborted: {}", e))
                })?
            }
            .boxed()
        }
        None => load.boxed(),
    };
    load.shared()
}

/// Executes SPARQL SELECT queries over RDF sources.
///
/// Sources given at construction form the default store, which is loaded
/// once and reused by every query that brings no sources of its own. A query
/// with explicit sources gets a fresh store that lives for that call only.
pub struct QueryEngine {
    parser: Arc<SparqlQueryParser>,
    engine: Arc<dyn SparqlEngine>,
    fetcher: Arc<dyn DocumentFetcher>,
    default_store: DefaultStore,
}

impl QueryEngine {
    /// Creates an engine with the default configuration.
    pub fn new(default_sources: Option<Source>) -> Result<Self> {
        Self::builder().build(default_sources)
    }

    pub fn with_config(
        default_sources: Option<Source>,
        config: EngineConfig,
    ) -> Result<Self> {
        Self::builder().config(config).build(default_sources)
    }

    pub fn builder() -> QueryEngineBuilder {
        QueryEngineBuilder::default()
    }

    /// Executes `sparql` over `sources`, or over the default store when
    /// `sources` is `None`.
    ///
    /// Every row is collected before the first binding is yielded, so an
    /// evaluation error yields that error and no bindings. SPARQL UPDATE is
    /// rejected before any source is touched. Errors end the stream.
    pub fn execute(&self, sparql: &str, sources: Option<Source>) -> BindingStream {
        let sparql = sparql.to_string();
        let parser = self.parser.clone();
        let engine = self.engine.clone();
        let fetcher = self.fetcher.clone();
        let default_store = self.default_store.clone();

        let run = async move {
            if parser.is_update(&sparql) {
                return Err(EngineError::UnsupportedOperation { query: sparql });
            }
            let query = parser.parse(&sparql)?;

            let store = match sources {
                Some(sources) => {
                    read_sources(Some(sources), GraphStore::with_fetcher(fetcher)?).await?
                }
                None => default_store.await?,
            };
            // No link traversal while the query runs
            let store = store.without_fetcher();

            let rows = engine.execute(&query, &store).await?;
            Ok::<_, EngineError>(ResultConverter::new(&query).convert_all(rows))
        };

        stream::once(run)
            .map(|result| match result {
                Ok(bindings) => stream::iter(bindings.into_iter().map(Ok)).left_stream(),
                Err(e) => stream::once(future::ready(Err(e))).right_stream(),
            })
            .flatten()
            .boxed()
    }

    /// Executes `sparql` and collects every binding.
    pub async fn execute_all(&self, sparql: &str, sources: Option<Source>) -> Result<Vec<Binding>> {
        self.execute(sparql, sources).try_collect().await
    }

    /// Waits for the default store, replaying its load failure if any.
    pub async fn default_store(&self) -> Result<GraphStore> {
        self.default_store.clone().await
    }

    /// Kept for interface compatibility; there is nothing to invalidate.
    ///
    /// Stores built for explicit sources are discarded after each call, and
    /// the default store keeps no per-document cache.
    pub fn clear_cache(&self, document: Option<&str>) {
        debug!("clear_cache({:?}) has nothing to invalidate", document);
    }
}
