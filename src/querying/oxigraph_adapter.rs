//! Oxigraph-based SPARQL query engine adapter.
//!
//! The adapter evaluates the algebra produced by the parser, so a query is
//! parsed once per call. Evaluation is synchronous in Oxigraph, so the adapter
//! runs it on tokio's blocking pool and awaits a single completion carrying
//! either every row or the first error.
//!
//! # Example
//!
//! ```ignore
//! use sourced_sparql::parsing::SparqlQueryParser;
//! use sourced_sparql::querying::oxigraph_adapter::OxigraphAdapter;
//! use sourced_sparql::querying::query_processing::SparqlEngine;
//! use sourced_sparql::storage::GraphStore;
//!
//! let store = GraphStore::new()?;
//! let query = SparqlQueryParser::new()?.parse("SELECT ?s WHERE { ?s ?p ?o }")?;
//! let rows = OxigraphAdapter::new().execute(&query, &store).await?;
//! ```

use crate::core::variable_key;
use crate::error::{EngineError, Result};
use crate::parsing::{ParsedQuery, QueryForm};
use crate::querying::query_processing::{RawRow, SparqlEngine};
use crate::storage::GraphStore;
use futures_util::future::{BoxFuture, FutureExt};
use log::debug;
use oxigraph::sparql::{QueryResults, SparqlEvaluator};
use spargebra::Query;

#[derive(Debug, Clone, Copy, Default)]
pub struct OxigraphAdapter {}

impl OxigraphAdapter {
    pub fn new() -> Self {
        Self {}
    }

    /// Evaluates a SELECT query and collects every solution.
    ///
    /// The default graph is the union of all graphs, so triples loaded into a
    /// per-document graph are visible to plain basic graph patterns.
    pub async fn execute_select(&self, query: &ParsedQuery, store: &GraphStore) -> Result<Vec<RawRow>> {
        if query.form() != QueryForm::Select {
            return Err(EngineError::UnsupportedQueryForm(format!(
                "{} queries do not produce bindings",
                query.form()
            )));
        }

        let algebra = query.query().clone();
        let store = store.without_fetcher();
        let rows = tokio::task::spawn_blocking(move || evaluate(algebra, &store))
            .await
            .map_err(|e| EngineError::QueryExecution(e.to_string()))??;
        debug!("Query produced {} rows", rows.len());
        Ok(rows)
    }
}

fn evaluate(query: Query, store: &GraphStore) -> Result<Vec<RawRow>> {
    let mut prepared = SparqlEvaluator::new().for_query(query);
    prepared.dataset_mut().set_default_graph_as_union();
    let results = prepared.on_store(store.inner()).execute()?;

    let mut rows = Vec::new();
    if let QueryResults::Solutions(solutions) = results {
        for solution in solutions {
            let solution = solution?;
            rows.push(
                solution
                    .iter()
                    .map(|(var, term)| (variable_key(var.as_str()), term.clone()))
                    .collect(),
            );
        }
    }
    Ok(rows)
}

impl SparqlEngine for OxigraphAdapter {
    fn execute<'a>(
        &'a self,
        query: &'a ParsedQuery,
        store: &'a GraphStore,
    ) -> BoxFuture<'a, Result<Vec<RawRow>>> {
        self.execute_select(query, store).boxed()
    }
}
