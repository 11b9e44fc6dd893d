use crate::error::Result;
use crate::parsing::ParsedQuery;
use crate::storage::GraphStore;
use futures_util::future::BoxFuture;
use oxigraph::model::Term;

/// One raw solution row as reported by an engine: `?name` keys in engine
/// order. May carry variables the query never asked for.
pub type RawRow = Vec<(String, Term)>;

/// A query engine that evaluates a parsed query against a populated store.
///
/// Implementations report every row of a query at once: either all rows or
/// an error, never a prefix of the rows.
pub trait SparqlEngine: Send + Sync {
    fn execute<'a>(
        &'a self,
        query: &'a ParsedQuery,
        store: &'a GraphStore,
    ) -> BoxFuture<'a, Result<Vec<RawRow>>>;
}
