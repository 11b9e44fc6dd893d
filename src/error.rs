//! Error types for source loading and query execution

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;

/// Main error type for the query engine.
///
/// The type is `Clone` so that a failed default-store preload can be replayed
/// to every query that later awaits it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// SPARQL UPDATE was submitted to a read-only engine
    #[error("SPARQL UPDATE queries are unsupported, received: {query}")]
    UnsupportedOperation { query: String },

    /// A source descriptor that is neither a document, a list nor a quad source
    #[error("Unsupported source: {0}")]
    UnsupportedSource(String),

    /// Fetching a document or draining a quad stream failed
    #[error("Could not load source {source_id}: {message}")]
    SourceLoad { source_id: String, message: String },

    /// The query text is not valid SPARQL
    #[error("Query parse error: {0}")]
    QueryParse(String),

    /// ASK, CONSTRUCT and DESCRIBE do not produce bindings
    #[error("Unsupported query form: {0}")]
    UnsupportedQueryForm(String),

    /// The underlying engine failed while evaluating the query
    #[error("Query execution error: {0}")]
    QueryExecution(String),

    /// Store creation or insertion error
    #[error("Store error: {0}")]
    Store(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl EngineError {
    pub(crate) fn source_load(source_id: impl Into<String>, message: impl ToString) -> Self {
        EngineError::SourceLoad { source_id: source_id.into(), message: message.to_string() }
    }
}

impl From<oxigraph::store::StorageError> for EngineError {
    fn from(err: oxigraph::store::StorageError) -> Self {
        EngineError::Store(err.to_string())
    }
}

impl From<oxigraph::sparql::QueryEvaluationError> for EngineError {
    fn from(err: oxigraph::sparql::QueryEvaluationError) -> Self {
        EngineError::QueryExecution(err.to_string())
    }
}

impl From<spargebra::SparqlSyntaxError> for EngineError {
    fn from(err: spargebra::SparqlSyntaxError) -> Self {
        EngineError::QueryParse(err.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(err: serde_json::Error) -> Self {
        EngineError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::UnsupportedOperation { query: "INSERT DATA {}".to_string() };
        assert_eq!(
            err.to_string(),
            "SPARQL UPDATE queries are unsupported, received: INSERT DATA {}"
        );
    }

    #[test]
    fn test_source_load_display() {
        let err = EngineError::source_load("http://example.org/doc", "404 Not Found");
        assert_eq!(
            err.to_string(),
            "Could not load source http://example.org/doc: 404 Not Found"
        );
    }
}
