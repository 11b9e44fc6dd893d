//! SPARQL query parsing and update detection

pub mod sparql_parser;

pub use sparql_parser::{ParsedQuery, QueryForm, SparqlQueryParser};
