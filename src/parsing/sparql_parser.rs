use crate::core::variable_key;
use crate::error::{EngineError, Result};
use regex::Regex;
use spargebra::algebra::GraphPattern;
use spargebra::{Query, SparqlParser};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    Select,
    Ask,
    Construct,
    Describe,
}

impl fmt::Display for QueryForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryForm::Select => write!(f, "SELECT"),
            QueryForm::Ask => write!(f, "ASK"),
            QueryForm::Construct => write!(f, "CONSTRUCT"),
            QueryForm::Describe => write!(f, "DESCRIBE"),
        }
    }
}

/// A query that passed parsing, with the variables it projects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedQuery {
    text: String,
    // Relative IRIs already resolved against the configured base
    query: Query,
    form: QueryForm,
    variables: Vec<String>,
}

impl ParsedQuery {
    /// The query as submitted.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The parsed algebra handed to the evaluator.
    pub fn query(&self) -> &Query {
        &self.query
    }

    pub fn form(&self) -> QueryForm {
        self.form
    }

    /// Projected variable names, without `?`, in projection order.
    /// Empty for every form but SELECT.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Projected variables in `?name` key form.
    pub fn variable_keys(&self) -> impl Iterator<Item = String> + '_ {
        self.variables.iter().map(|v| variable_key(v))
    }
}

pub struct SparqlQueryParser {
    update_regex: Regex,
    base_iri: Option<String>,
}

impl SparqlQueryParser {
    pub fn new() -> Result<Self> {
        Self::with_base_iri(None)
    }

    pub fn with_base_iri(base_iri: Option<String>) -> Result<Self> {
        let parser = SparqlQueryParser {
            update_regex: Regex::new(r"(?i)^\s*(?:INSERT|DELETE)")
                .map_err(|e| EngineError::Config(e.to_string()))?,
            base_iri,
        };
        // Fail on a bad base IRI now rather than on every query
        parser.sparql_parser()?;
        Ok(parser)
    }

    fn sparql_parser(&self) -> Result<SparqlParser> {
        let parser = SparqlParser::new();
        match &self.base_iri {
            Some(base) => parser
                .with_base_iri(base.as_str())
                .map_err(|e| EngineError::Config(format!("Invalid base IRI {}: {}", base, e))),
            None => Ok(parser),
        }
    }

    /// Whether the text starts like a SPARQL UPDATE request.
    pub fn is_update(&self, sparql: &str) -> bool {
        self.update_regex.is_match(sparql)
    }

    pub fn parse(&self, sparql: &str) -> Result<ParsedQuery> {
        if self.is_update(sparql) {
            return Err(EngineError::UnsupportedOperation { query: sparql.to_string() });
        }

        let query = self.sparql_parser()?.parse_query(sparql)?;

        let (form, variables) = match &query {
            Query::Select { pattern, .. } => (QueryForm::Select, projected_variables(pattern)),
            Query::Ask { .. } => (QueryForm::Ask, Vec::new()),
            Query::Construct { .. } => (QueryForm::Construct, Vec::new()),
            Query::Describe { .. } => (QueryForm::Describe, Vec::new()),
        };

        Ok(ParsedQuery { text: sparql.to_string(), query, form, variables })
    }
}

/// Finds the projection under the solution modifiers wrapping it.
fn projected_variables(pattern: &GraphPattern) -> Vec<String> {
    match pattern {
        GraphPattern::Project { variables, .. } => {
            variables.iter().map(|v| v.as_str().to_string()).collect()
        }
        GraphPattern::Distinct { inner }
        | GraphPattern::Reduced { inner }
        | GraphPattern::Slice { inner, .. }
        | GraphPattern::OrderBy { inner, .. } => projected_variables(inner),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_detection_is_case_insensitive() {
        let parser = SparqlQueryParser::new().unwrap();
        assert!(parser.is_update("INSERT DATA { <a> <p> <b> }"));
        assert!(parser.is_update("  \n delete where { ?s ?p ?o }"));
        assert!(!parser.is_update("SELECT ?s WHERE { ?s ?p ?o }"));
        // Only a leading keyword counts
        assert!(!parser.is_update("SELECT ?insert WHERE { ?insert ?p ?o }"));
    }

    #[test]
    fn test_select_projection_order() {
        let parser = SparqlQueryParser::new().unwrap();
        let parsed = parser
            .parse("SELECT ?o ?s WHERE { ?s <http://example.org/p> ?o }")
            .unwrap();
        assert_eq!(parsed.form(), QueryForm::Select);
        assert_eq!(parsed.variables(), ["o".to_string(), "s".to_string()]);
        assert_eq!(parsed.variable_keys().collect::<Vec<_>>(), vec!["?o", "?s"]);
    }
}
