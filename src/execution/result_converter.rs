//! Result Converter Utilities
//!
//! Converts raw engine rows into [`Binding`]s that contain only the variables
//! the query projects. Engines may report internal bookkeeping variables next
//! to the requested ones; those never reach the caller.
//!
//! # Example
//!
//! ```ignore
//! use sourced_sparql::execution::result_converter::ResultConverter;
//!
//! let converter = ResultConverter::new(&parsed_query);
//! let bindings = converter.convert_all(rows);
//! ```

use crate::core::{variable_key, Binding};
use crate::parsing::ParsedQuery;
use crate::querying::RawRow;
use std::collections::HashSet;

pub struct ResultConverter {
    variables: HashSet<String>,
}

impl ResultConverter {
    /// Creates a converter keeping the variables projected by `query`.
    pub fn new(query: &ParsedQuery) -> Self {
        Self { variables: query.variable_keys().collect() }
    }

    /// Creates a converter from variable names, with or without `?`.
    pub fn from_variables<I, S>(variables: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self { variables: variables.into_iter().map(|v| variable_key(v.as_ref())).collect() }
    }

    /// Keeps the requested keys of `row`, in the row's own order.
    pub fn convert(&self, row: RawRow) -> Binding {
        row.into_iter().filter(|(key, _)| self.variables.contains(key)).collect()
    }

    /// Converts every row, preserving row order.
    pub fn convert_all(&self, rows: Vec<RawRow>) -> Vec<Binding> {
        rows.into_iter().map(|row| self.convert(row)).collect()
    }
}
