//! Core data structures shared by the loader, the executor and the facade

use oxigraph::model::Term;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Prefix used for variable keys in raw rows and bindings.
pub const VARIABLE_PREFIX: char = '?';

/// Normalizes a variable name to its `?name` key form.
pub fn variable_key(name: &str) -> String {
    if name.starts_with(VARIABLE_PREFIX) {
        name.to_string()
    } else {
        format!("{VARIABLE_PREFIX}{name}")
    }
}

/// One solution of a query: an ordered mapping from `?name` to a bound term.
///
/// Key order is the order in which the engine reported the variables for the
/// row. Unbound variables are absent rather than mapped to a placeholder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Binding {
    entries: Vec<(String, Term)>,
}

impl Binding {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Looks up a variable by `?name` or by bare `name`.
    pub fn get(&self, variable: &str) -> Option<&Term> {
        let key = variable_key(variable);
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, term)| term)
    }

    pub fn contains(&self, variable: &str) -> bool {
        self.get(variable).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Term)> {
        self.entries.iter().map(|(k, t)| (k.as_str(), t))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for Binding {
    type Item = (String, Term);
    type IntoIter = std::vec::IntoIter<(String, Term)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Term)> for Binding {
    fn from_iter<I: IntoIterator<Item = (String, Term)>>(iter: I) -> Self {
        Self { entries: iter.into_iter().collect() }
    }
}

/// Serialized as a JSON object in key order, terms in N-Triples syntax.
impl Serialize for Binding {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, term) in &self.entries {
            map.serialize_entry(key, &term.to_string())?;
        }
        map.end()
    }
}
