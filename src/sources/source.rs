//! Source descriptors: where RDF data comes from.
//!
//! Loosely-typed descriptors (JSON from a config file or the command line) are
//! turned into a `Source` by [`Source::classify`]. Everything downstream works
//! on the closed enum, so the loader's dispatch is exhaustive.

use crate::error::{EngineError, Result};
use crate::sources::quad_source::{MemoryQuadSource, QuadSource};
use futures_util::future::{BoxFuture, FutureExt};
use oxigraph::model::NamedNode;
use serde_json::Value;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

pub enum Source {
    /// A document identifier: URL, file path, or the value of a named node
    Document(String),
    /// Sources merged into the same store, loaded concurrently
    List(Vec<Source>),
    /// A streaming quad provider
    Quads(Arc<dyn QuadSource>),
    /// A descriptor that is not known yet. `None` means no source at all.
    Deferred(BoxFuture<'static, Result<Option<Source>>>),
}

impl Source {
    pub fn document(id: impl Into<String>) -> Self {
        Source::Document(id.into())
    }

    pub fn list<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Source>,
    {
        Source::List(items.into_iter().map(Into::into).collect())
    }

    pub fn quads(source: impl QuadSource + 'static) -> Self {
        Source::Quads(Arc::new(source))
    }

    pub fn deferred<F>(pending: F) -> Self
    where
        F: Future<Output = Result<Option<Source>>> + Send + 'static,
    {
        Source::Deferred(pending.boxed())
    }

    /// Classifies an untyped descriptor.
    ///
    /// Strings are documents, arrays are lists, objects with a string `href`
    /// are URLs and objects with `termType: "NamedNode"` are terms. Falsy
    /// values (`null`, `false`, `0`, `""`) mean "no source".
    pub fn classify(value: Value) -> Result<Option<Source>> {
        match value {
            Value::Null | Value::Bool(false) => Ok(None),
            Value::String(s) if s.is_empty() => Ok(None),
            Value::String(s) => Ok(Some(Source::Document(s))),
            Value::Number(ref n) if n.as_f64() == Some(0.0) => Ok(None),
            Value::Array(items) => {
                let mut sources = Vec::with_capacity(items.len());
                for item in items {
                    if let Some(source) = Source::classify(item)? {
                        sources.push(source);
                    }
                }
                Ok(Some(Source::List(sources)))
            }
            Value::Object(ref map) => {
                if let Some(Value::String(href)) = map.get("href") {
                    return Ok(Some(Source::Document(href.clone())));
                }
                let is_named_node =
                    map.get("termType").and_then(Value::as_str) == Some("NamedNode");
                match map.get("value") {
                    Some(Value::String(iri)) if is_named_node => {
                        Ok(Some(Source::Document(iri.clone())))
                    }
                    _ => Err(EngineError::UnsupportedSource(value.to_string())),
                }
            }
            other => Err(EngineError::UnsupportedSource(other.to_string())),
        }
    }
}

/// Strips the fragment, since fetchers load whole documents.
pub fn document_id(id: &str) -> &str {
    id.split('#').next().unwrap_or(id)
}

impl From<&str> for Source {
    fn from(id: &str) -> Self {
        Source::Document(id.to_string())
    }
}

impl From<String> for Source {
    fn from(id: String) -> Self {
        Source::Document(id)
    }
}

impl From<reqwest::Url> for Source {
    fn from(url: reqwest::Url) -> Self {
        Source::Document(url.into())
    }
}

impl From<NamedNode> for Source {
    fn from(node: NamedNode) -> Self {
        Source::Document(node.into_string())
    }
}

impl<S: Into<Source>> From<Vec<S>> for Source {
    fn from(items: Vec<S>) -> Self {
        Source::list(items)
    }
}

impl From<Arc<dyn QuadSource>> for Source {
    fn from(source: Arc<dyn QuadSource>) -> Self {
        Source::Quads(source)
    }
}

impl From<MemoryQuadSource> for Source {
    fn from(source: MemoryQuadSource) -> Self {
        Source::quads(source)
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Document(id) => f.debug_tuple("Document").field(id).finish(),
            Source::List(items) => f.debug_tuple("List").field(items).finish(),
            Source::Quads(_) => f.write_str("Quads(..)"),
            Source::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}
