//! Streaming quad providers.
//!
//! A `QuadSource` answers a quad pattern with a stream of quads. The loader
//! always asks for the all-wildcard pattern and drains the stream into the
//! target store; the stream is dropped (and the subscription released) as
//! soon as it ends, errors, or the load is abandoned.

use crate::error::{EngineError, Result};
use crate::storage::GraphStore;
use futures_util::stream::{self, BoxStream, StreamExt};
use oxigraph::model::{GraphName, NamedNode, Quad, Term};
use oxigraph::store::Store;
use std::sync::{Arc, Mutex};

pub type QuadStream = BoxStream<'static, Result<Quad>>;

/// A quad pattern where `None` is a wildcard.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuadPattern {
    pub subject: Option<Term>,
    pub predicate: Option<NamedNode>,
    pub object: Option<Term>,
    pub graph_name: Option<GraphName>,
}

impl QuadPattern {
    /// The pattern that matches every quad.
    pub fn any() -> Self {
        Self::default()
    }

    pub fn with_subject(mut self, subject: impl Into<Term>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    pub fn with_predicate(mut self, predicate: NamedNode) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn with_object(mut self, object: impl Into<Term>) -> Self {
        self.object = Some(object.into());
        self
    }

    pub fn with_graph_name(mut self, graph_name: impl Into<GraphName>) -> Self {
        self.graph_name = Some(graph_name.into());
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.subject.is_none()
            && self.predicate.is_none()
            && self.object.is_none()
            && self.graph_name.is_none()
    }

    pub fn matches(&self, quad: &Quad) -> bool {
        self.subject.as_ref().map_or(true, |s| *s == Term::from(quad.subject.clone()))
            && self.predicate.as_ref().map_or(true, |p| *p == quad.predicate)
            && self.object.as_ref().map_or(true, |o| *o == quad.object)
            && self.graph_name.as_ref().map_or(true, |g| *g == quad.graph_name)
    }
}

/// A provider of quads that can be matched against a pattern.
pub trait QuadSource: Send + Sync {
    fn match_quads(&self, pattern: &QuadPattern) -> QuadStream;
}

fn filtered(quads: Vec<Quad>, pattern: &QuadPattern) -> QuadStream {
    if pattern.is_wildcard() {
        return stream::iter(quads.into_iter().map(Ok)).boxed();
    }
    let pattern = pattern.clone();
    stream::iter(quads.into_iter().filter(move |q| pattern.matches(q)).map(Ok)).boxed()
}

/// A fixed, in-memory list of quads.
#[derive(Debug, Clone, Default)]
pub struct MemoryQuadSource {
    quads: Arc<Vec<Quad>>,
}

impl MemoryQuadSource {
    pub fn new(quads: impl IntoIterator<Item = Quad>) -> Self {
        Self { quads: Arc::new(quads.into_iter().collect()) }
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }
}

impl QuadSource for MemoryQuadSource {
    fn match_quads(&self, pattern: &QuadPattern) -> QuadStream {
        filtered(self.quads.as_ref().clone(), pattern)
    }
}

/// Wraps a one-shot stream, e.g. quads pushed through a channel.
///
/// The first call to `match_quads` takes the stream; later calls yield a
/// single error since the quads were already consumed.
pub struct StreamQuadSource {
    stream: Mutex<Option<QuadStream>>,
}

impl StreamQuadSource {
    pub fn new(stream: QuadStream) -> Self {
        Self { stream: Mutex::new(Some(stream)) }
    }
}

impl QuadSource for StreamQuadSource {
    fn match_quads(&self, pattern: &QuadPattern) -> QuadStream {
        let taken = match self.stream.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        match taken {
            Some(inner) if pattern.is_wildcard() => inner,
            Some(inner) => {
                let pattern = pattern.clone();
                inner
                    .filter(move |item| {
                        let keep = item.as_ref().map_or(true, |q| pattern.matches(q));
                        futures_util::future::ready(keep)
                    })
                    .boxed()
            }
            None => stream::once(futures_util::future::ready(Err(EngineError::source_load(
                "quad stream",
                "stream was already consumed",
            ))))
            .boxed(),
        }
    }
}

impl QuadSource for Store {
    fn match_quads(&self, pattern: &QuadPattern) -> QuadStream {
        match self.iter().collect::<std::result::Result<Vec<_>, _>>() {
            Ok(quads) => filtered(quads, pattern),
            Err(e) => stream::once(futures_util::future::ready(Err(EngineError::from(e)))).boxed(),
        }
    }
}

impl QuadSource for GraphStore {
    fn match_quads(&self, pattern: &QuadPattern) -> QuadStream {
        self.inner().match_quads(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::TryStreamExt;
    use oxigraph::model::Literal;

    fn quads() -> Vec<Quad> {
        let p = NamedNode::new_unchecked("http://example.org/p");
        let q = NamedNode::new_unchecked("http://example.org/q");
        vec![
            Quad::new(
                NamedNode::new_unchecked("http://example.org/a"),
                p.clone(),
                Literal::new_simple_literal("1"),
                GraphName::DefaultGraph,
            ),
            Quad::new(
                NamedNode::new_unchecked("http://example.org/b"),
                q,
                Literal::new_simple_literal("2"),
                NamedNode::new_unchecked("http://example.org/g"),
            ),
        ]
    }

    #[tokio::test]
    async fn test_memory_source_wildcard() {
        let source = MemoryQuadSource::new(quads());
        let matched: Vec<Quad> = source.match_quads(&QuadPattern::any()).try_collect().await.unwrap();
        assert_eq!(matched, quads());
    }

    #[tokio::test]
    async fn test_memory_source_predicate_pattern() {
        let source = MemoryQuadSource::new(quads());
        let pattern =
            QuadPattern::any().with_predicate(NamedNode::new_unchecked("http://example.org/q"));
        let matched: Vec<Quad> = source.match_quads(&pattern).try_collect().await.unwrap();
        assert_eq!(matched.len(), 1);
        assert_eq!(matched[0].subject.to_string(), "<http://example.org/b>");
    }

    #[test]
    fn test_pattern_matches_graph_name() {
        let pattern = QuadPattern::any().with_graph_name(GraphName::DefaultGraph);
        let all = quads();
        assert!(pattern.matches(&all[0]));
        assert!(!pattern.matches(&all[1]));
    }

    #[tokio::test]
    async fn test_stream_source_is_one_shot() {
        let source = StreamQuadSource::new(stream::iter(quads().into_iter().map(Ok)).boxed());
        let first: Vec<Quad> = source.match_quads(&QuadPattern::any()).try_collect().await.unwrap();
        assert_eq!(first.len(), 2);
        let second: Result<Vec<Quad>> = source.match_quads(&QuadPattern::any()).try_collect().await;
        assert!(matches!(second, Err(EngineError::SourceLoad { .. })));
    }
}
