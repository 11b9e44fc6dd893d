use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use oxigraph::model::{GraphName, Literal, NamedNode, Quad};
use sourced_sparql::{MemoryQuadSource, QueryEngine, Source};
use tokio::runtime::Runtime;

fn people(count: usize) -> Vec<Quad> {
    let name = NamedNode::new("http://example.org/name").unwrap();
    let knows = NamedNode::new("http://example.org/knows").unwrap();
    (0..count)
        .flat_map(|i| {
            let person = NamedNode::new(format!("http://example.org/person/{}", i)).unwrap();
            let friend = NamedNode::new(format!("http://example.org/person/{}", (i + 1) % count)).unwrap();
            [
                Quad::new(
                    person.clone(),
                    name.clone(),
                    Literal::new_simple_literal(format!("Person {}", i)),
                    GraphName::DefaultGraph,
                ),
                Quad::new(person, knows.clone(), friend, GraphName::DefaultGraph),
            ]
        })
        .collect()
}

const QUERY: &str = "SELECT ?a ?name WHERE { \
                     ?a <http://example.org/knows> ?b . \
                     ?b <http://example.org/name> ?name }";

fn bench_default_store(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let mut group = c.benchmark_group("default_store");

    for size in [100, 1_000, 10_000] {
        let engine = runtime.block_on(async {
            let engine = QueryEngine::new(Some(Source::from(MemoryQuadSource::new(people(size))))).unwrap();
            engine.default_store().await.unwrap();
            engine
        });
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, _| {
            b.to_async(&runtime).iter(|| async { engine.execute_all(QUERY, None).await.unwrap() });
        });
    }
    group.finish();
}

fn bench_explicit_sources(c: &mut Criterion) {
    let runtime = Runtime::new().unwrap();
    let engine = runtime.block_on(async { QueryEngine::new(None).unwrap() });
    let mut group = c.benchmark_group("explicit_sources");

    for size in [100, 1_000] {
        let quads = people(size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &quads, |b, quads| {
            b.to_async(&runtime).iter(|| async {
                let source = Source::from(MemoryQuadSource::new(quads.clone()));
                engine.execute_all(QUERY, Some(source)).await.unwrap()
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_default_store, bench_explicit_sources);
criterion_main!(benches);
