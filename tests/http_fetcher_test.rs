//! Integration tests for HttpDocumentFetcher against a local HTTP server
//! and the local filesystem.

use axum::http::{header, StatusCode};
use axum::routing::get;
use axum::Router;
use oxigraph::model::{GraphName, Literal, NamedNode, Quad};
use sourced_sparql::{
    read_sources, EngineError, FetchConfig, GraphStore, HttpDocumentFetcher, QueryEngine, Source,
};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const TURTLE: &str = "@prefix ex: <http://example.org/> .\n\
                      <#me> ex:name \"Alice\" .\n\
                      ex:bob ex:name \"Bob\" .\n";

const NTRIPLES: &str = "<http://example.org/carol> <http://example.org/name> \"Carol\" .\n";

/// Starts a server on an ephemeral port and returns its base URL.
async fn start_server() -> String {
    let app = Router::new()
        .route("/data.ttl", get(|| async { ([(header::CONTENT_TYPE, "text/turtle; charset=utf-8")], TURTLE) }))
        .route("/data", get(|| async { ([(header::CONTENT_TYPE, "application/n-triples")], NTRIPLES) }))
        .route("/missing.ttl", get(|| async { (StatusCode::NOT_FOUND, "not here") }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn http_store() -> GraphStore {
    let fetcher = HttpDocumentFetcher::new(FetchConfig::default()).unwrap();
    GraphStore::with_fetcher(Arc::new(fetcher)).unwrap()
}

fn name_quad(subject: &str, name: &str, graph: &str) -> Quad {
    Quad::new(
        NamedNode::new(subject).unwrap(),
        NamedNode::new("http://example.org/name").unwrap(),
        Literal::new_simple_literal(name),
        GraphName::NamedNode(NamedNode::new(graph).unwrap()),
    )
}

#[tokio::test]
async fn test_turtle_document_is_loaded_into_its_own_graph() {
    let base = start_server().await;
    let document = format!("{}/data.ttl", base);

    let store = read_sources(Some(Source::from(format!("{}#me", document))), http_store())
        .await
        .unwrap();

    assert_eq!(store.len().unwrap(), 2);
    // The relative IRI resolves against the document URL
    assert!(store.contains(&name_quad(&format!("{}#me", document), "Alice", &document)).unwrap());
    assert!(store.contains(&name_quad("http://example.org/bob", "Bob", &document)).unwrap());
}

#[tokio::test]
async fn test_content_type_selects_the_parser() {
    let base = start_server().await;
    let document = format!("{}/data", base);

    let store = read_sources(Some(Source::from(document.as_str())), http_store()).await.unwrap();

    assert!(store.contains(&name_quad("http://example.org/carol", "Carol", &document)).unwrap());
}

#[tokio::test]
async fn test_http_error_status_fails_the_load() {
    let base = start_server().await;
    let document = format!("{}/missing.ttl", base);

    let err = read_sources(Some(Source::from(document.as_str())), http_store()).await.unwrap_err();

    match err {
        EngineError::SourceLoad { source_id, message } => {
            assert_eq!(source_id, document);
            assert!(message.contains("404"), "Unexpected message: {}", message);
        }
        other => panic!("Expected SourceLoad, got {:?}", other),
    }
}

#[tokio::test]
async fn test_graph_variable_names_the_document() {
    let base = start_server().await;
    let documents = vec![format!("{}/data.ttl", base), format!("{}/data", base)];
    let engine = QueryEngine::new(Some(Source::from(documents.clone()))).unwrap();

    let bindings = engine
        .execute_all(
            "SELECT DISTINCT ?g WHERE { GRAPH ?g { ?s <http://example.org/name> ?name } }",
            None,
        )
        .await
        .unwrap();

    let mut graphs: Vec<String> = bindings
        .iter()
        .filter_map(|b| b.get("g"))
        .map(ToString::to_string)
        .collect();
    graphs.sort();
    let mut expected: Vec<String> = documents.iter().map(|d| format!("<{}>", d)).collect();
    expected.sort();
    assert_eq!(graphs, expected);
}

#[tokio::test]
async fn test_local_file_by_path_and_file_url() {
    let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
    let path = std::env::temp_dir().join(format!("sourced-sparql-{}.nt", nanos));
    tokio::fs::write(&path, NTRIPLES).await.unwrap();

    let by_path = read_sources(Some(Source::from(path.to_str().unwrap())), http_store())
        .await
        .unwrap();
    assert_eq!(by_path.len().unwrap(), 1);

    let url = reqwest::Url::from_file_path(&path).unwrap();
    let by_url = read_sources(Some(Source::from(url)), http_store()).await.unwrap();
    assert_eq!(by_url.len().unwrap(), 1);

    tokio::fs::remove_file(&path).await.unwrap();
}

#[tokio::test]
async fn test_missing_local_file_fails() {
    let err = read_sources(
        Some(Source::from("/definitely/not/here/sourced-sparql.ttl")),
        http_store(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, EngineError::SourceLoad { .. }));
}

#[tokio::test]
async fn test_unsupported_scheme_fails() {
    let err = read_sources(Some(Source::from("ftp://example.org/data.ttl")), http_store())
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::SourceLoad { ref message, .. } if message.contains("ftp")));
}
