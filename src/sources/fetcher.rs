//! Document fetching.
//!
//! A `DocumentFetcher` dereferences a document identifier and loads the
//! triples it contains into a store. `HttpDocumentFetcher` handles
//! `http(s)://` URLs with reqwest and `file://` URLs or plain paths with
//! `tokio::fs`.

use crate::config::FetchConfig;
use crate::error::{EngineError, Result};
use crate::storage::GraphStore;
use futures_util::future::{BoxFuture, FutureExt};
use log::{debug, trace};
use oxigraph::io::{RdfFormat, RdfParser};
use oxigraph::model::NamedNode;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Url};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub trait DocumentFetcher: Send + Sync {
    /// Loads `document` into `store`, returning the number of quads added.
    fn load<'a>(&'a self, document: &'a str, store: &'a GraphStore) -> BoxFuture<'a, Result<usize>>;
}

/// Where a document lives once its identifier is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    Remote(Url),
    Local(PathBuf),
}

fn locate(document: &str) -> Result<Location> {
    match Url::parse(document) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(Location::Remote(url)),
        Ok(url) if url.scheme() == "file" => url
            .to_file_path()
            .map(Location::Local)
            .map_err(|()| EngineError::source_load(document, "invalid file URL")),
        // A single letter scheme is a Windows drive, not a URL
        Ok(url) if url.scheme().len() > 1 => Err(EngineError::source_load(
            document,
            format!("unsupported URL scheme: {}", url.scheme()),
        )),
        _ => Ok(Location::Local(PathBuf::from(document))),
    }
}

fn format_from_media_type(content_type: &str) -> Option<RdfFormat> {
    let media_type = content_type.split(';').next()?.trim();
    RdfFormat::from_media_type(media_type)
}

fn format_from_path(path: &str) -> Option<RdfFormat> {
    Path::new(path).extension().and_then(|ext| ext.to_str()).and_then(RdfFormat::from_extension)
}

pub struct HttpDocumentFetcher {
    client: Client,
    config: FetchConfig,
    fallback_format: RdfFormat,
}

impl HttpDocumentFetcher {
    pub fn new(config: FetchConfig) -> Result<Self> {
        let fallback_format = config.fallback_rdf_format()?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| EngineError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, config, fallback_format })
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Downloads the document body and the format it declares, if any.
    async fn fetch_remote(&self, document: &str, url: Url) -> Result<(Vec<u8>, RdfFormat)> {
        debug!("Fetching {}", url);
        let response = self
            .client
            .get(url.clone())
            .header(ACCEPT, self.config.accept.as_str())
            .send()
            .await
            .map_err(|e| EngineError::source_load(document, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EngineError::source_load(document, format!("HTTP status {}", status)));
        }

        let declared = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(format_from_media_type);
        let format = declared
            .or_else(|| format_from_path(url.path()))
            .unwrap_or(self.fallback_format);

        let body = response.bytes().await.map_err(|e| EngineError::source_load(document, e))?;
        trace!("Received {} bytes from {} as {:?}", body.len(), url, format);
        Ok((body.to_vec(), format))
    }

    async fn fetch_local(&self, document: &str, path: &Path) -> Result<(Vec<u8>, RdfFormat)> {
        debug!("Reading {}", path.display());
        let body = tokio::fs::read(path).await.map_err(|e| EngineError::source_load(document, e))?;
        let format = path
            .to_str()
            .and_then(format_from_path)
            .unwrap_or(self.fallback_format);
        Ok((body, format))
    }

    /// The IRI used as base and as graph name for a document's triples.
    async fn document_iri(document: &str, location: &Location) -> Option<String> {
        let resolved = match location {
            Location::Remote(url) => Some(url.to_string()),
            Location::Local(path) => match tokio::fs::canonicalize(path).await {
                Ok(absolute) => Url::from_file_path(absolute).ok().map(String::from),
                Err(_) => None,
            },
        };
        resolved.or_else(|| NamedNode::new(document).ok().map(NamedNode::into_string))
    }

    async fn load_document(&self, document: &str, store: &GraphStore) -> Result<usize> {
        let location = locate(document)?;
        let (body, format) = match &location {
            Location::Remote(url) => self.fetch_remote(document, url.clone()).await?,
            Location::Local(path) => self.fetch_local(document, path).await?,
        };

        let iri = Self::document_iri(document, &location).await;
        let mut parser = RdfParser::from_format(format);
        if let Some(iri) = iri {
            parser = parser
                .with_base_iri(iri.as_str())
                .map_err(|e| EngineError::source_load(document, e))?;
            parser = parser.with_default_graph(NamedNode::new_unchecked(iri));
        }

        let added = store
            .load_bytes(parser, &body)
            .map_err(|e| EngineError::source_load(document, e))?;
        debug!("Loaded {} quads from {}", added, document);
        Ok(added)
    }
}

impl DocumentFetcher for HttpDocumentFetcher {
    fn load<'a>(&'a self, document: &'a str, store: &'a GraphStore) -> BoxFuture<'a, Result<usize>> {
        self.load_document(document, store).boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locate_remote_and_local() {
        assert!(matches!(locate("https://example.org/data.ttl").unwrap(), Location::Remote(_)));
        assert_eq!(
            locate("data/people.ttl").unwrap(),
            Location::Local(PathBuf::from("data/people.ttl"))
        );
        assert!(matches!(locate("ftp://example.org/data.ttl"), Err(EngineError::SourceLoad { .. })));
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(format_from_media_type("text/turtle; charset=utf-8"), Some(RdfFormat::Turtle));
        assert_eq!(format_from_media_type("application/n-triples"), Some(RdfFormat::NTriples));
        assert_eq!(format_from_path("/data/people.nq"), Some(RdfFormat::NQuads));
        assert_eq!(format_from_path("/data/people"), None);
    }
}
