//! Engine and fetcher configuration

use crate::error::{EngineError, Result};
use oxigraph::io::RdfFormat;
use serde::Deserialize;
use std::path::Path;

/// Accept header sent when dereferencing documents over HTTP.
pub const DEFAULT_ACCEPT: &str = "text/turtle;q=1.0, application/n-triples;q=0.9, \
    application/n-quads;q=0.9, application/trig;q=0.9, application/rdf+xml;q=0.8, \
    text/n3;q=0.7, */*;q=0.1";

/// Configuration for the document fetcher
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Request timeout for HTTP fetches
    pub timeout_secs: u64,
    pub user_agent: String,
    pub accept: String,
    /// Media type or file extension used when neither the response nor the path names a format
    pub fallback_format: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: format!("sourced-sparql/{}", env!("CARGO_PKG_VERSION")),
            accept: DEFAULT_ACCEPT.to_string(),
            fallback_format: "text/turtle".to_string(),
        }
    }
}

impl FetchConfig {
    /// Resolves `fallback_format` as a media type first, then as an extension.
    pub fn fallback_rdf_format(&self) -> Result<RdfFormat> {
        RdfFormat::from_media_type(&self.fallback_format)
            .or_else(|| RdfFormat::from_extension(&self.fallback_format))
            .ok_or_else(|| {
                EngineError::Config(format!(
                    "Unknown fallback RDF format: {}",
                    self.fallback_format
                ))
            })
    }
}

/// Configuration for the query engine
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Start loading the default sources as soon as the engine is built
    pub preload: bool,
    /// Base IRI used to resolve relative IRIs in queries
    pub base_iri: Option<String>,
    pub fetch: FetchConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { preload: true, base_iri: None, fetch: FetchConfig::default() }
    }
}

impl EngineConfig {
    /// Reads a JSON configuration file. Missing fields take their defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            EngineError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: EngineConfig = serde_json::from_str(content)?;
        config.fetch.fallback_rdf_format()?;
        Ok(config)
    }
}
