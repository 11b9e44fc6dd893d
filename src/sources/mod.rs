//! RDF data sources and the loader that merges them into one store.

pub mod fetcher;
pub mod loader;
pub mod quad_source;
pub mod source;

pub use fetcher::{DocumentFetcher, HttpDocumentFetcher};
pub use loader::{read_sources, read_sources_into_new};
pub use quad_source::{MemoryQuadSource, QuadPattern, QuadSource, QuadStream, StreamQuadSource};
pub use source::{document_id, Source};
