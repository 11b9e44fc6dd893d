//! Public query facade

pub mod query_engine;

pub use query_engine::{BindingStream, QueryEngine, QueryEngineBuilder};
