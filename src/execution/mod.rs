//! Query Execution Module
//!
//! Turns raw engine output into the bindings handed to callers.
//!
//! # Components
//!
//! - **ResultConverter** - Filters raw rows down to the projected variables

pub mod result_converter;

pub use result_converter::ResultConverter;
