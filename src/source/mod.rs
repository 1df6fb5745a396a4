//! Survey record source.
//!
//! Retrieval (`loader`), CSV decoding (`decoder`) and their error type.

pub mod decoder;
pub mod error;
pub mod loader;

pub use error::SourceError;
pub use loader::{RecordSource, SourceLocation};
