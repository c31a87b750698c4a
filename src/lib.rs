pub mod config;
pub mod error;
pub mod ingest;
pub mod search;

pub use error::{IndexerError, Result};
