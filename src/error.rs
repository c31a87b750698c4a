//! Error types / 错误类型

use thiserror::Error;

/// Errors that abort an ingestion run or a service call / 中断运行的错误
///
/// Per-item extraction problems are not errors; see `ingest::ItemFailure`.
#[derive(Debug, Error)]
pub enum IndexerError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("zip archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("request to index service failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("index service returned {status}: {body}")]
    Service { status: u16, body: String },

    #[error("bulk request rejected {failed} of {batch} documents: {reason}")]
    BulkRejected {
        failed: usize,
        batch: usize,
        reason: String,
    },

    #[error("index service at {0} is unreachable")]
    Unreachable(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, IndexerError>;
