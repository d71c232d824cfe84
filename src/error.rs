//! Error taxonomy for the ingestion and retrieval pipeline.
//!
//! Provider failures, invariant violations, and validation problems all
//! surface as [`RagError`] variants so callers can branch on them without
//! string matching. Storage and CLI plumbing stays on `anyhow` and is
//! funneled through the `Storage` variant at the trait seam.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RagError {
    /// Bad input rejected before any provider call.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The target document (or corpus) has no chunks to search.
    #[error("no chunks available for searching")]
    NoChunksAvailable,

    /// The embedding provider errored or returned malformed output.
    #[error("failed to generate embedding: {0}")]
    EmbeddingFailed(String),

    /// The chat provider errored or returned malformed output.
    #[error("failed to generate answer: {0}")]
    AnswerFailed(String),

    /// An embedding vector did not match the configured dimensionality.
    /// Always fatal to the operation; never padded or truncated.
    #[error("invalid embedding dimension: expected {expected}, got {actual}")]
    InvalidEmbeddingDimension { expected: usize, actual: usize },

    /// A storage operation failed (including a rolled-back ingest batch).
    #[error("storage error: {0}")]
    Storage(#[from] anyhow::Error),
}

impl RagError {
    /// Shorthand for a [`RagError::Validation`] with a formatted message.
    pub fn validation(msg: impl Into<String>) -> Self {
        RagError::Validation(msg.into())
    }
}
