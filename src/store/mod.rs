//! Storage abstraction for documents, chunks, and the query log.
//!
//! The [`Store`] trait defines every persistence operation the pipeline
//! needs, enabling pluggable backends: SQLite for the CLI, in-memory for
//! tests. Implementations must be `Send + Sync`.
//!
//! The store is the single point of serialization between requests. An
//! ingested document's chunk set must become visible all-or-nothing:
//! [`Store::insert_document`] writes the document and its full chunk batch
//! in one atomic operation, so a query can never observe a partial chunk
//! set.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Chunk, Document, QueryRecord};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Abstract storage backend.
///
/// | Method | Purpose |
/// |--------|---------|
/// | [`insert_document`](Store::insert_document) | Persist a document and its chunks atomically |
/// | [`get_document`](Store::get_document) | Fetch a document by ID |
/// | [`delete_document`](Store::delete_document) | Delete a document, cascading to chunks and queries |
/// | [`chunk_count`](Store::chunk_count) | Count chunks in scope |
/// | [`load_chunks`](Store::load_chunks) | Load chunks (with vectors) in `(document_id, chunk_index)` order |
/// | [`record_query`](Store::record_query) | Append one query log row |
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist `doc` and its complete chunk batch in one transaction.
    /// On error nothing is persisted.
    async fn insert_document(&self, doc: &Document, chunks: &[Chunk]) -> Result<()>;

    /// Fetch a document by ID.
    async fn get_document(&self, id: &str) -> Result<Option<Document>>;

    /// Delete a document together with its chunks and query log rows.
    async fn delete_document(&self, id: &str) -> Result<()>;

    /// Count chunks belonging to `document_id`, or all chunks when `None`.
    async fn chunk_count(&self, document_id: Option<&str>) -> Result<i64>;

    /// Load chunks (including embeddings) for `document_id`, or the whole
    /// corpus when `None`, ordered by `(document_id, chunk_index)`.
    async fn load_chunks(&self, document_id: Option<&str>) -> Result<Vec<Chunk>>;

    /// Append one query log row.
    async fn record_query(&self, record: &QueryRecord) -> Result<()>;
}
