//! Document ingestion: chunk, embed, persist.
//!
//! The full chunk batch is embedded before anything touches the store, and
//! the store writes the document plus all chunks in one transaction. If
//! any embedding call fails, the request fails with zero rows persisted.

use uuid::Uuid;

use crate::chunk::{estimate_tokens, split_text};
use crate::embedding::embed_text;
use crate::error::RagError;
use crate::models::{Chunk, Document};
use crate::provider::AiProvider;
use crate::store::Store;

/// Parameters for one ingestion request.
#[derive(Debug, Clone)]
pub struct IngestRequest {
    pub title: String,
    pub content: String,
    pub chunk_size: usize,
    pub overlap_size: usize,
    pub original_filename: Option<String>,
}

/// Ingest a document: split `content`, embed each piece, and persist the
/// document with its chunk batch atomically.
///
/// Chunks are embedded strictly in index order, one provider call per
/// chunk, so embeddings can never be matched to the wrong `chunk_index`.
/// Returns the created [`Document`].
pub async fn ingest(
    store: &dyn Store,
    provider: &dyn AiProvider,
    dims: usize,
    request: IngestRequest,
) -> Result<Document, RagError> {
    if request.title.trim().is_empty() {
        return Err(RagError::validation("title must not be empty"));
    }
    if request.content.trim().is_empty() {
        return Err(RagError::validation("content must not be empty"));
    }
    if request.chunk_size == 0 {
        return Err(RagError::validation("chunk_size must be > 0"));
    }

    let doc = Document {
        id: Uuid::new_v4().to_string(),
        title: request.title.clone(),
        byte_length: request.content.len() as i64,
        original_filename: request.original_filename.clone(),
        created_at: chrono::Utc::now().timestamp(),
    };

    let pieces = split_text(&request.content, request.chunk_size, request.overlap_size);

    let mut chunks = Vec::with_capacity(pieces.len());
    for (index, content) in pieces.into_iter().enumerate() {
        let embedding = embed_text(provider, dims, &content).await?;
        let token_count = estimate_tokens(&content);
        chunks.push(Chunk {
            id: Uuid::new_v4().to_string(),
            document_id: doc.id.clone(),
            chunk_index: index as i64,
            content,
            embedding,
            token_count,
        });
    }

    store.insert_document(&doc, &chunks).await?;

    Ok(doc)
}
