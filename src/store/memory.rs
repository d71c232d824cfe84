//! In-memory [`Store`] implementation for tests.
//!
//! Uses `HashMap` and `Vec` behind `std::sync::RwLock` for thread safety.
//! The chunk batch is inserted under a single write lock, which gives the
//! same all-or-nothing visibility the SQLite transaction provides.

use std::collections::HashMap;
use std::sync::RwLock;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Chunk, Document, QueryRecord};

use super::Store;

#[derive(Default)]
pub struct MemoryStore {
    docs: RwLock<HashMap<String, Document>>,
    chunks: RwLock<Vec<Chunk>>,
    queries: RwLock<Vec<QueryRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents (test inspection).
    pub fn document_count(&self) -> usize {
        self.docs.read().unwrap().len()
    }

    /// Snapshot of the query log (test inspection).
    pub fn recorded_queries(&self) -> Vec<QueryRecord> {
        self.queries.read().unwrap().clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_document(&self, doc: &Document, chunks: &[Chunk]) -> Result<()> {
        let mut docs = self.docs.write().unwrap();
        let mut stored = self.chunks.write().unwrap();
        if docs.contains_key(&doc.id) {
            anyhow::bail!("document already exists: {}", doc.id);
        }
        docs.insert(doc.id.clone(), doc.clone());
        stored.extend(chunks.iter().cloned());
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        Ok(self.docs.read().unwrap().get(id).cloned())
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        self.docs.write().unwrap().remove(id);
        self.chunks
            .write()
            .unwrap()
            .retain(|c| c.document_id != id);
        self.queries
            .write()
            .unwrap()
            .retain(|q| q.document_id.as_deref() != Some(id));
        Ok(())
    }

    async fn chunk_count(&self, document_id: Option<&str>) -> Result<i64> {
        let chunks = self.chunks.read().unwrap();
        let count = match document_id {
            Some(doc_id) => chunks.iter().filter(|c| c.document_id == doc_id).count(),
            None => chunks.len(),
        };
        Ok(count as i64)
    }

    async fn load_chunks(&self, document_id: Option<&str>) -> Result<Vec<Chunk>> {
        let chunks = self.chunks.read().unwrap();
        let mut selected: Vec<Chunk> = chunks
            .iter()
            .filter(|c| document_id.map_or(true, |doc_id| c.document_id == doc_id))
            .cloned()
            .collect();
        selected.sort_by(|a, b| {
            a.document_id
                .cmp(&b.document_id)
                .then(a.chunk_index.cmp(&b.chunk_index))
        });
        Ok(selected)
    }

    async fn record_query(&self, record: &QueryRecord) -> Result<()> {
        self.queries.write().unwrap().push(record.clone());
        Ok(())
    }
}
