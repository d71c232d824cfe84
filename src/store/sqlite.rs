//! SQLite-backed [`Store`] implementation.
//!
//! Embedding vectors are stored as little-endian f32 BLOBs next to the
//! human-readable chunk content; chunks are indexed by
//! `(document_id, chunk_index)` for ordered retrieval. The chunk batch
//! for a document is written inside one transaction so a partially
//! ingested document is never visible.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{Row, SqlitePool};

use crate::embedding::{blob_to_vec, vec_to_blob};
use crate::models::{Chunk, Document, QueryRecord};

use super::Store;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn row_to_chunk(row: &sqlx::sqlite::SqliteRow) -> Chunk {
    let blob: Vec<u8> = row.get("embedding");
    Chunk {
        id: row.get("id"),
        document_id: row.get("document_id"),
        chunk_index: row.get("chunk_index"),
        content: row.get("content"),
        embedding: blob_to_vec(&blob),
        token_count: row.get("token_count"),
    }
}

#[async_trait]
impl Store for SqliteStore {
    async fn insert_document(&self, doc: &Document, chunks: &[Chunk]) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO documents (id, title, byte_length, original_filename, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&doc.id)
        .bind(&doc.title)
        .bind(doc.byte_length)
        .bind(&doc.original_filename)
        .bind(doc.created_at)
        .execute(&mut *tx)
        .await?;

        for chunk in chunks {
            sqlx::query(
                r#"
                INSERT INTO chunks (id, document_id, chunk_index, content, embedding, token_count)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&chunk.id)
            .bind(&chunk.document_id)
            .bind(chunk.chunk_index)
            .bind(&chunk.content)
            .bind(vec_to_blob(&chunk.embedding))
            .bind(chunk.token_count)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let row = sqlx::query(
            "SELECT id, title, byte_length, original_filename, created_at FROM documents WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Document {
            id: row.get("id"),
            title: row.get("title"),
            byte_length: row.get("byte_length"),
            original_filename: row.get("original_filename"),
            created_at: row.get("created_at"),
        }))
    }

    async fn delete_document(&self, id: &str) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM queries WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM chunks WHERE document_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM documents WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn chunk_count(&self, document_id: Option<&str>) -> Result<i64> {
        let count: i64 = match document_id {
            Some(doc_id) => {
                sqlx::query_scalar("SELECT COUNT(*) FROM chunks WHERE document_id = ?")
                    .bind(doc_id)
                    .fetch_one(&self.pool)
                    .await?
            }
            None => {
                sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
                    .fetch_one(&self.pool)
                    .await?
            }
        };
        Ok(count)
    }

    async fn load_chunks(&self, document_id: Option<&str>) -> Result<Vec<Chunk>> {
        let rows = match document_id {
            Some(doc_id) => {
                sqlx::query(
                    r#"
                    SELECT id, document_id, chunk_index, content, embedding, token_count
                    FROM chunks
                    WHERE document_id = ?
                    ORDER BY document_id, chunk_index
                    "#,
                )
                .bind(doc_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, document_id, chunk_index, content, embedding, token_count
                    FROM chunks
                    ORDER BY document_id, chunk_index
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.iter().map(row_to_chunk).collect())
    }

    async fn record_query(&self, record: &QueryRecord) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO queries (id, document_id, question, top_k_returned, latency_ms, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&record.id)
        .bind(&record.document_id)
        .bind(&record.question)
        .bind(record.top_k_returned)
        .bind(record.latency_ms)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
