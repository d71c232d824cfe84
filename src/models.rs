//! Core data models used throughout docqa.
//!
//! These types represent the documents, chunks, and query records that flow
//! through the ingestion and retrieval pipeline.

use serde::Serialize;

/// An ingested document. Immutable after creation; deleting it cascades
/// to its chunks and query records.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub title: String,
    /// Size of the original content in bytes.
    pub byte_length: i64,
    pub original_filename: Option<String>,
    /// UNIX timestamp (seconds).
    pub created_at: i64,
}

/// A chunk of a document's content, stored with its embedding vector.
///
/// `chunk_index` values for a document form a contiguous ascending
/// sequence starting at 0. Chunks are written in a single batch during
/// ingestion and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Chunk {
    pub id: String,
    pub document_id: String,
    pub chunk_index: i64,
    pub content: String,
    pub embedding: Vec<f32>,
    /// Rough token estimate (~4 bytes per token).
    pub token_count: i64,
}

/// One row of the query log, written once per question that reaches the
/// answering stage.
#[derive(Debug, Clone)]
pub struct QueryRecord {
    pub id: String,
    /// Absent when the question was asked against the whole corpus.
    pub document_id: Option<String>,
    pub question: String,
    pub top_k_returned: i64,
    pub latency_ms: i64,
    pub created_at: i64,
}

/// A chunk scored against a query vector. Transient; produced per query
/// and discarded after response assembly.
#[derive(Debug, Clone)]
pub struct ScoredChunk {
    pub chunk_id: String,
    /// Cosine similarity in [-1, 1].
    pub score: f32,
    /// 1-based position after descending sort.
    pub rank: usize,
}

/// A citation-ready source returned alongside an answer.
#[derive(Debug, Clone, Serialize)]
pub struct Source {
    /// 1-based rank, matching the `[n]` markers in the context block.
    pub rank: usize,
    pub content: String,
    pub score: f32,
    /// `score * 100` rounded to 2 decimal places.
    pub score_percentage: f64,
    /// First 200 characters of the content, `...`-terminated if truncated.
    pub preview: String,
}

impl Source {
    /// Build a source entry from a ranked chunk's content and score.
    pub fn new(rank: usize, content: String, score: f32) -> Self {
        let score_percentage = (f64::from(score) * 100.0 * 100.0).round() / 100.0;
        let preview = preview_of(&content);
        Self {
            rank,
            content,
            score,
            score_percentage,
            preview,
        }
    }
}

/// First 200 characters of `content`, with a trailing ellipsis when cut.
fn preview_of(content: &str) -> String {
    let mut preview: String = content.chars().take(200).collect();
    if content.chars().count() > 200 {
        preview.push_str("...");
    }
    preview
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_percentage_rounding() {
        let source = Source::new(1, "text".to_string(), 0.956789);
        assert_eq!(source.score_percentage, 95.68);
    }

    #[test]
    fn test_score_percentage_exact() {
        let source = Source::new(1, "text".to_string(), 0.5);
        assert_eq!(source.score_percentage, 50.0);
    }

    #[test]
    fn test_preview_short_content_untouched() {
        let source = Source::new(1, "short".to_string(), 0.9);
        assert_eq!(source.preview, "short");
    }

    #[test]
    fn test_preview_truncated_with_ellipsis() {
        let content = "x".repeat(300);
        let source = Source::new(1, content, 0.9);
        assert_eq!(source.preview.chars().count(), 203);
        assert!(source.preview.ends_with("..."));
    }

    #[test]
    fn test_preview_counts_chars_not_bytes() {
        let content = "é".repeat(250);
        let source = Source::new(1, content, 0.9);
        assert!(source.preview.ends_with("..."));
        assert_eq!(source.preview.chars().count(), 203);
    }
}
