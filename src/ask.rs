//! Question answering: embed, rank, answer, record.
//!
//! One linear pipeline per question with a single branch:
//!
//! 1. Validate — the target document (or corpus) must have chunks;
//!    otherwise fail fast with [`RagError::NoChunksAvailable`].
//! 2. Embed the question.
//! 3. Score all chunks in scope and keep the top K above the floor.
//! 4. Empty ranked set → [`AskOutcome::NoRelevantChunks`]. A normal
//!    outcome, not an error, and no query log row is written.
//! 5. Assemble context and generate the answer.
//! 6. Record the query (count returned, wall-clock latency from step 2).
//!
//! No retries, no loops.

use std::collections::HashMap;
use std::time::Instant;

use uuid::Uuid;

use crate::answer;
use crate::embedding::embed_text;
use crate::error::RagError;
use crate::models::{QueryRecord, Source};
use crate::provider::AiProvider;
use crate::rank::{rank, Candidate};
use crate::store::Store;

/// Parameters for one question-answering request.
#[derive(Debug, Clone)]
pub struct AskRequest {
    pub question: String,
    /// `None` scopes the search to the whole corpus.
    pub document_id: Option<String>,
    pub top_k: usize,
    pub min_score: f32,
}

/// Result of a completed ask pipeline.
#[derive(Debug)]
pub enum AskOutcome {
    Answered {
        answer: String,
        sources: Vec<Source>,
        latency_ms: i64,
        query: QueryRecord,
    },
    /// Retrieval found nothing above the similarity floor.
    NoRelevantChunks,
}

/// Answer `request.question` from the chunks in scope.
pub async fn ask(
    store: &dyn Store,
    provider: &dyn AiProvider,
    dims: usize,
    request: AskRequest,
) -> Result<AskOutcome, RagError> {
    if request.question.trim().is_empty() {
        return Err(RagError::validation("question must not be empty"));
    }
    if request.top_k == 0 {
        return Err(RagError::validation("top_k must be >= 1"));
    }
    if !(0.0..=1.0).contains(&request.min_score) {
        return Err(RagError::validation("min_score must be in [0.0, 1.0]"));
    }

    if let Some(doc_id) = &request.document_id {
        if store.get_document(doc_id).await?.is_none() {
            return Err(RagError::validation(format!(
                "document not found: {}",
                doc_id
            )));
        }
    }

    let scope = request.document_id.as_deref();
    if store.chunk_count(scope).await? == 0 {
        return Err(RagError::NoChunksAvailable);
    }

    let started = Instant::now();

    let query_vec = embed_text(provider, dims, &request.question).await?;

    let chunks = store.load_chunks(scope).await?;
    let candidates: Vec<Candidate> = chunks
        .iter()
        .map(|c| Candidate {
            chunk_id: c.id.clone(),
            embedding: c.embedding.clone(),
        })
        .collect();

    let ranked = rank(&query_vec, &candidates, request.min_score, request.top_k);
    if ranked.is_empty() {
        return Ok(AskOutcome::NoRelevantChunks);
    }

    let content_by_id: HashMap<&str, &str> = chunks
        .iter()
        .map(|c| (c.id.as_str(), c.content.as_str()))
        .collect();

    let contents: Vec<String> = ranked
        .iter()
        .map(|s| {
            content_by_id
                .get(s.chunk_id.as_str())
                .map(|c| c.to_string())
                .expect("ranked chunk came from the loaded set")
        })
        .collect();

    let answer_text = answer::answer(provider, &request.question, &contents).await?;

    let latency_ms = started.elapsed().as_millis() as i64;
    let query = QueryRecord {
        id: Uuid::new_v4().to_string(),
        document_id: request.document_id.clone(),
        question: request.question.clone(),
        top_k_returned: ranked.len() as i64,
        latency_ms,
        created_at: chrono::Utc::now().timestamp(),
    };
    store.record_query(&query).await?;

    let sources: Vec<Source> = ranked
        .iter()
        .zip(contents)
        .map(|(scored, content)| Source::new(scored.rank, content, scored.score))
        .collect();

    Ok(AskOutcome::Answered {
        answer: answer_text,
        sources,
        latency_ms,
        query,
    })
}
