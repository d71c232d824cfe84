//! Context assembly and answer generation.
//!
//! Builds the numbered context block from the retrieved chunks, wraps it
//! in a fixed prompt pair, and runs a single chat completion. The model's
//! response text is returned verbatim — no post-processing, no citation
//! validation.

use crate::error::RagError;
use crate::provider::{AiProvider, ChatMessage};

/// Instruction the model answers under: grounded in context only, `[n]`
/// citations, explicit "I don't know" when the context is insufficient.
const SYSTEM_PROMPT: &str = "You are a helpful assistant that answers questions based on the \
provided context. Always cite the source numbers [1], [2], etc. when referencing information \
from the context. If the context doesn't contain enough information to answer the question, \
say so.";

/// Generate an answer to `question` grounded in `contents`.
///
/// `contents` are the retrieved chunks in rank order; callers must not
/// pass an empty slice (the orchestrator short-circuits that case before
/// reaching here). Chat-provider errors surface as
/// [`RagError::AnswerFailed`] and are not retried.
pub async fn answer(
    provider: &dyn AiProvider,
    question: &str,
    contents: &[String],
) -> Result<String, RagError> {
    debug_assert!(!contents.is_empty(), "answer() requires retrieved chunks");

    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::user(build_user_message(question, contents)),
    ];

    provider
        .chat(&messages)
        .await
        .map_err(|e| RagError::AnswerFailed(e.to_string()))
}

/// Prefix each chunk with its 1-based rank and join with blank lines.
fn build_context_block(contents: &[String]) -> String {
    contents
        .iter()
        .enumerate()
        .map(|(i, content)| format!("[{}] {}", i + 1, content))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn build_user_message(question: &str, contents: &[String]) -> String {
    format!(
        "Context:\n{}\n\nQuestion: {}\n\nPlease provide a comprehensive answer based on the \
         context above, citing sources.",
        build_context_block(contents),
        question
    )
}
