//! Cosine-similarity ranking over stored chunk vectors.
//!
//! The ranker is a pure, read-only computation: score every candidate
//! against the query vector, drop those below the similarity floor, sort
//! descending, keep the top K. Ties preserve the original candidate order
//! (`Vec::sort_by` is stable), so results are fully deterministic.

use crate::models::ScoredChunk;

/// A `(chunk_id, embedding)` pair entering the ranking pass.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub chunk_id: String,
    pub embedding: Vec<f32>,
}

/// Score, filter, sort, and truncate candidates against `query_vec`.
///
/// Returns at most `top_k` [`ScoredChunk`]s, highest score first, with
/// 1-based ranks assigned after sorting. An empty result is the normal
/// "no relevant content" outcome, not an error.
pub fn rank(
    query_vec: &[f32],
    candidates: &[Candidate],
    min_score: f32,
    top_k: usize,
) -> Vec<ScoredChunk> {
    let mut scored: Vec<(usize, f32)> = candidates
        .iter()
        .enumerate()
        .filter_map(|(i, cand)| {
            let score = cosine_similarity(query_vec, &cand.embedding);
            if score >= min_score {
                Some((i, score))
            } else {
                None
            }
        })
        .collect();

    scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);

    scored
        .into_iter()
        .enumerate()
        .map(|(position, (i, score))| ScoredChunk {
            chunk_id: candidates[i].chunk_id.clone(),
            score,
            rank: position + 1,
        })
        .collect()
}

/// Compute cosine similarity between two embedding vectors.
///
/// Returns a value in `[-1.0, 1.0]`: `1.0` for identical direction, `0.0`
/// for orthogonal vectors, `-1.0` for opposite direction. Returns `0.0`
/// for empty, mismatched-length, or zero-magnitude vectors — never NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;

    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        return 0.0;
    }

    (dot / denom).clamp(-1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_x(dim: usize) -> Vec<f32> {
        let mut v = vec![0.0; dim];
        v[0] = 1.0;
        v
    }

    fn candidate(id: &str, embedding: Vec<f32>) -> Candidate {
        Candidate {
            chunk_id: id.to_string(),
            embedding,
        }
    }

    #[test]
    fn test_cosine_identical() {
        let v = vec![1.0, 2.0, 3.0];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_orthogonal() {
        let a = vec![1.0, 0.0, 0.0];
        let b = vec![0.0, 1.0, 0.0];
        assert!(cosine_similarity(&a, &b).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_opposite() {
        let a = vec![1.0, 0.0];
        let b = vec![-1.0, 0.0];
        assert!((cosine_similarity(&a, &b) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_zero_vector_is_zero() {
        let zero = vec![0.0, 0.0, 0.0];
        let v = vec![1.0, 2.0, 3.0];
        assert_eq!(cosine_similarity(&zero, &v), 0.0);
        assert_eq!(cosine_similarity(&v, &zero), 0.0);
        assert_eq!(cosine_similarity(&zero, &zero), 0.0);
    }

    #[test]
    fn test_cosine_mismatched_lengths() {
        assert_eq!(cosine_similarity(&[1.0, 2.0], &[1.0]), 0.0);
        assert_eq!(cosine_similarity(&[], &[]), 0.0);
    }

    #[test]
    fn test_cosine_bounded() {
        let a = vec![3.7, -1.2, 0.5, 9.9];
        let b = vec![-0.3, 4.4, 1.1, -2.8];
        let sim = cosine_similarity(&a, &b);
        assert!((-1.0..=1.0).contains(&sim));
    }

    #[test]
    fn test_rank_orders_descending() {
        let query = unit_x(3);
        let candidates = vec![
            candidate("low", vec![1.0, 2.0, 0.0]),
            candidate("high", vec![1.0, 0.1, 0.0]),
        ];
        let ranked = rank(&query, &candidates, 0.0, 10);
        assert_eq!(ranked[0].chunk_id, "high");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].chunk_id, "low");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_rank_stable_on_ties() {
        // Scores [0.9..., 0.5..., 0.9..., 0.3...] by construction: equal
        // scores keep their input order.
        let query = vec![1.0, 0.0];
        let angle = |cos: f32| -> Vec<f32> { vec![cos, (1.0 - cos * cos).sqrt()] };
        let candidates = vec![
            candidate("a", angle(0.9)),
            candidate("b", angle(0.5)),
            candidate("c", angle(0.9)),
            candidate("d", angle(0.3)),
        ];
        let ranked = rank(&query, &candidates, 0.0, 10);
        let order: Vec<&str> = ranked.iter().map(|s| s.chunk_id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_rank_filters_below_min_score() {
        let query = vec![1.0, 0.0];
        let candidates = vec![
            candidate("keep", vec![1.0, 0.0]),
            candidate("drop", vec![0.0, 1.0]),
        ];
        let ranked = rank(&query, &candidates, 0.5, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].chunk_id, "keep");
    }

    #[test]
    fn test_rank_top_k_truncation() {
        let query = unit_x(2);
        let candidates: Vec<Candidate> = (0..10)
            .map(|i| {
                let cos = 0.5 + 0.04 * i as f32;
                candidate(&format!("c{}", i), vec![cos, (1.0 - cos * cos).sqrt()])
            })
            .collect();
        let ranked = rank(&query, &candidates, 0.0, 3);
        assert_eq!(ranked.len(), 3);
        // The three highest cosines are c9, c8, c7.
        let order: Vec<&str> = ranked.iter().map(|s| s.chunk_id.as_str()).collect();
        assert_eq!(order, vec!["c9", "c8", "c7"]);
    }

    #[test]
    fn test_rank_empty_candidates() {
        let ranked = rank(&unit_x(3), &[], 0.0, 5);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_rank_all_filtered_returns_empty() {
        let query = vec![1.0, 0.0];
        let candidates = vec![candidate("far", vec![-1.0, 0.0])];
        let ranked = rank(&query, &candidates, 0.2, 5);
        assert!(ranked.is_empty());
    }
}
