//! Embedding gateway and vector storage codecs.
//!
//! [`embed_text`] is the single path through which every embedding enters
//! the system: one provider call per invocation, with the vector length
//! checked against the configured dimensionality before anything else may
//! touch it. A wrong-length vector is a hard error, never coerced.
//!
//! Also provides the BLOB codecs used to persist vectors in SQLite:
//! - [`vec_to_blob`] — encode a `Vec<f32>` as little-endian bytes
//! - [`blob_to_vec`] — decode a BLOB back into a `Vec<f32>`

use crate::error::RagError;
use crate::provider::AiProvider;

/// Embed `text` via the provider, enforcing the `dims` invariant.
///
/// Provider failures surface as [`RagError::EmbeddingFailed`]; a vector of
/// the wrong length as [`RagError::InvalidEmbeddingDimension`]. Neither is
/// retried here.
pub async fn embed_text(
    provider: &dyn AiProvider,
    dims: usize,
    text: &str,
) -> Result<Vec<f32>, RagError> {
    let vector = provider
        .embed(text)
        .await
        .map_err(|e| RagError::EmbeddingFailed(e.to_string()))?;

    if vector.len() != dims {
        return Err(RagError::InvalidEmbeddingDimension {
            expected: dims,
            actual: vector.len(),
        });
    }

    Ok(vector)
}

/// Encode a float vector as a BLOB (little-endian f32 bytes).
///
/// Each `f32` is stored as 4 bytes in little-endian order, producing a
/// BLOB of `vec.len() × 4` bytes.
pub fn vec_to_blob(vec: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(vec.len() * 4);
    for &v in vec {
        bytes.extend_from_slice(&v.to_le_bytes());
    }
    bytes
}

/// Decode a BLOB back into a float vector. Reverses [`vec_to_blob`].
pub fn blob_to_vec(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use async_trait::async_trait;

    use crate::provider::{ChatMessage, ProviderHealth};

    struct FixedProvider {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl AiProvider for FixedProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            Ok(self.vector.clone())
        }

        async fn chat(&self, _messages: &[ChatMessage]) -> Result<String> {
            Ok(String::new())
        }

        async fn health_check(&self) -> ProviderHealth {
            ProviderHealth {
                embedding_reachable: true,
                chat_reachable: true,
                detail: String::new(),
            }
        }
    }

    struct FailingProvider;

    #[async_trait]
    impl AiProvider for FailingProvider {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            anyhow::bail!("connection refused")
        }

        async fn chat(&self, _messages: &[ChatMessage]) -> Result<String> {
            anyhow::bail!("connection refused")
        }

        async fn health_check(&self) -> ProviderHealth {
            ProviderHealth {
                embedding_reachable: false,
                chat_reachable: false,
                detail: String::new(),
            }
        }
    }

    #[test]
    fn test_blob_roundtrip() {
        let vec = vec![1.0f32, -2.5, 3.125, 0.0, -0.001];
        assert_eq!(blob_to_vec(&vec_to_blob(&vec)), vec);
    }

    #[test]
    fn test_blob_length() {
        assert_eq!(vec_to_blob(&[1.0, 2.0, 3.0]).len(), 12);
        assert!(vec_to_blob(&[]).is_empty());
    }

    #[tokio::test]
    async fn test_embed_accepts_matching_dims() {
        let provider = FixedProvider {
            vector: vec![0.5; 8],
        };
        let vec = embed_text(&provider, 8, "hello").await.unwrap();
        assert_eq!(vec.len(), 8);
    }

    #[tokio::test]
    async fn test_embed_rejects_wrong_dims() {
        let provider = FixedProvider {
            vector: vec![0.5; 4],
        };
        let err = embed_text(&provider, 8, "hello").await.unwrap_err();
        match err {
            RagError::InvalidEmbeddingDimension { expected, actual } => {
                assert_eq!(expected, 8);
                assert_eq!(actual, 4);
            }
            other => panic!("expected InvalidEmbeddingDimension, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_embed_wraps_provider_failure() {
        let err = embed_text(&FailingProvider, 8, "hello").await.unwrap_err();
        assert!(matches!(err, RagError::EmbeddingFailed(_)));
    }
}
