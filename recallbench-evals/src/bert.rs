// Copyright 2026 Recallbench Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Semantic similarity via embedding cosine.
//!
//! Each answer and its references are embedded through the hosted
//! embedding deployment; the score for a pair is the best cosine across
//! the references. This replaces a local BERT-style scoring model with
//! the same service the dense agent already depends on.

use recallbench_client::embedding::cosine;
use recallbench_client::EmbeddingClient;
use tracing::debug;

use crate::error::{EvalError, Result};
use crate::normalize::normalize_answer;
use crate::QaPair;

/// Cosine-similarity score averaged over all pairs.
pub async fn eval_bert(embedder: &dyn EmbeddingClient, pairs: &[QaPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(EvalError::Empty);
    }

    // One flat batch: the answer for each pair, then its references.
    let mut texts = Vec::new();
    for pair in pairs {
        texts.push(normalize_answer(&pair.answer));
        for reference in &pair.references {
            texts.push(normalize_answer(reference));
        }
    }
    let vectors = embedder.embed_batch(&texts).await?;

    let mut cursor = 0;
    let mut sum = 0.0;
    for pair in pairs {
        let answer_vec = &vectors[cursor];
        cursor += 1;
        let mut best = 0.0f64;
        for _ in &pair.references {
            best = best.max(cosine(answer_vec, &vectors[cursor]));
            cursor += 1;
        }
        debug!(question = %pair.question_id, score = best, "embedding similarity");
        sum += best;
    }
    Ok(sum / pairs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Embeds a text as keyword-presence indicator dimensions.
    struct KeywordEmbedder;

    #[async_trait]
    impl EmbeddingClient for KeywordEmbedder {
        async fn embed_batch(
            &self,
            texts: &[String],
        ) -> recallbench_client::Result<Vec<Vec<f64>>> {
            Ok(texts
                .iter()
                .map(|t| {
                    vec![
                        t.contains("paris") as u8 as f64,
                        t.contains("london") as u8 as f64,
                    ]
                })
                .collect())
        }
    }

    fn pair(refs: &[&str], answer: &str) -> QaPair {
        QaPair::new("q", refs.iter().map(|s| s.to_string()).collect(), answer)
    }

    #[tokio::test]
    async fn matching_pairs_score_high() {
        let pairs = vec![pair(&["Paris"], "paris"), pair(&["London"], "paris")];
        let score = eval_bert(&KeywordEmbedder, &pairs).await.unwrap();
        // First pair cosine 1.0, second 0.0.
        assert!((score - 0.5).abs() < 1e-12);
    }

    #[tokio::test]
    async fn best_reference_is_kept() {
        let pairs = vec![pair(&["London", "Paris"], "paris")];
        let score = eval_bert(&KeywordEmbedder, &pairs).await.unwrap();
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[tokio::test]
    async fn empty_input_is_an_error() {
        assert!(matches!(
            eval_bert(&KeywordEmbedder, &[]).await,
            Err(EvalError::Empty)
        ));
    }
}
