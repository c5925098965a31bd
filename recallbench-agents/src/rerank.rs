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

//! LLM permutation reranking over a BM25 base ranking.
//!
//! Retrieves a wider candidate set with BM25, asks the model for a
//! permutation of it, and keeps the reranked head. An invalid or partial
//! permutation falls back to the base ranking rather than failing the
//! question.

use std::sync::Arc;

use async_trait::async_trait;
use recallbench_client::{ChatApi, JobBody};
use recallbench_core::{Notebook, Question, ScoredSegment, Segment};
use recallbench_datasets::{prompt, Dataset};
use tracing::{debug, info, warn};

use crate::bm25::{Bm25Agent, Bm25Index};
use crate::error::{AgentError, Result};
use crate::{joined_contents, Agent};

/// Candidates retrieved by the base ranking.
const BASE_K: usize = 10;

/// Documents kept after reranking.
const FINAL_K: usize = 5;

const RERANKER_PROMPT: &str = r#"You are tasked with re-ranking 10 documents based on their relevance to a given question. The documents are initially ranked by a lexical retrieval model.

Your response should be a valid JSON array of numbers from 1 to 10, where:

- Each number appears exactly once.
- Each number corresponds to the position of a document in the original ranking.
- The position of each number in the array represents the new rank of the document.
- The number at the first position is the most relevant document, and the number at the last position is the least relevant.

For example, given the following documents:

["France is a country in Europe.", "Paris is the capital of France.", "Berlin is the capital of Germany.", "London is the capital of the UK.", "Rome is the capital of Italy.", "Spain is a country in Europe.", "Paris is one of the largest capitals in Europe.", "The Eiffel Tower is in Paris.", "France is known for its wine.", "Germany is known for its beer."],

and the question "What is the capital of France?", your response should be:

[2, 7, 1, 8, 9, 3, 4, 5, 6, 10]

Let us think step by step.

Finally, the last line of your response should be a valid JSON array of numbers.

Below are the documents for re-ranking.

{documents}
"#;

pub struct RerankAgent {
    model: String,
    chat: Arc<dyn ChatApi>,
    index: Option<Bm25Index>,
    corpus: Vec<Segment>,
}

impl RerankAgent {
    pub fn new(model: impl Into<String>, chat: Arc<dyn ChatApi>) -> Self {
        Self {
            model: model.into(),
            chat,
            index: None,
            corpus: Vec::new(),
        }
    }

    /// Extract a permutation of `1..=n` from the model response: the last
    /// line that looks like a JSON array, validated for length and
    /// completeness. `None` means the base ranking should be kept.
    fn parse_permutation(response: &str, n: usize) -> Option<Vec<usize>> {
        let line = response
            .lines()
            .rev()
            .find(|line| line.trim_start().starts_with('['))?;
        let candidate: Vec<usize> = serde_json::from_str(line.trim()).ok()?;
        if candidate.len() != n {
            return None;
        }
        let mut sorted = candidate.clone();
        sorted.sort_unstable();
        if sorted != (1..=n).collect::<Vec<_>>() {
            return None;
        }
        Some(candidate)
    }
}

#[async_trait]
impl Agent for RerankAgent {
    fn name(&self) -> &'static str {
        "rerank"
    }

    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()> {
        info!(agent = self.name(), "indexing corpus for the base ranking");
        let corpus = dataset.read_corpus()?;
        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|segment| Bm25Agent::retrieval_tokens(&segment.content))
            .collect();
        self.index = Some(Bm25Index::new(&tokenized));
        self.corpus = corpus;
        Ok(())
    }

    async fn reason(&self, question: &Question) -> Result<Notebook> {
        let index = self.index.as_ref().ok_or(AgentError::NotIndexed)?;

        let query = Bm25Agent::retrieval_tokens(&question.text);
        let base = index.top_k(&query, BASE_K);

        let documents: Vec<&str> = base
            .iter()
            .map(|&(idx, _)| self.corpus[idx].content.as_str())
            .collect();
        let system = prompt::fill(
            RERANKER_PROMPT,
            "{documents}",
            &serde_json::to_string(&documents).unwrap_or_default(),
        );

        let outcome = self
            .chat
            .chat(&JobBody::chat(&self.model, system, &question.text))
            .await?;

        let ranking = match Self::parse_permutation(&outcome.content, base.len()) {
            Some(permutation) => {
                debug!(question = %question.id, ?permutation, "applying reranked order");
                permutation
            }
            None => {
                warn!(
                    question = %question.id,
                    "invalid ranking in model response, keeping the base order"
                );
                (1..=base.len()).collect()
            }
        };

        let sources: Vec<ScoredSegment> = ranking
            .into_iter()
            .take(FINAL_K)
            .map(|rank| {
                let (idx, score) = base[rank - 1];
                ScoredSegment::new(
                    self.corpus[idx].id.clone(),
                    self.corpus[idx].content.clone(),
                    score,
                )
            })
            .collect();

        let notes = prompt::fill(
            prompt::qa_prompt_for_model(&self.model),
            "{context}",
            &joined_contents(&sources),
        );
        Ok(Notebook::new(question.id.clone(), question.text.clone())
            .with_sources(sources)
            .with_notes(notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use recallbench_client::{ChatOutcome, TokenUsage};
    use recallbench_core::QuestionCategory;

    struct ScriptedChat {
        response: String,
    }

    #[async_trait]
    impl ChatApi for ScriptedChat {
        async fn chat(&self, _body: &JobBody) -> recallbench_client::Result<ChatOutcome> {
            Ok(ChatOutcome {
                content: self.response.clone(),
                usage: TokenUsage::default(),
            })
        }
    }

    struct StubDataset;

    impl Dataset for StubDataset {
        fn name(&self) -> &'static str {
            "stub"
        }

        fn read(&self) -> recallbench_datasets::Result<Vec<recallbench_core::Sample>> {
            Ok(Vec::new())
        }

        fn read_corpus(&self) -> recallbench_datasets::Result<Vec<Segment>> {
            Ok((0..12)
                .map(|i| {
                    Segment::new(
                        format!("d{i}"),
                        format!("document number {i} mentions cats and topic{i}"),
                    )
                })
                .collect())
        }
    }

    fn question() -> Question {
        Question::new(
            "q1",
            "which documents mention cats?",
            vec!["all".into()],
            QuestionCategory::SingleHop,
        )
    }

    #[test]
    fn permutations_are_validated() {
        let perm = RerankAgent::parse_permutation(
            "thinking...\n[2, 1, 3, 4, 5, 6, 7, 8, 9, 10]",
            10,
        );
        assert_eq!(perm.unwrap()[0], 2);

        // Wrong length.
        assert!(RerankAgent::parse_permutation("[1, 2, 3]", 10).is_none());
        // Duplicate entry.
        assert!(
            RerankAgent::parse_permutation("[1, 1, 3, 4, 5, 6, 7, 8, 9, 10]", 10).is_none()
        );
        // Not JSON.
        assert!(RerankAgent::parse_permutation("no array here", 10).is_none());
    }

    #[test]
    fn last_array_line_wins() {
        let response = "[9, 9, 9]\nreasoning continues\n[1, 2, 3]";
        assert_eq!(
            RerankAgent::parse_permutation(response, 3),
            Some(vec![1, 2, 3])
        );
    }

    #[tokio::test]
    async fn valid_permutation_reorders_the_head() {
        let chat = Arc::new(ScriptedChat {
            response: "step by step\n[10, 9, 8, 7, 6, 5, 4, 3, 2, 1]".to_string(),
        });
        let mut agent = RerankAgent::new("gpt-4o-mini", chat);
        agent.index(&StubDataset).await.unwrap();

        let notebook = agent.reason(&question()).await.unwrap();
        assert_eq!(notebook.sources.len(), FINAL_K);
        // The reversal promotes the base ranking's tail.
        let base_head = {
            let chat = Arc::new(ScriptedChat {
                response: "[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]".to_string(),
            });
            let mut base_agent = RerankAgent::new("gpt-4o-mini", chat);
            base_agent.index(&StubDataset).await.unwrap();
            base_agent.reason(&question()).await.unwrap().sources[0]
                .id
                .clone()
        };
        assert_ne!(notebook.sources[0].id, base_head);
    }

    #[tokio::test]
    async fn garbage_response_falls_back_to_the_base_ranking() {
        let chat = Arc::new(ScriptedChat {
            response: "I cannot rank these documents.".to_string(),
        });
        let mut agent = RerankAgent::new("gpt-4o-mini", chat);
        agent.index(&StubDataset).await.unwrap();

        let notebook = agent.reason(&question()).await.unwrap();
        assert_eq!(notebook.sources.len(), FINAL_K);
        // Base order is preserved: scores are non-increasing.
        for pair in notebook.sources.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
    }
}
