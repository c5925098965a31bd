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

//! Dense retrieval over hosted embeddings.
//!
//! Embeds the whole corpus at index time and scores queries by dot
//! product, the ranking function its embedding models are trained for.

use std::sync::Arc;

use async_trait::async_trait;
use recallbench_client::embedding::dot;
use recallbench_client::EmbeddingClient;
use recallbench_core::{Notebook, Question, ScoredSegment, Segment};
use recallbench_datasets::{prompt, Dataset};
use tracing::info;

use crate::error::{AgentError, Result};
use crate::{joined_contents, Agent};

/// Documents retrieved per question.
const TOP_K: usize = 5;

/// Corpus texts embedded per request, to stay under request size limits.
const EMBED_CHUNK: usize = 64;

pub struct DenseAgent {
    model: String,
    embedder: Arc<dyn EmbeddingClient>,
    corpus: Vec<Segment>,
    embeddings: Vec<Vec<f64>>,
}

impl DenseAgent {
    pub fn new(model: impl Into<String>, embedder: Arc<dyn EmbeddingClient>) -> Self {
        Self {
            model: model.into(),
            embedder,
            corpus: Vec::new(),
            embeddings: Vec::new(),
        }
    }
}

#[async_trait]
impl Agent for DenseAgent {
    fn name(&self) -> &'static str {
        "dense"
    }

    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()> {
        let corpus = dataset.read_corpus()?;
        info!(agent = self.name(), documents = corpus.len(), "embedding corpus");

        let mut embeddings = Vec::with_capacity(corpus.len());
        for chunk in corpus.chunks(EMBED_CHUNK) {
            let texts: Vec<String> = chunk.iter().map(|s| s.content.clone()).collect();
            embeddings.extend(self.embedder.embed_batch(&texts).await?);
        }

        self.corpus = corpus;
        self.embeddings = embeddings;
        info!(agent = self.name(), "corpus embedded");
        Ok(())
    }

    async fn reason(&self, question: &Question) -> Result<Notebook> {
        if self.embeddings.is_empty() {
            return Err(AgentError::NotIndexed);
        }
        let query = self.embedder.embed(&question.text).await?;

        let mut ranked: Vec<(usize, f64)> = self
            .embeddings
            .iter()
            .enumerate()
            .map(|(idx, embedding)| (idx, dot(&query, embedding)))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(TOP_K);

        let sources: Vec<ScoredSegment> = ranked
            .into_iter()
            .map(|(idx, score)| {
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
