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

//! The full-context agent.
//!
//! No retrieval: every question sees the whole corpus, subject to the
//! model's prompt budget. Questions are grouped five per job so that one
//! rendered context serves the whole group; when the render is over
//! budget, the window search keeps the group's evidence segments and as
//! much surrounding corpus as fits, with a hard token cut as the last
//! resort.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use recallbench_context::{
    budget_for_model, enforce_budget, render, select_window, TiktokenEncoder, Tokenizer,
};
use recallbench_core::{Notebook, Question, ScoredSegment, Segment};
use recallbench_datasets::{prompt, Dataset};
use tracing::{debug, info, warn};

use crate::error::{AgentError, Result};
use crate::Agent;

/// Questions sharing one rendered context.
const CHUNK_SIZE: usize = 5;

pub struct DefaultAgent {
    model: String,
    encoder: Arc<dyn Tokenizer>,
    corpus: Vec<Segment>,
    indexed: bool,
}

impl DefaultAgent {
    pub fn new(model: impl Into<String>) -> Result<Self> {
        let model = model.into();
        let encoder = Arc::new(TiktokenEncoder::for_model(&model)?);
        Ok(Self::with_encoder(model, encoder))
    }

    /// Inject the tokenizer, for callers that already hold one.
    pub fn with_encoder(model: impl Into<String>, encoder: Arc<dyn Tokenizer>) -> Self {
        Self {
            model: model.into(),
            encoder,
            corpus: Vec::new(),
            indexed: false,
        }
    }
}

/// Render `segments` within `max_tokens`, keeping every segment in
/// `must_have_ids`. `None` budget means the full render. An empty
/// must-have set skips the window search and goes straight to the
/// token cut. Returns the rendered context and the segment span it
/// was built from.
fn compose_context(
    segments: &[Segment],
    must_have_ids: &[String],
    max_tokens: Option<usize>,
    encoder: &dyn Tokenizer,
) -> Result<(String, (usize, usize))> {
    let full_span = (0, segments.len());
    let full = render(segments);
    let Some(max_tokens) = max_tokens else {
        return Ok((full, full_span));
    };
    if encoder.count(&full) <= max_tokens {
        return Ok((full, full_span));
    }
    if must_have_ids.is_empty() {
        debug!("no evidence to anchor the window, applying a plain token cut");
        return Ok((enforce_budget(&full, max_tokens, encoder), full_span));
    }
    let (start, end) = select_window(segments, must_have_ids, max_tokens, encoder)?;
    let window = render(&segments[start..end]);
    // The minimal must-have span can itself be over budget.
    Ok((enforce_budget(&window, max_tokens, encoder), (start, end)))
}

/// Evidence ids of a question group, first occurrence order, restricted
/// to ids the corpus actually contains. Content dedup at load time can
/// drop a segment some question still cites, so unknown ids are logged
/// rather than passed through to the window search.
fn group_evidence(questions: &[Question], corpus: &[Segment]) -> Vec<String> {
    let known: HashSet<&str> = corpus.iter().map(|s| s.id.as_str()).collect();
    let mut seen = HashSet::new();
    let mut missing = Vec::new();
    let mut ids = Vec::new();
    for id in questions.iter().flat_map(|q| q.evidence.iter()) {
        if !known.contains(id.as_str()) {
            if !missing.contains(&id.as_str()) {
                missing.push(id.as_str());
            }
        } else if seen.insert(id.as_str()) {
            ids.push(id.clone());
        }
    }
    if !missing.is_empty() {
        warn!(ids = ?missing, "evidence segments absent from the corpus, dropped");
    }
    ids
}

#[async_trait]
impl Agent for DefaultAgent {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()> {
        self.corpus = dataset.read_corpus()?;
        self.indexed = true;
        info!(
            agent = self.name(),
            segments = self.corpus.len(),
            "corpus loaded"
        );
        Ok(())
    }

    async fn reason(&self, _question: &Question) -> Result<Notebook> {
        Err(AgentError::UnsupportedMode {
            agent: "default",
            mode: "single-question",
        })
    }

    async fn reason_many(&self, questions: &[Question]) -> Result<Vec<Notebook>> {
        if !self.indexed {
            return Err(AgentError::NotIndexed);
        }
        let budget = budget_for_model(&self.model);
        let mut notebooks = Vec::with_capacity(questions.len());
        for chunk in questions.chunks(CHUNK_SIZE) {
            let must_haves = group_evidence(chunk, &self.corpus);
            let (context, (start, end)) =
                compose_context(&self.corpus, &must_haves, budget, self.encoder.as_ref())?;
            let notes = prompt::fill(prompt::QA_PROMPT_ALL, "{context}", &context);
            let sources: Vec<ScoredSegment> = self.corpus[start..end]
                .iter()
                .map(|s| ScoredSegment::new(s.id.clone(), s.content.clone(), 0.0))
                .collect();
            for question in chunk {
                notebooks.push(
                    Notebook::new(question.id.clone(), question.text.clone())
                        .with_sources(sources.clone())
                        .with_notes(notes.clone()),
                );
            }
        }
        Ok(notebooks)
    }
}
