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

//! Oracle agent: retrieves the gold evidence directly.
//!
//! Cheats by reading the questions' evidence annotations at index time,
//! which makes it the retrieval ceiling every other agent is compared
//! against.

use std::collections::HashMap;

use async_trait::async_trait;
use recallbench_core::{Notebook, Question, ScoredSegment};
use recallbench_datasets::{prompt, Dataset};
use tracing::info;

use crate::error::{AgentError, Result};
use crate::{joined_contents, Agent};

/// Score attached to oracle sources; gold evidence outranks anything a
/// real retriever reports.
const ORACLE_SCORE: f64 = 100.0;

pub struct OracleAgent {
    model: String,
    /// Question id to its gold evidence segments.
    index: Option<HashMap<String, Vec<ScoredSegment>>>,
}

impl OracleAgent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            index: None,
        }
    }
}

#[async_trait]
impl Agent for OracleAgent {
    fn name(&self) -> &'static str {
        "oracle"
    }

    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()> {
        let samples = dataset.read()?;
        let mut index = HashMap::new();
        for sample in &samples {
            for question in &sample.questions {
                let evidence: Vec<ScoredSegment> = question
                    .evidence
                    .iter()
                    .filter_map(|id| sample.segment(id))
                    .map(|segment| {
                        ScoredSegment::new(
                            segment.id.clone(),
                            segment.content.clone(),
                            ORACLE_SCORE,
                        )
                    })
                    .collect();
                index.insert(question.id.clone(), evidence);
            }
        }
        info!(agent = self.name(), questions = index.len(), "evidence indexed");
        self.index = Some(index);
        Ok(())
    }

    async fn reason(&self, question: &Question) -> Result<Notebook> {
        let index = self.index.as_ref().ok_or(AgentError::NotIndexed)?;
        let sources = index
            .get(&question.id)
            .ok_or_else(|| AgentError::UnknownQuestion(question.id.clone()))?
            .clone();

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
