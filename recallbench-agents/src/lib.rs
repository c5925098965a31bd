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

//! Recallbench Agents
//!
//! Retrieval/QA agents. Each agent indexes a dataset's corpus once, then
//! produces a [`Notebook`] per question: the sources it retrieved plus a
//! fully rendered system prompt for the completion client.
//!
//! Agents never call the completion service for the answer itself; they
//! assemble the context that the prediction pipeline submits. The one
//! inline model call an agent does make, the reranker's permutation
//! request, goes through the mockable `ChatApi` seam.

pub mod bm25;
pub mod default;
pub mod dense;
pub mod error;
pub mod oracle;
pub mod rerank;
pub mod tokenizer;

use std::str::FromStr;

use async_trait::async_trait;
use recallbench_core::{Notebook, Question};
use recallbench_datasets::Dataset;
use tokio::sync::Semaphore;

pub use bm25::Bm25Agent;
pub use default::DefaultAgent;
pub use dense::DenseAgent;
pub use error::{AgentError, Result};
pub use oracle::OracleAgent;
pub use rerank::RerankAgent;

/// Questions reasoned about concurrently by the default `reason_many`.
const MAX_CONCURRENT_QUESTIONS: usize = 8;

/// A retrieval/QA agent.
#[async_trait]
pub trait Agent: Send + Sync {
    fn name(&self) -> &'static str;

    /// Index the dataset's corpus. Must be called before reasoning.
    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()>;

    /// Retrieve and compose context for one question.
    async fn reason(&self, question: &Question) -> Result<Notebook>;

    /// Reason about many questions, bounded-concurrently. Searches share
    /// no mutable state, so they only contend on external services.
    /// Agents whose work is inherently batched override this.
    async fn reason_many(&self, questions: &[Question]) -> Result<Vec<Notebook>> {
        let semaphore = Semaphore::new(MAX_CONCURRENT_QUESTIONS);
        let tasks = questions.iter().map(|question| {
            let semaphore = &semaphore;
            async move {
                // Acquire only fails if the semaphore is closed, which it
                // never is here.
                let _permit = semaphore.acquire().await.ok();
                self.reason(question).await
            }
        });
        futures::future::try_join_all(tasks).await
    }
}

/// The supported agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentKind {
    Default,
    Oracle,
    Bm25,
    Dense,
    Rerank,
}

impl AgentKind {
    pub const ALL: [AgentKind; 5] = [
        AgentKind::Default,
        AgentKind::Oracle,
        AgentKind::Bm25,
        AgentKind::Dense,
        AgentKind::Rerank,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AgentKind::Default => "default",
            AgentKind::Oracle => "oracle",
            AgentKind::Bm25 => "bm25",
            AgentKind::Dense => "dense",
            AgentKind::Rerank => "rerank",
        }
    }
}

impl FromStr for AgentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "default" => Ok(AgentKind::Default),
            "oracle" => Ok(AgentKind::Oracle),
            "bm25" => Ok(AgentKind::Bm25),
            "dense" => Ok(AgentKind::Dense),
            "rerank" => Ok(AgentKind::Rerank),
            other => Err(format!("unknown agent {other:?}")),
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render retrieved document contents into a prompt context block.
pub(crate) fn joined_contents(sources: &[recallbench_core::ScoredSegment]) -> String {
    sources
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}
