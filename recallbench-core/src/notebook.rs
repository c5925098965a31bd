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

//! The per-question record an agent hands to the prediction pipeline.

use serde::{Deserialize, Serialize};

use crate::segment::ScoredSegment;

/// What an agent retrieved and composed for one question.
///
/// `sources` feed retrieval metrics (recall@K); `notes` is the fully
/// rendered system prompt the completion client should submit alongside
/// the question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub question_id: String,
    pub question: String,
    /// Retrieved context, best first.
    #[serde(default)]
    pub sources: Vec<ScoredSegment>,
    /// Rendered system prompt, absent when the agent delegates prompt
    /// assembly to the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Notebook {
    pub fn new(question_id: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            question: question.into(),
            sources: Vec::new(),
            notes: None,
        }
    }

    pub fn with_sources(mut self, sources: Vec<ScoredSegment>) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
