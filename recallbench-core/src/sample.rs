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

//! Dataset samples: an ordered corpus slice plus its questions.

use serde::{Deserialize, Serialize};

use crate::question::Question;
use crate::segment::Segment;

/// One unit of a benchmark dataset.
///
/// For conversational corpora a sample is one multi-session conversation;
/// for multi-document corpora it is the pool of candidate passages shared
/// by a group of questions. Segment order is the corpus order and is what
/// "contiguous" means downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub id: String,
    pub segments: Vec<Segment>,
    pub questions: Vec<Question>,
}

impl Sample {
    pub fn new(id: impl Into<String>, segments: Vec<Segment>, questions: Vec<Question>) -> Self {
        Self {
            id: id.into(),
            segments,
            questions,
        }
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: &str) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
