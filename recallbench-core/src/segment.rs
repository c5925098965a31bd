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

//! Text segments, the atomic unit of retrievable context.
//!
//! A segment is one document, passage, or conversational message. Segments
//! form an ordered sequence within a sample; contiguity is by position in
//! that sequence, so the order of construction is significant.

use serde::{Deserialize, Serialize};

/// An immutable unit of candidate context text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Stable identifier, unique within one sample.
    pub id: String,
    /// The text itself.
    pub content: String,
    /// Optional grouping key. The renderer emits a header line whenever
    /// consecutive segments disagree on this value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

impl Segment {
    /// Create an ungrouped segment.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            group: None,
        }
    }

    /// Create a segment tagged with a grouping key.
    pub fn grouped(
        id: impl Into<String>,
        content: impl Into<String>,
        group: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            group: Some(group.into()),
        }
    }
}

/// A segment paired with a retrieval relevance score.
///
/// Produced by retrieval agents and recorded in [`crate::Notebook`]
/// sources so retrieval quality can be evaluated independently of answer
/// quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredSegment {
    pub id: String,
    pub content: String,
    pub score: f64,
}

impl ScoredSegment {
    pub fn new(id: impl Into<String>, content: impl Into<String>, score: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grouped_segment_carries_group_key() {
        let seg = Segment::grouped("d1", "some text", "sample-7");
        assert_eq!(seg.group.as_deref(), Some("sample-7"));
    }

    #[test]
    fn ungrouped_segment_omits_group_in_json() {
        let seg = Segment::new("d1", "some text");
        let json = serde_json::to_string(&seg).unwrap();
        assert!(!json.contains("group"));
    }

    #[test]
    fn segment_round_trips_through_json() {
        let seg = Segment::grouped("d9", "content line", "s1");
        let json = serde_json::to_string(&seg).unwrap();
        let back: Segment = serde_json::from_str(&json).unwrap();
        assert_eq!(back, seg);
    }
}
