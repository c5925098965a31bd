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

//! Shared plumbing for the wiki-paragraph corpora.
//!
//! HotpotQA and 2WikiMultihopQA ship the same JSON shape: one record per
//! question with a `context` of `[title, [sentences]]` pairs and
//! `supporting_facts` naming the gold titles. Segment ids are
//! `<sample_id>:<title>` so they stay unique when several samples are
//! pooled into one retrieval context.

use std::path::Path;

use recallbench_core::{Question, QuestionCategory, Sample, Segment};
use serde::Deserialize;

use crate::error::{DatasetError, Result};
use crate::LoadOptions;

#[derive(Debug, Deserialize)]
pub(crate) struct WikiRecord {
    #[serde(rename = "_id")]
    pub id: String,
    pub question: String,
    pub answer: String,
    pub context: Vec<(String, Vec<String>)>,
    #[serde(default)]
    pub supporting_facts: Vec<(String, serde_json::Value)>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
}

pub(crate) fn load_records(path: &Path, conversation: Option<&str>) -> Result<Vec<WikiRecord>> {
    let raw = crate::read_file(path)?;
    let records: Vec<WikiRecord> =
        serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(records
        .into_iter()
        .filter(|r| conversation.map_or(true, |id| r.id == id))
        .collect())
}

/// Convert one record into a sample: one segment per context paragraph
/// (sentences joined by spaces, title kept only in the id) and a single
/// question whose evidence is the supporting titles present in context.
pub(crate) fn to_sample(record: WikiRecord, category: QuestionCategory) -> Sample {
    let segments: Vec<Segment> = record
        .context
        .iter()
        .map(|(title, sentences)| {
            Segment::grouped(
                format!("{}:{}", record.id, title),
                sentences.join(" "),
                record.id.clone(),
            )
        })
        .collect();

    let mut evidence: Vec<String> = Vec::new();
    for (title, _) in &record.supporting_facts {
        let id = format!("{}:{}", record.id, title);
        let present = record.context.iter().any(|(t, _)| t == title);
        if present && !evidence.contains(&id) {
            evidence.push(id);
        }
    }

    let question = Question::new(
        record.id.clone(),
        record.question,
        vec![record.answer],
        category,
    )
    .with_evidence(evidence);

    Sample::new(record.id, segments, vec![question])
}

/// The full deduplicated corpus across every record.
pub(crate) fn corpus(records: Vec<WikiRecord>, category: QuestionCategory) -> Vec<Segment> {
    let segments = records
        .into_iter()
        .flat_map(|r| to_sample(r, category).segments)
        .collect();
    crate::dedup_by_content(segments)
}
