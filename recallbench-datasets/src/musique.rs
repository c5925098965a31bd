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

//! MuSiQue loader.

use std::path::{Path, PathBuf};

use recallbench_core::{Question, QuestionCategory, Sample, Segment};
use serde::Deserialize;

use crate::error::{DatasetError, Result};
use crate::{Dataset, LoadOptions};

const FILE: &str = "musique_dev.json";

#[derive(Debug, Deserialize)]
struct MusiqueRecord {
    id: String,
    question: String,
    answer: String,
    #[serde(default)]
    answer_aliases: Vec<String>,
    paragraphs: Vec<MusiqueParagraph>,
}

#[derive(Debug, Deserialize)]
struct MusiqueParagraph {
    idx: u32,
    paragraph_text: String,
    #[serde(default)]
    is_supporting: bool,
}

pub struct Musique {
    path: PathBuf,
    options: LoadOptions,
}

impl Musique {
    pub fn new(data_dir: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: data_dir.into().join("musique").join(FILE),
            options,
        }
    }

    fn load_records(path: &Path, conversation: Option<&str>) -> Result<Vec<MusiqueRecord>> {
        let raw = crate::read_file(path)?;
        let records: Vec<MusiqueRecord> =
            serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(records
            .into_iter()
            .filter(|r| conversation.map_or(true, |id| r.id == id))
            .collect())
    }

    fn to_sample(record: MusiqueRecord) -> Sample {
        let segments: Vec<Segment> = record
            .paragraphs
            .iter()
            .map(|p| {
                Segment::grouped(
                    format!("{}:{}", record.id, p.idx),
                    p.paragraph_text.clone(),
                    record.id.clone(),
                )
            })
            .collect();

        let evidence: Vec<String> = record
            .paragraphs
            .iter()
            .filter(|p| p.is_supporting)
            .map(|p| format!("{}:{}", record.id, p.idx))
            .collect();

        let mut answers = vec![record.answer];
        for alias in record.answer_aliases {
            if !answers.contains(&alias) {
                answers.push(alias);
            }
        }

        let question = Question::new(
            record.id.clone(),
            record.question,
            answers,
            QuestionCategory::MultiHop,
        )
        .with_evidence(evidence);

        Sample::new(record.id, segments, vec![question])
    }
}

impl Dataset for Musique {
    fn name(&self) -> &'static str {
        "musique"
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let records = Self::load_records(&self.path, self.options.conversation.as_deref())?;
        let mut samples: Vec<Sample> = records.into_iter().map(Self::to_sample).collect();
        for sample in &mut samples {
            sample.questions =
                crate::keep_questions(std::mem::take(&mut sample.questions), &self.options);
        }
        let samples = crate::prune_samples(samples, &self.options);
        crate::log_stats(self.name(), &samples);
        Ok(samples)
    }

    fn read_corpus(&self) -> Result<Vec<Segment>> {
        let records = Self::load_records(&self.path, None)?;
        let segments = records
            .into_iter()
            .flat_map(|r| Self::to_sample(r).segments)
            .collect();
        Ok(crate::dedup_by_content(segments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"[{
        "id": "m1",
        "question": "which river?",
        "answer": "the Rhine",
        "answer_aliases": ["Rhine", "the Rhine"],
        "paragraphs": [
            {"idx": 0, "paragraph_text": "About the Rhine.", "is_supporting": true},
            {"idx": 1, "paragraph_text": "About something else.", "is_supporting": false}
        ]
    }]"#;

    fn write_fixture(dir: &Path) {
        std::fs::create_dir(dir.join("musique")).unwrap();
        std::fs::write(dir.join("musique").join(FILE), RAW).unwrap();
    }

    #[test]
    fn supporting_paragraphs_become_evidence() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let dataset = Musique::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        assert_eq!(samples[0].questions[0].evidence, vec!["m1:0".to_string()]);
    }

    #[test]
    fn aliases_extend_answers_without_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        write_fixture(dir.path());
        let dataset = Musique::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        assert_eq!(
            samples[0].questions[0].answers,
            vec!["the Rhine".to_string(), "Rhine".to_string()]
        );
    }
}
