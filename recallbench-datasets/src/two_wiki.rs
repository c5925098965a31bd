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

//! 2WikiMultihopQA loader. Same record shape as HotpotQA; every question
//! is multi-hop.

use std::path::PathBuf;

use recallbench_core::{QuestionCategory, Sample, Segment};

use crate::error::Result;
use crate::{wiki, Dataset, LoadOptions};

const FILE: &str = "2wikimultihop_dev.json";

pub struct TwoWiki {
    path: PathBuf,
    options: LoadOptions,
}

impl TwoWiki {
    pub fn new(data_dir: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: data_dir.into().join("twowikimultihopqa").join(FILE),
            options,
        }
    }
}

impl Dataset for TwoWiki {
    fn name(&self) -> &'static str {
        "2wiki"
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let records = wiki::load_records(&self.path, self.options.conversation.as_deref())?;
        let mut samples: Vec<Sample> = records
            .into_iter()
            .map(|r| wiki::to_sample(r, QuestionCategory::MultiHop))
            .collect();
        for sample in &mut samples {
            sample.questions =
                crate::keep_questions(std::mem::take(&mut sample.questions), &self.options);
        }
        let samples = crate::prune_samples(samples, &self.options);
        crate::log_stats(self.name(), &samples);
        Ok(samples)
    }

    fn read_corpus(&self) -> Result<Vec<Segment>> {
        let records = wiki::load_records(&self.path, None)?;
        Ok(wiki::corpus(records, QuestionCategory::MultiHop))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_questions_are_multi_hop() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("twowikimultihopqa")).unwrap();
        std::fs::write(
            dir.path().join("twowikimultihopqa").join(FILE),
            r#"[{
                "_id": "w1",
                "question": "where?",
                "answer": "there",
                "context": [["X", ["a sentence."]]],
                "supporting_facts": [["X", 0]],
                "type": "comparison"
            }]"#,
        )
        .unwrap();

        let dataset = TwoWiki::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        assert_eq!(samples[0].questions[0].category, QuestionCategory::MultiHop);
    }
}
