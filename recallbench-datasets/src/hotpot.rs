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

//! HotpotQA distractor-setting loader.

use std::path::PathBuf;

use recallbench_core::{QuestionCategory, Sample, Segment};

use crate::error::Result;
use crate::{wiki, Dataset, LoadOptions};

const FILE: &str = "hotpot_dev_distractor_v1.json";

pub struct Hotpot {
    path: PathBuf,
    options: LoadOptions,
}

impl Hotpot {
    pub fn new(data_dir: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: data_dir.into().join("hotpot").join(FILE),
            options,
        }
    }

    /// Bridge questions hop between pages; comparison questions weigh two
    /// pages against each other and are filed as open-domain.
    fn category(kind: Option<&str>) -> QuestionCategory {
        if kind == Some("bridge") {
            QuestionCategory::MultiHop
        } else {
            QuestionCategory::OpenDomain
        }
    }
}

impl Dataset for Hotpot {
    fn name(&self) -> &'static str {
        "hotpot"
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let records = wiki::load_records(&self.path, self.options.conversation.as_deref())?;
        let mut samples: Vec<Sample> = records
            .into_iter()
            .map(|r| {
                let category = Self::category(r.kind.as_deref());
                wiki::to_sample(r, category)
            })
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
