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

//! Plumbing shared by the predict and eval paths.

use std::collections::HashMap;

use anyhow::{Context, Result};
use recallbench_core::{Question, QuestionCategory, Sample};
use recallbench_datasets::{Dataset, DatasetKind, LoadOptions};

use crate::Cli;

/// Resolve the dataset loader from the CLI flags.
pub fn open_dataset(cli: &Cli) -> Result<Box<dyn Dataset>> {
    let category = cli
        .category
        .map(QuestionCategory::try_from)
        .transpose()
        .context("invalid --category")?;
    let mut options = LoadOptions::new(cli.model.clone());
    options.conversation = cli.conversation.clone();
    options.category = category;
    options.limit = cli.limit;

    let kind: DatasetKind = cli.dataset.parse().map_err(anyhow::Error::msg)?;
    Ok(kind.open(&cli.data_dir, options))
}

/// Flatten the samples' questions, capped per sample by `--questions`.
/// Adversarial questions are dropped unless a category filter asked for
/// them; they have no answerable gold reference.
pub fn collect_questions(
    samples: &[Sample],
    per_sample: Option<usize>,
    category_filtered: bool,
) -> Vec<Question> {
    samples
        .iter()
        .flat_map(|sample| {
            sample
                .questions
                .iter()
                .filter(|q| category_filtered || q.category != QuestionCategory::Adversarial)
                .take(per_sample.unwrap_or(usize::MAX))
                .cloned()
        })
        .collect()
}

/// Gold questions by id.
pub fn gold_index(samples: &[Sample]) -> HashMap<String, Question> {
    samples
        .iter()
        .flat_map(|s| s.questions.iter())
        .map(|q| (q.id.clone(), q.clone()))
        .collect()
}

/// Pull the answer out of a completion. Models prompted for a JSON
/// object respond with `{"answer": ...}`; everything else is taken
/// verbatim.
pub fn extract_answer(content: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(content.trim()) {
        if let Some(answer) = value.get("answer") {
            return match answer {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
        }
    }
    content.trim().to_string()
}
