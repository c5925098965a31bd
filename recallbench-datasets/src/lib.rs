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

//! Recallbench Datasets
//!
//! Loaders for the QA benchmark corpora and the prompt templates built on
//! top of them. Each loader turns an upstream corpus file into typed
//! [`Sample`]s: ordered [`Segment`]s tagged with their sample id as the
//! group key, plus [`Question`](recallbench_core::Question)s whose
//! `evidence` lists the segment ids their gold answer is grounded in.

pub mod error;
pub mod hotpot;
pub mod locomo;
pub mod musique;
pub mod prompt;
pub mod two_wiki;
mod wiki;

use std::path::{Path, PathBuf};
use std::str::FromStr;

use recallbench_core::{Question, QuestionCategory, Sample, Segment};
use tracing::info;

pub use error::{DatasetError, Result};
pub use hotpot::Hotpot;
pub use locomo::Locomo;
pub use musique::Musique;
pub use two_wiki::TwoWiki;

/// Filters and knobs applied while loading a dataset.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Restrict to one sample id. When set, the sample limit is ignored.
    pub conversation: Option<String>,
    /// Restrict to the listed question ids.
    pub questions: Option<Vec<String>>,
    /// Restrict to one question category.
    pub category: Option<QuestionCategory>,
    /// Keep at most this many samples.
    pub limit: Option<usize>,
    /// Model whose tokenizer measures oversized conversations.
    pub model: String,
    /// Tail-truncate conversations that exceed the length cap.
    pub truncate: bool,
}

impl LoadOptions {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            conversation: None,
            questions: None,
            category: None,
            limit: None,
            model: model.into(),
            truncate: true,
        }
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self::new("")
    }
}

/// A loadable benchmark corpus.
pub trait Dataset: Send + Sync {
    fn name(&self) -> &'static str;

    /// Load the (filtered) samples.
    fn read(&self) -> Result<Vec<Sample>>;

    /// The full retrieval corpus, ignoring sample filters: every candidate
    /// segment in corpus order, deduplicated by content, with `group` set
    /// to the owning sample id.
    fn read_corpus(&self) -> Result<Vec<Segment>>;

    /// Relevant-passage QA prompt template for a model.
    fn qa_prompt(&self, model: &str) -> &'static str {
        prompt::qa_prompt_for_model(model)
    }

    /// Sample-level system prompt, for corpora whose whole context is
    /// embedded up front rather than assembled per question.
    fn system_prompt(&self, sample: &Sample) -> Option<String> {
        let _ = sample;
        None
    }
}

/// The supported benchmark corpora.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Locomo,
    Hotpot,
    TwoWiki,
    Musique,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 4] = [
        DatasetKind::Locomo,
        DatasetKind::Hotpot,
        DatasetKind::TwoWiki,
        DatasetKind::Musique,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DatasetKind::Locomo => "locomo",
            DatasetKind::Hotpot => "hotpot",
            DatasetKind::TwoWiki => "2wiki",
            DatasetKind::Musique => "musique",
        }
    }

    /// Construct the loader for this corpus.
    pub fn open(self, data_dir: impl Into<PathBuf>, options: LoadOptions) -> Box<dyn Dataset> {
        let data_dir = data_dir.into();
        match self {
            DatasetKind::Locomo => Box::new(Locomo::new(data_dir, options)),
            DatasetKind::Hotpot => Box::new(Hotpot::new(data_dir, options)),
            DatasetKind::TwoWiki => Box::new(TwoWiki::new(data_dir, options)),
            DatasetKind::Musique => Box::new(Musique::new(data_dir, options)),
        }
    }
}

impl FromStr for DatasetKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "locomo" => Ok(DatasetKind::Locomo),
            "hotpot" => Ok(DatasetKind::Hotpot),
            "2wiki" => Ok(DatasetKind::TwoWiki),
            "musique" => Ok(DatasetKind::Musique),
            other => Err(format!("unknown dataset {other:?}")),
        }
    }
}

impl std::fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Drop samples with no questions or no context, apply the sample limit,
/// then drop questions with no evidence, shedding any sample that ends up
/// question-less. Evidence-less questions cannot anchor a context window
/// and cannot be scored for retrieval.
pub(crate) fn prune_samples(mut samples: Vec<Sample>, options: &LoadOptions) -> Vec<Sample> {
    samples.retain(|s| !s.questions.is_empty() && !s.segments.is_empty());
    if options.conversation.is_none() {
        if let Some(limit) = options.limit {
            samples.truncate(limit);
        }
    }
    for sample in &mut samples {
        sample.questions.retain(|q| !q.evidence.is_empty());
    }
    samples.retain(|s| !s.questions.is_empty());
    samples
}

/// Apply the sample limit alone, for corpora whose questions carry no
/// evidence annotations by design.
pub(crate) fn apply_limit(mut samples: Vec<Sample>, options: &LoadOptions) -> Vec<Sample> {
    if options.conversation.is_none() {
        if let Some(limit) = options.limit {
            samples.truncate(limit);
        }
    }
    samples
}

/// Log headline counts for a loaded dataset.
pub(crate) fn log_stats(name: &str, samples: &[Sample]) {
    let questions: usize = samples.iter().map(Sample::question_count).sum();
    let segments: usize = samples.iter().map(|s| s.segments.len()).sum();
    info!(
        dataset = name,
        samples = samples.len(),
        questions,
        segments,
        "dataset loaded"
    );
}

/// Read a whole file, mapping failures to [`DatasetError::Io`].
pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Keep the first occurrence of each distinct content string.
pub(crate) fn dedup_by_content(segments: Vec<Segment>) -> Vec<Segment> {
    let mut seen = std::collections::HashSet::new();
    segments
        .into_iter()
        .filter(|s| seen.insert(s.content.clone()))
        .collect()
}

/// Shared filter applied by every loader.
pub(crate) fn keep_questions(
    questions: Vec<Question>,
    options: &LoadOptions,
) -> Vec<Question> {
    recallbench_core::filter_questions(
        questions,
        options.questions.as_deref(),
        options.category,
    )
}
