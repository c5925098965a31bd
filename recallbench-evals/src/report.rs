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

//! The evaluation report.
//!
//! Two artifacts per run: a human-readable `.out` file with one metric
//! per line, and a `.json` sidecar with the same numbers for downstream
//! tooling. Only the metrics that were actually computed appear.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::rouge::RougeScore;
use crate::usage::UsageReport;

#[derive(Debug, Clone, Serialize)]
pub struct EvalReport {
    pub run_id: String,
    pub generated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exact_match: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub f1: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rouge_1: Option<RougeScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rouge_2: Option<RougeScore>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bleu: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bert: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub judge: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recall_at: Option<BTreeMap<usize, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<UsageReport>,
}

impl EvalReport {
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            generated_at: Utc::now(),
            exact_match: None,
            f1: None,
            rouge_1: None,
            rouge_2: None,
            bleu: None,
            bert: None,
            judge: None,
            recall_at: None,
            usage: None,
        }
    }

    /// The human-readable form, one metric per line.
    pub fn render(&self) -> String {
        let mut lines = vec![format!(
            "Evaluation {} ({})",
            self.run_id,
            self.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )];
        if let Some(em) = self.exact_match {
            lines.push(format!("Exact match score: {em}"));
        }
        if let Some(f1) = self.f1 {
            lines.push(format!("F1 score: {f1}"));
        }
        if let Some(rouge) = self.rouge_1 {
            lines.push(format!(
                "ROUGE-1 score: {} (precision {}, recall {})",
                rouge.f1, rouge.precision, rouge.recall
            ));
        }
        if let Some(rouge) = self.rouge_2 {
            lines.push(format!(
                "ROUGE-2 score: {} (precision {}, recall {})",
                rouge.f1, rouge.precision, rouge.recall
            ));
        }
        if let Some(bleu) = self.bleu {
            lines.push(format!("BLEU score: {bleu}"));
        }
        if let Some(bert) = self.bert {
            lines.push(format!("BERT score: {bert}"));
        }
        if let Some(judge) = self.judge {
            lines.push(format!("Judge score: {judge}"));
        }
        if let Some(recall) = &self.recall_at {
            for (k, score) in recall {
                lines.push(format!("Recall@{k}: {score}"));
            }
        }
        if let Some(usage) = self.usage {
            lines.push(format!(
                "Total tokens: {} (prompt {}, completion {})",
                usage.total_tokens, usage.total_prompt_tokens, usage.total_completion_tokens
            ));
            lines.push(format!(
                "Average tokens: {} (prompt {}, completion {})",
                usage.mean_total_tokens, usage.mean_prompt_tokens, usage.mean_completion_tokens
            ));
        }
        lines.join("\n")
    }

    /// Write `eval-<run_id>.out` and its `.json` sidecar, returning the
    /// `.out` path.
    pub fn write(&self, output_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(output_dir)?;
        let out_path = output_dir.join(format!("eval-{}.out", self.run_id));
        fs::write(&out_path, self.render())?;
        let json_path = output_dir.join(format!("eval-{}.json", self.run_id));
        fs::write(&json_path, serde_json::to_string_pretty(self)?)?;
        info!(path = %out_path.display(), "evaluation report written");
        Ok(out_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_computed_metrics_are_rendered() {
        let mut report = EvalReport::new("abc");
        report.exact_match = Some(0.75);
        let rendered = report.render();
        assert!(rendered.contains("Exact match score: 0.75"));
        assert!(!rendered.contains("F1 score"));
        assert!(!rendered.contains("BLEU"));
    }

    #[test]
    fn recall_lines_are_ordered_by_k() {
        let mut report = EvalReport::new("abc");
        report.recall_at = Some(BTreeMap::from([(10, 0.9), (1, 0.4), (5, 0.7)]));
        let rendered = report.render();
        let at1 = rendered.find("Recall@1:").unwrap();
        let at5 = rendered.find("Recall@5:").unwrap();
        let at10 = rendered.find("Recall@10:").unwrap();
        assert!(at1 < at5 && at5 < at10);
    }

    #[test]
    fn writes_out_and_json_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let mut report = EvalReport::new("run1");
        report.f1 = Some(0.5);
        let out_path = report.write(dir.path()).unwrap();
        assert!(out_path.ends_with("eval-run1.out"));
        let json = std::fs::read_to_string(dir.path().join("eval-run1.json")).unwrap();
        assert!(json.contains("\"f1\": 0.5"));
        assert!(!json.contains("bleu"));
    }
}
