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

//! LLM-as-judge scoring.
//!
//! The judge runs as a batch: one job per question asking for a Yes/No
//! verdict on semantic equivalence, scored later from the downloaded
//! results file. Building the jobs and scoring the verdicts are split so
//! the expensive half can run through the batch endpoint overnight.

use recallbench_client::{BatchJob, BatchResult, JobBody};
use tracing::warn;

use crate::error::{EvalError, Result};
use crate::QaPair;

const JUDGE_PROMPT: &str = "You are a helpful judge evaluating the quality of an answer. \
You will answer 'Yes' or 'No' to indicate whether the provided answer matches the expected answer. \
The question is: {question}. \
The expected answer is: {answer}. \
Please answer with 'Yes' or 'No' only. ";

/// One judge job per pair: the verdict prompt as the system message, the
/// model's answer as the user message. Multi-reference questions judge
/// against the first reference.
pub fn build_judge_jobs(model: &str, pairs: &[QaPair]) -> Vec<BatchJob> {
    pairs
        .iter()
        .map(|pair| {
            let expected = pair.references.first().map(String::as_str).unwrap_or("");
            let system = JUDGE_PROMPT
                .replace("{question}", &pair.question)
                .replace("{answer}", expected);
            BatchJob::new(
                pair.question_id.clone(),
                JobBody::chat(model, system, pair.answer.clone()),
            )
        })
        .collect()
}

/// Fraction of verdicts that answer Yes. Anything that does not start
/// with yes/no counts as No, with a warning, so one chatty verdict
/// cannot sink the whole file.
pub fn score_judge_results(results: &[BatchResult]) -> Result<f64> {
    if results.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut yes = 0usize;
    for result in results {
        let verdict = result.content.trim();
        if verdict.to_lowercase().starts_with("yes") {
            yes += 1;
        } else if !verdict.to_lowercase().starts_with("no") {
            warn!(custom_id = %result.custom_id, verdict, "unparseable judge verdict");
        }
    }
    Ok(yes as f64 / results.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use recallbench_client::TokenUsage;

    fn result(id: &str, content: &str) -> BatchResult {
        BatchResult {
            custom_id: id.to_string(),
            content: content.to_string(),
            usage: TokenUsage::default(),
        }
    }

    #[test]
    fn jobs_embed_question_and_expected_answer() {
        let pairs = vec![QaPair::new(
            "q1",
            vec!["Paris".to_string()],
            "The capital is Paris",
        )
        .with_question("What is the capital of France?")];
        let jobs = build_judge_jobs("gpt-4o-mini", &pairs);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].custom_id, "q1");
        let system = &jobs[0].body.messages[0].content;
        assert!(system.contains("What is the capital of France?"));
        assert!(system.contains("The expected answer is: Paris."));
        assert_eq!(jobs[0].body.messages[1].content, "The capital is Paris");
    }

    #[test]
    fn verdicts_are_counted_case_insensitively() {
        let results = vec![
            result("q1", "Yes"),
            result("q2", "yes, they match."),
            result("q3", "No"),
            result("q4", "I am not sure"),
        ];
        assert_eq!(score_judge_results(&results).unwrap(), 0.5);
    }

    #[test]
    fn empty_results_are_an_error() {
        assert!(matches!(score_judge_results(&[]), Err(EvalError::Empty)));
    }
}
