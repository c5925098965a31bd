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

//! Recallbench Evals
//!
//! Answer-quality and retrieval-quality metrics over prediction results.
//! The lexical metrics (exact match, F1, ROUGE, BLEU) are pure functions
//! of normalized text; the semantic ones (embedding similarity, the LLM
//! judge) go through the same client seams the agents use. Everything
//! averages over [`QaPair`]s and lands in an [`EvalReport`].

pub mod bert;
pub mod bleu;
pub mod error;
pub mod exact_match;
pub mod f1;
pub mod judge;
pub mod normalize;
pub mod report;
pub mod retrieval;
pub mod rouge;
pub mod usage;

pub use bert::eval_bert;
pub use bleu::{bleu_score, eval_bleu};
pub use error::{EvalError, Result};
pub use exact_match::{eval_exact_match, exact_match};
pub use f1::{eval_f1, f1_score};
pub use judge::{build_judge_jobs, score_judge_results};
pub use normalize::{answer_tokens, normalize_answer};
pub use report::EvalReport;
pub use retrieval::{eval_retrieval, RetrievalPair, K_LIST};
pub use rouge::{eval_rouge, rouge_score, RougeScore};
pub use usage::{eval_usage, UsageReport};

/// One scored question: the gold references and the model's answer.
#[derive(Debug, Clone)]
pub struct QaPair {
    pub question_id: String,
    /// The question text, needed only by the judge prompt.
    pub question: String,
    pub references: Vec<String>,
    pub answer: String,
}

impl QaPair {
    pub fn new(
        question_id: impl Into<String>,
        references: Vec<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            question: String::new(),
            references,
            answer: answer.into(),
        }
    }

    pub fn with_question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }
}
