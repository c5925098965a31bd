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

//! ROUGE-1 and ROUGE-2 on normalized tokens.
//!
//! For multi-reference questions the reference with the best ROUGE-1 F1
//! is kept, and its ROUGE-2 comes along with it, so the two reported
//! numbers always describe the same reference.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};
use crate::normalize::answer_tokens;
use crate::QaPair;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RougeScore {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
}

/// ROUGE-1 and ROUGE-2 for one question, best reference by ROUGE-1 F1.
pub fn rouge_score(references: &[String], answer: &str) -> (RougeScore, RougeScore) {
    references
        .iter()
        .map(|r| {
            let expected = answer_tokens(r);
            let actual = answer_tokens(answer);
            (
                rouge_n(&expected, &actual, 1),
                rouge_n(&expected, &actual, 2),
            )
        })
        .max_by(|a, b| a.0.f1.total_cmp(&b.0.f1))
        .unwrap_or_default()
}

/// ROUGE-1 and ROUGE-2 averaged over all pairs.
pub fn eval_rouge(pairs: &[QaPair]) -> Result<(RougeScore, RougeScore)> {
    if pairs.is_empty() {
        return Err(EvalError::Empty);
    }
    let mut sum1 = RougeScore::default();
    let mut sum2 = RougeScore::default();
    for pair in pairs {
        let (r1, r2) = rouge_score(&pair.references, &pair.answer);
        sum1 = add(sum1, r1);
        sum2 = add(sum2, r2);
    }
    let n = pairs.len() as f64;
    Ok((scale(sum1, n), scale(sum2, n)))
}

fn add(a: RougeScore, b: RougeScore) -> RougeScore {
    RougeScore {
        precision: a.precision + b.precision,
        recall: a.recall + b.recall,
        f1: a.f1 + b.f1,
    }
}

fn scale(score: RougeScore, n: f64) -> RougeScore {
    RougeScore {
        precision: score.precision / n,
        recall: score.recall / n,
        f1: score.f1 / n,
    }
}

fn ngrams(tokens: &[String], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut grams = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            let gram: Vec<&str> = window.iter().map(String::as_str).collect();
            *grams.entry(gram).or_insert(0) += 1;
        }
    }
    grams
}

/// N-gram overlap scores. Either side with no n-grams of size `n`
/// scores zero.
fn rouge_n(expected: &[String], actual: &[String], n: usize) -> RougeScore {
    let expected_grams = ngrams(expected, n);
    let actual_grams = ngrams(actual, n);
    let expected_total: usize = expected_grams.values().sum();
    let actual_total: usize = actual_grams.values().sum();
    if expected_total == 0 || actual_total == 0 {
        return RougeScore::default();
    }
    let matched: usize = expected_grams
        .iter()
        .map(|(gram, &count)| count.min(actual_grams.get(gram).copied().unwrap_or(0)))
        .sum();
    if matched == 0 {
        return RougeScore::default();
    }
    let precision = matched as f64 / actual_total as f64;
    let recall = matched as f64 / expected_total as f64;
    RougeScore {
        precision,
        recall,
        f1: 2.0 * precision * recall / (precision + recall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(refs: &[&str], answer: &str) -> QaPair {
        QaPair::new("q", refs.iter().map(|s| s.to_string()).collect(), answer)
    }

    #[test]
    fn identical_texts_score_one_on_both_orders() {
        let (r1, r2) = rouge_score(&["the quick brown fox".into()], "the quick brown fox");
        assert_eq!(r1.f1, 1.0);
        assert_eq!(r2.f1, 1.0);
    }

    #[test]
    fn bigram_order_matters() {
        // Same unigrams, reversed order: ROUGE-1 perfect, ROUGE-2 zero.
        let (r1, r2) = rouge_score(&["brown quick".into()], "quick brown");
        assert_eq!(r1.f1, 1.0);
        assert_eq!(r2, RougeScore::default());
    }

    #[test]
    fn empty_answer_scores_zero() {
        let (r1, r2) = rouge_score(&["something".into()], "");
        assert_eq!(r1, RougeScore::default());
        assert_eq!(r2, RougeScore::default());
    }

    #[test]
    fn best_reference_selected_by_rouge_1() {
        let refs = vec!["unrelated words".to_string(), "quick brown fox".to_string()];
        let (r1, _) = rouge_score(&refs, "quick brown fox");
        assert_eq!(r1.f1, 1.0);
    }

    #[test]
    fn averaging_runs_over_all_pairs() {
        let pairs = vec![
            pair(&["quick fox"], "quick fox"),
            pair(&["quick fox"], "slow turtle"),
        ];
        let (r1, _) = eval_rouge(&pairs).unwrap();
        assert!((r1.f1 - 0.5).abs() < 1e-12);
    }
}
