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

//! Sentence BLEU with modified n-gram precision up to 4-grams and the
//! standard brevity penalty. Scored against each reference separately,
//! best reference kept.

use std::collections::HashMap;

use crate::error::{EvalError, Result};
use crate::normalize::answer_tokens;
use crate::QaPair;

const MAX_ORDER: usize = 4;

fn ngram_counts(tokens: &[String], n: usize) -> HashMap<Vec<&str>, usize> {
    let mut counts = HashMap::new();
    if tokens.len() >= n {
        for window in tokens.windows(n) {
            let gram: Vec<&str> = window.iter().map(String::as_str).collect();
            *counts.entry(gram).or_insert(0) += 1;
        }
    }
    counts
}

/// BLEU of the answer against one reference.
fn bleu_single(reference: &[String], candidate: &[String]) -> f64 {
    if candidate.is_empty() || reference.is_empty() {
        return 0.0;
    }
    let mut log_precision_sum = 0.0;
    for n in 1..=MAX_ORDER.min(candidate.len()) {
        let candidate_grams = ngram_counts(candidate, n);
        let reference_grams = ngram_counts(reference, n);
        let clipped: usize = candidate_grams
            .iter()
            .map(|(gram, &count)| count.min(reference_grams.get(gram).copied().unwrap_or(0)))
            .sum();
        if clipped == 0 {
            return 0.0;
        }
        let total: usize = candidate_grams.values().sum();
        log_precision_sum += (clipped as f64 / total as f64).ln();
    }
    let orders = MAX_ORDER.min(candidate.len()) as f64;
    let geo_mean = (log_precision_sum / orders).exp();

    let brevity = if candidate.len() < reference.len() {
        (1.0 - reference.len() as f64 / candidate.len() as f64).exp()
    } else {
        1.0
    };
    brevity * geo_mean
}

/// Best BLEU across the references.
pub fn bleu_score(references: &[String], answer: &str) -> f64 {
    let candidate = answer_tokens(answer);
    references
        .iter()
        .map(|r| bleu_single(&answer_tokens(r), &candidate))
        .fold(0.0, f64::max)
}

/// BLEU averaged over all pairs.
pub fn eval_bleu(pairs: &[QaPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(EvalError::Empty);
    }
    let sum: f64 = pairs
        .iter()
        .map(|pair| bleu_score(&pair.references, &pair.answer))
        .sum();
    Ok(sum / pairs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_sentences_score_one() {
        let score = bleu_score(&["the quick brown fox jumps".into()], "the quick brown fox jumps");
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn disjoint_sentences_score_zero() {
        assert_eq!(bleu_score(&["red car".into()], "blue boat"), 0.0);
    }

    #[test]
    fn short_candidates_are_penalized() {
        // Perfect n-gram precision, but half the reference length.
        let full = bleu_score(&["quick brown fox jumps".into()], "quick brown fox jumps");
        let short = bleu_score(&["quick brown fox jumps".into()], "quick brown");
        assert!(short < full);
        assert!(short > 0.0);
    }

    #[test]
    fn shorter_than_max_order_still_scores() {
        // A two-token candidate only has 1- and 2-grams.
        let score = bleu_score(&["quick brown".into()], "quick brown");
        assert!((score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn best_reference_wins() {
        let refs = vec!["totally different".to_string(), "quick brown fox".to_string()];
        let score = bleu_score(&refs, "quick brown fox");
        assert!((score - 1.0).abs() < 1e-12);
    }
}
