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

//! Token-overlap F1, adapted from the MRQA shared task.

use std::collections::HashMap;

use crate::error::{EvalError, Result};
use crate::normalize::answer_tokens;
use crate::QaPair;

fn counts(tokens: &[String]) -> HashMap<&str, usize> {
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token.as_str()).or_insert(0) += 1;
    }
    counts
}

/// Multiset-intersection size between two token lists.
fn overlap(expected: &[String], actual: &[String]) -> usize {
    let expected = counts(expected);
    let actual = counts(actual);
    expected
        .iter()
        .map(|(token, &n)| n.min(actual.get(token).copied().unwrap_or(0)))
        .sum()
}

/// F1 between one reference and the answer over normalized tokens.
pub fn f1_single(expected: &str, actual: &str) -> f64 {
    let expected_tokens = answer_tokens(expected);
    let actual_tokens = answer_tokens(actual);
    let num_same = overlap(&expected_tokens, &actual_tokens);
    if num_same == 0 {
        return 0.0;
    }
    let precision = num_same as f64 / actual_tokens.len() as f64;
    let recall = num_same as f64 / expected_tokens.len() as f64;
    2.0 * precision * recall / (precision + recall)
}

/// Best F1 across the references.
pub fn f1_score(references: &[String], answer: &str) -> f64 {
    references
        .iter()
        .map(|r| f1_single(r, answer))
        .fold(0.0, f64::max)
}

/// F1 averaged over all pairs.
pub fn eval_f1(pairs: &[QaPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(EvalError::Empty);
    }
    let sum: f64 = pairs
        .iter()
        .map(|pair| f1_score(&pair.references, &pair.answer))
        .sum();
    Ok(sum / pairs.len() as f64)
}
