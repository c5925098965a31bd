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

//! Exact match on normalized answers.

use crate::error::{EvalError, Result};
use crate::normalize::normalize_answer;
use crate::QaPair;

/// 1.0 when the normalized answer equals any normalized reference.
pub fn exact_match(references: &[String], answer: &str) -> f64 {
    let answer = normalize_answer(answer);
    if references.iter().any(|r| normalize_answer(r) == answer) {
        1.0
    } else {
        0.0
    }
}

/// Exact match averaged over all pairs.
pub fn eval_exact_match(pairs: &[QaPair]) -> Result<f64> {
    if pairs.is_empty() {
        return Err(EvalError::Empty);
    }
    let sum: f64 = pairs
        .iter()
        .map(|pair| exact_match(&pair.references, &pair.answer))
        .sum();
    Ok(sum / pairs.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(refs: &[&str], answer: &str) -> QaPair {
        QaPair::new("q", refs.iter().map(|s| s.to_string()).collect(), answer)
    }

    #[test]
    fn normalization_is_applied_to_both_sides() {
        assert_eq!(exact_match(&["The Louvre.".into()], "louvre"), 1.0);
        assert_eq!(exact_match(&["Louvre".into()], "the louvre museum"), 0.0);
    }

    #[test]
    fn any_reference_can_match() {
        assert_eq!(exact_match(&["Paris".into(), "Lyon".into()], "lyon"), 1.0);
    }

    #[test]
    fn averaged_over_pairs() {
        let pairs = vec![pair(&["yes"], "Yes"), pair(&["no"], "maybe")];
        assert_eq!(eval_exact_match(&pairs).unwrap(), 0.5);
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(eval_exact_match(&[]), Err(EvalError::Empty)));
    }
}
