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

//! Recall@K over retrieved document ids.

use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{EvalError, Result};

pub const K_LIST: [usize; 5] = [1, 2, 5, 10, 20];

/// Gold evidence ids and retrieved ids for one question, retrieved ids
/// in rank order.
#[derive(Debug, Clone)]
pub struct RetrievalPair {
    pub question_id: String,
    pub expected: Vec<String>,
    pub retrieved: Vec<String>,
}

/// Fraction of the expected ids present in the top-K retrieved ids.
fn recall_at(expected: &[String], retrieved: &[String], k: usize) -> f64 {
    let top_k = &retrieved[..k.min(retrieved.len())];
    let found = expected.iter().filter(|id| top_k.contains(id)).count();
    found as f64 / expected.len() as f64
}

/// Recall@K for every K, averaged per question then across questions.
/// Questions without evidence or without retrieved ids are skipped
/// since they have no defined recall.
pub fn eval_retrieval(pairs: &[RetrievalPair]) -> Result<BTreeMap<usize, f64>> {
    let scored: Vec<&RetrievalPair> = pairs
        .iter()
        .filter(|pair| {
            let usable = !pair.expected.is_empty() && !pair.retrieved.is_empty();
            if !usable {
                warn!(question = %pair.question_id, "no evidence or no retrieval, skipping");
            }
            usable
        })
        .collect();
    if scored.is_empty() {
        return Err(EvalError::Empty);
    }

    let mut averages = BTreeMap::new();
    for k in K_LIST {
        let sum: f64 = scored
            .iter()
            .map(|pair| recall_at(&pair.expected, &pair.retrieved, k))
            .sum();
        averages.insert(k, sum / scored.len() as f64);
    }
    Ok(averages)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(id: &str, expected: &[&str], retrieved: &[&str]) -> RetrievalPair {
        RetrievalPair {
            question_id: id.to_string(),
            expected: expected.iter().map(|s| s.to_string()).collect(),
            retrieved: retrieved.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn recall_grows_with_k() {
        let pairs = vec![pair("q1", &["a", "b"], &["x", "a", "y", "z", "b"])];
        let recall = eval_retrieval(&pairs).unwrap();
        assert_eq!(recall[&1], 0.0);
        assert_eq!(recall[&2], 0.5);
        assert_eq!(recall[&5], 1.0);
        assert_eq!(recall[&20], 1.0);
    }

    #[test]
    fn averaged_across_questions() {
        let pairs = vec![
            pair("q1", &["a"], &["a"]),
            pair("q2", &["b"], &["x"]),
        ];
        let recall = eval_retrieval(&pairs).unwrap();
        assert_eq!(recall[&1], 0.5);
    }

    #[test]
    fn unusable_pairs_are_skipped() {
        let pairs = vec![pair("q1", &[], &["a"]), pair("q2", &["a"], &["a"])];
        let recall = eval_retrieval(&pairs).unwrap();
        assert_eq!(recall[&1], 1.0);
    }

    #[test]
    fn nothing_usable_is_an_error() {
        let pairs = vec![pair("q1", &[], &[])];
        assert!(matches!(eval_retrieval(&pairs), Err(EvalError::Empty)));
    }
}
