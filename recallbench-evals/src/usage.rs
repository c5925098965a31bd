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

//! Token-usage accounting over a results file.

use recallbench_client::TokenUsage;
use serde::{Deserialize, Serialize};

use crate::error::{EvalError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UsageReport {
    pub total_prompt_tokens: u64,
    pub total_completion_tokens: u64,
    pub total_tokens: u64,
    pub mean_prompt_tokens: f64,
    pub mean_completion_tokens: f64,
    pub mean_total_tokens: f64,
}

/// Totals and per-response means across a results file.
pub fn eval_usage(usages: &[TokenUsage]) -> Result<UsageReport> {
    if usages.is_empty() {
        return Err(EvalError::Empty);
    }
    let total_prompt: u64 = usages.iter().map(|u| u.prompt_tokens).sum();
    let total_completion: u64 = usages.iter().map(|u| u.completion_tokens).sum();
    let total: u64 = usages.iter().map(|u| u.total_tokens).sum();
    let n = usages.len() as f64;
    Ok(UsageReport {
        total_prompt_tokens: total_prompt,
        total_completion_tokens: total_completion,
        total_tokens: total,
        mean_prompt_tokens: total_prompt as f64 / n,
        mean_completion_tokens: total_completion as f64 / n,
        mean_total_tokens: total as f64 / n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn usage(prompt: u64, completion: u64) -> TokenUsage {
        TokenUsage {
            prompt_tokens: prompt,
            completion_tokens: completion,
            total_tokens: prompt + completion,
        }
    }

    #[test]
    fn totals_and_means() {
        let report = eval_usage(&[usage(100, 10), usage(200, 30)]).unwrap();
        assert_eq!(report.total_prompt_tokens, 300);
        assert_eq!(report.total_completion_tokens, 40);
        assert_eq!(report.total_tokens, 340);
        assert_eq!(report.mean_prompt_tokens, 150.0);
        assert_eq!(report.mean_total_tokens, 170.0);
    }

    #[test]
    fn empty_usage_is_an_error() {
        assert!(matches!(eval_usage(&[]), Err(EvalError::Empty)));
    }
}
