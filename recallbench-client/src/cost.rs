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

//! Pre-flight cost estimation for batch jobs.
//!
//! A whole benchmark run goes up as one batch, so a malformed prompt
//! multiplies across thousands of questions before anyone notices. The
//! guard estimates input cost from the per-model price table and refuses
//! to queue anything past the abort threshold.

use parking_lot::Mutex;
use tracing::{info, warn};

use crate::error::{ClientError, Result};

/// Estimated cost above which the guard asks for a prompt review.
pub const COST_WARN_USD: f64 = 0.10;

/// Estimated cost above which the guard refuses to queue the batch.
pub const COST_ABORT_USD: f64 = 0.25;

/// Single-prompt token count above which truncation is recommended.
pub const PROMPT_WARN_TOKENS: usize = 15_000;

/// Input-token price in USD per million tokens. Batch deployments bill
/// input at half the interactive rate. Unknown models price at zero,
/// which the guard then rejects as an empty estimate.
pub fn input_price_per_million(model: &str) -> f64 {
    match model {
        "gpt-4o-mini" => 0.15,
        "gpt-4o-mini-batch" => 0.075,
        "o3-mini" => 1.10,
        _ => 0.0,
    }
}

/// Accumulates estimated input cost across the prompts of one batch.
pub struct CostGuard {
    model: String,
    total_usd: Mutex<f64>,
}

impl CostGuard {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            total_usd: Mutex::new(0.0),
        }
    }

    /// Account one prompt's estimated input cost.
    pub fn add_prompt(&self, prompt_tokens: usize) {
        if prompt_tokens > PROMPT_WARN_TOKENS {
            warn!(
                prompt_tokens,
                limit = PROMPT_WARN_TOKENS,
                "prompt is unusually long, truncation is recommended"
            );
        }
        let cost = prompt_tokens as f64 / 1_000_000.0 * input_price_per_million(&self.model);
        *self.total_usd.lock() += cost;
    }

    /// Estimated input cost accumulated so far, in USD.
    pub fn total(&self) -> f64 {
        *self.total_usd.lock()
    }

    /// Decide whether the batch may be queued.
    pub fn check(&self) -> Result<()> {
        let total = self.total();
        if total == 0.0 {
            return Err(ClientError::ZeroCostEstimate);
        }
        info!(model = %self.model, estimated_usd = total, "estimated batch input cost");
        if total > COST_ABORT_USD {
            return Err(ClientError::CostLimitExceeded {
                estimated: total,
                limit: COST_ABORT_USD,
            });
        }
        if total > COST_WARN_USD {
            warn!(
                estimated_usd = total,
                threshold = COST_WARN_USD,
                "estimated cost is high, review the prompts before queueing again"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_estimate_is_rejected() {
        let guard = CostGuard::new("gpt-4o-mini");
        assert!(matches!(
            guard.check().unwrap_err(),
            ClientError::ZeroCostEstimate
        ));
    }

    #[test]
    fn small_batches_pass() {
        let guard = CostGuard::new("gpt-4o-mini");
        guard.add_prompt(10_000);
        assert!(guard.check().is_ok());
        assert!((guard.total() - 0.0015).abs() < 1e-9);
    }

    #[test]
    fn oversized_batches_are_aborted() {
        let guard = CostGuard::new("gpt-4o-mini");
        // 2M tokens at $0.15/M is $0.30, past the abort threshold.
        guard.add_prompt(2_000_000);
        assert!(matches!(
            guard.check().unwrap_err(),
            ClientError::CostLimitExceeded { .. }
        ));
    }

    #[test]
    fn batch_deployments_bill_at_half_rate() {
        assert_eq!(
            input_price_per_million("gpt-4o-mini-batch"),
            input_price_per_million("gpt-4o-mini") / 2.0
        );
    }

    #[test]
    fn unknown_models_estimate_to_zero() {
        let guard = CostGuard::new("mystery-model");
        guard.add_prompt(1_000_000);
        assert_eq!(guard.total(), 0.0);
    }
}
