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

//! Per-model prompt token budgets.

/// Fraction of a model's context window the prompt may occupy. The rest
/// is headroom for the completion and for tokenizer approximation error
/// on fallback vocabularies.
pub const BUDGET_HEADROOM: f64 = 0.88;

/// Prompt token budget for a model, derived from its context window.
///
/// Returns `None` for models without a known window; callers then skip
/// window selection entirely and submit the full context unchanged.
pub fn budget_for_model(model: &str) -> Option<usize> {
    let context_window: usize = match model {
        "gpt-4o-mini" | "gpt-4o-mini-batch" => 128_000,
        "o3-mini" => 200_000,
        _ => return None,
    };
    Some((context_window as f64 * BUDGET_HEADROOM) as usize)
}
