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

//! Last-resort budget enforcement on rendered content.

use tracing::warn;

use crate::encoder::Tokenizer;

/// Hard-cap `content` at `max_tokens` tokens.
///
/// Interval selection can overshoot the budget: joining segments merges
/// tokens across boundaries, and an infeasible must-have span is returned
/// over budget on purpose. This pass re-measures and, when needed, keeps
/// only the first `max_tokens` tokens of the text.
///
/// Truncating and re-encoding can itself shift token boundaries, so the
/// cut repeats until the measurement settles under the budget. That makes
/// the function idempotent: a second call sees a fitting text and returns
/// it unchanged. A `max_tokens` of zero means no limit is enforced.
///
/// Never fails; the worst case is content ending mid-word.
pub fn enforce_budget(content: &str, max_tokens: usize, encoder: &dyn Tokenizer) -> String {
    if max_tokens == 0 {
        return content.to_string();
    }
    let mut text = content.to_string();
    loop {
        let tokens = encoder.count(&text);
        if tokens <= max_tokens {
            return text;
        }
        warn!(
            tokens,
            max_tokens, "selected content over budget, hard-truncating"
        );
        let cut = encoder.truncate(&text, max_tokens);
        if cut.len() >= text.len() {
            // The tokenizer made no progress; give up rather than loop.
            return cut;
        }
        text = cut;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// One token per character.
    struct CharCost;

    impl Tokenizer for CharCost {
        fn count(&self, text: &str) -> usize {
            text.chars().count()
        }

        fn truncate(&self, text: &str, max_tokens: usize) -> String {
            text.chars().take(max_tokens).collect()
        }

        fn tail(&self, text: &str, max_tokens: usize) -> String {
            let total = text.chars().count();
            if total <= max_tokens {
                return text.to_string();
            }
            text.chars().skip(total - max_tokens).collect()
        }
    }

    #[test]
    fn content_within_budget_is_untouched() {
        assert_eq!(enforce_budget("short text", 100, &CharCost), "short text");
    }

    #[test]
    fn oversized_content_is_cut_to_the_budget() {
        let out = enforce_budget("abcdefghij", 4, &CharCost);
        assert_eq!(out, "abcd");
    }

    #[test]
    fn zero_budget_means_no_limit() {
        assert_eq!(enforce_budget("anything goes", 0, &CharCost), "anything goes");
    }

    #[test]
    fn enforcement_is_idempotent() {
        let once = enforce_budget("abcdefghij", 7, &CharCost);
        let twice = enforce_budget(&once, 7, &CharCost);
        assert_eq!(once, twice);
    }

    #[test]
    fn multibyte_content_is_cut_on_char_boundaries() {
        let out = enforce_budget("ééééé", 3, &CharCost);
        assert_eq!(out, "ééé");
    }
}
