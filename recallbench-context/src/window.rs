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

//! Interval search for the largest budget-compliant context window.
//!
//! Both variants share one skeleton: fix the minimal span that covers
//! every must-have, then binary-search each boundary outward against a
//! `fits` predicate. The predicate renders and measures a candidate
//! window, so each extension costs `O(log n)` tokenizer calls.
//!
//! The search assumes token cost is non-decreasing as the window grows.
//! Tokenizers can merge across segment joins and occasionally break that
//! assumption, so the result may miss a marginally larger feasible
//! window. Callers re-measure the final selection and fall back to
//! [`crate::enforce_budget`] when it still overshoots.

use std::collections::HashMap;

use recallbench_core::Segment;
use tracing::debug;

use crate::encoder::Tokenizer;
use crate::error::{ContextError, Result};
use crate::render::render;

/// Which boundary a sweep is pushing outward.
#[derive(Clone, Copy)]
enum Grow {
    /// Probe smaller start positions.
    Left,
    /// Probe larger end positions.
    Right,
}

/// Binary-search one boundary of the window.
///
/// `fits` reports `(within_budget, exactly_at_budget)` for a candidate
/// boundary position. `seed` is the minimal-span boundary and is returned
/// unchanged when no probe fits. The second return value is true when a
/// probe landed exactly on the budget; no larger window can also fit, so
/// the caller may skip any remaining sweep.
fn extend_while_fits<F>(
    range_lo: usize,
    range_hi: usize,
    seed: usize,
    grow: Grow,
    mut fits: F,
) -> (usize, bool)
where
    F: FnMut(usize) -> (bool, bool),
{
    // Signed cursors: the left sweep drives `hi` to -1 once position 0 fits.
    let mut lo = range_lo as i64;
    let mut hi = range_hi as i64;
    let mut best = seed;
    let mut max_reached = false;
    while lo <= hi {
        let mid = match grow {
            Grow::Left => (lo + hi + 1) / 2,
            Grow::Right => (lo + hi) / 2,
        };
        let (within, exact) = fits(mid as usize);
        if within {
            best = mid as usize;
            if exact {
                max_reached = true;
                break;
            }
            match grow {
                Grow::Left => hi = mid - 1,
                Grow::Right => lo = mid + 1,
            }
        } else {
            match grow {
                Grow::Left => lo = mid + 1,
                Grow::Right => hi = mid - 1,
            }
        }
    }
    (best, max_reached)
}

/// Select the largest contiguous segment span `[start, end)` containing
/// every must-have segment whose rendered token count fits `max_tokens`.
///
/// When even the minimal must-have span is over budget, that minimal span
/// is returned as-is and budget enforcement is deferred to
/// [`crate::enforce_budget`] on the rendered text.
///
/// Fails when `must_have_ids` is empty or names a segment that does not
/// occur in `segments`.
pub fn select_window(
    segments: &[Segment],
    must_have_ids: &[String],
    max_tokens: usize,
    encoder: &dyn Tokenizer,
) -> Result<(usize, usize)> {
    if must_have_ids.is_empty() {
        return Err(ContextError::EmptyMustHaves);
    }
    let positions: HashMap<&str, usize> = segments
        .iter()
        .enumerate()
        .map(|(idx, segment)| (segment.id.as_str(), idx))
        .collect();

    let mut smallest_start = usize::MAX;
    let mut largest_end = 0usize;
    for id in must_have_ids {
        let pos = *positions
            .get(id.as_str())
            .ok_or_else(|| ContextError::UnresolvedSegment(id.clone()))?;
        smallest_start = smallest_start.min(pos);
        largest_end = largest_end.max(pos + 1);
    }

    let fits = |lo: usize, hi: usize| {
        let tokens = encoder.count(&render(&segments[lo..hi]));
        (tokens <= max_tokens, tokens == max_tokens)
    };

    let (best_left, max_reached) =
        extend_while_fits(0, smallest_start, smallest_start, Grow::Left, |lo| {
            fits(lo, largest_end)
        });
    if max_reached {
        debug!(
            best_left,
            best_right = largest_end,
            "window filled the budget during left extension"
        );
        return Ok((best_left, largest_end));
    }

    let (best_right, _) = extend_while_fits(
        largest_end,
        segments.len(),
        largest_end,
        Grow::Right,
        |hi| fits(best_left, hi),
    );
    debug!(best_left, best_right, "context window selected");
    Ok((best_left, best_right))
}

/// Select the largest byte range `[start, end)` of an already rendered
/// string, around every must-have substring, such that the immutable
/// prefix `content[..context_starts_idx]` plus `content[start..end]`
/// fits `max_tokens`.
///
/// The prefix is included in every probe and is never subject to
/// truncation; the left sweep therefore bottoms out at
/// `context_starts_idx`, not zero. Must-haves are located by their first
/// occurrence; repeated occurrences are ambiguous and not handled
/// specially. Returned offsets always land on character boundaries.
pub fn select_window_offsets(
    content: &str,
    must_have_texts: &[String],
    context_starts_idx: usize,
    max_tokens: usize,
    encoder: &dyn Tokenizer,
) -> Result<(usize, usize)> {
    if must_have_texts.is_empty() {
        return Err(ContextError::EmptyMustHaves);
    }
    let prefix_end = floor_char_boundary(content, context_starts_idx.min(content.len()));

    let mut smallest_start = content.len();
    let mut largest_end = prefix_end;
    for text in must_have_texts {
        let at = content
            .find(text.as_str())
            .ok_or_else(|| ContextError::UnresolvedSubstring(text.clone()))?;
        // Any part of a must-have inside the prefix is already covered.
        smallest_start = smallest_start.min(at.max(prefix_end));
        largest_end = largest_end.max((at + text.len()).max(prefix_end));
    }
    smallest_start = smallest_start.min(largest_end);

    let fits = |lo: usize, hi: usize| {
        let lo = floor_char_boundary(content, lo);
        let hi = floor_char_boundary(content, hi);
        let tokens = if lo == prefix_end {
            encoder.count(&content[..hi])
        } else {
            let mut window = String::with_capacity(prefix_end + (hi - lo));
            window.push_str(&content[..prefix_end]);
            window.push_str(&content[lo..hi]);
            encoder.count(&window)
        };
        (tokens <= max_tokens, tokens == max_tokens)
    };

    let (best_left, max_reached) =
        extend_while_fits(prefix_end, smallest_start, smallest_start, Grow::Left, |lo| {
            fits(lo, largest_end)
        });
    if max_reached {
        return Ok((
            floor_char_boundary(content, best_left),
            floor_char_boundary(content, largest_end),
        ));
    }

    let (best_right, _) = extend_while_fits(
        largest_end,
        content.len(),
        largest_end,
        Grow::Right,
        |hi| fits(best_left, hi),
    );
    debug!(best_left, best_right, "offset window selected");
    Ok((
        floor_char_boundary(content, best_left),
        floor_char_boundary(content, best_right),
    ))
}

/// Largest character-boundary offset not exceeding `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut at = index;
    while !s.is_char_boundary(at) {
        at -= 1;
    }
    at
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;

    /// Deterministic cost model: every rendered line costs 100 tokens.
    struct LineCost;

    impl Tokenizer for LineCost {
        fn count(&self, text: &str) -> usize {
            text.lines().count() * 100
        }

        fn truncate(&self, text: &str, max_tokens: usize) -> String {
            text.lines()
                .take(max_tokens / 100)
                .collect::<Vec<_>>()
                .join("\n")
        }

        fn tail(&self, text: &str, max_tokens: usize) -> String {
            let lines: Vec<&str> = text.lines().collect();
            let keep = (max_tokens / 100).min(lines.len());
            lines[lines.len() - keep..].join("\n")
        }
    }

    /// LineCost that counts how many times the search probed it.
    struct ProbedLineCost {
        probes: AtomicUsize,
    }

    impl ProbedLineCost {
        fn new() -> Self {
            Self {
                probes: AtomicUsize::new(0),
            }
        }
    }

    impl Tokenizer for ProbedLineCost {
        fn count(&self, text: &str) -> usize {
            self.probes.fetch_add(1, Ordering::Relaxed);
            LineCost.count(text)
        }

        fn truncate(&self, text: &str, max_tokens: usize) -> String {
            LineCost.truncate(text, max_tokens)
        }

        fn tail(&self, text: &str, max_tokens: usize) -> String {
            LineCost.tail(text, max_tokens)
        }
    }

    /// One token per character, for offset-variant tests.
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

    fn ten_segments() -> Vec<Segment> {
        (0..10)
            .map(|i| Segment::new(format!("s{i}"), format!("line {i}")))
            .collect()
    }

    fn ids(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn generous_budget_selects_the_whole_sequence() {
        let segments = ten_segments();
        let window = select_window(&segments, &ids(&["s3"]), 10_000, &LineCost).unwrap();
        assert_eq!(window, (0, 10));
    }

    #[test]
    fn window_shrinks_to_the_largest_fit() {
        let segments = ten_segments();
        let window = select_window(&segments, &ids(&["s3", "s7"]), 650, &LineCost).unwrap();
        assert_eq!(window, (2, 8));
    }

    #[test]
    fn exact_budget_hit_stops_after_one_probe() {
        let segments = ten_segments();
        let encoder = ProbedLineCost::new();
        let window = select_window(&segments, &ids(&["s3", "s7"]), 600, &encoder).unwrap();
        assert_eq!(window, (2, 8));
        // First left probe lands on exactly 600 tokens; the right sweep
        // never runs.
        assert_eq!(encoder.probes.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn infeasible_budget_returns_the_minimal_span() {
        let segments = ten_segments();
        let window = select_window(&segments, &ids(&["s3", "s7"]), 300, &LineCost).unwrap();
        assert_eq!(window, (3, 8));
    }

    #[test]
    fn must_haves_at_both_edges() {
        let segments = ten_segments();
        let window = select_window(&segments, &ids(&["s0", "s9"]), 10_000, &LineCost).unwrap();
        assert_eq!(window, (0, 10));
        // The minimal span is already the full sequence; an infeasible
        // budget still returns it.
        let window = select_window(&segments, &ids(&["s0", "s9"]), 500, &LineCost).unwrap();
        assert_eq!(window, (0, 10));
    }

    #[test]
    fn single_segment_sequence() {
        let segments = vec![Segment::new("only", "the one line")];
        let window = select_window(&segments, &ids(&["only"]), 1_000, &LineCost).unwrap();
        assert_eq!(window, (0, 1));
    }

    #[test]
    fn unknown_must_have_id_fails() {
        let segments = ten_segments();
        let err = select_window(&segments, &ids(&["s3", "ghost"]), 1_000, &LineCost).unwrap_err();
        assert!(matches!(err, ContextError::UnresolvedSegment(id) if id == "ghost"));
    }

    #[test]
    fn empty_must_have_set_fails() {
        let segments = ten_segments();
        let err = select_window(&segments, &[], 1_000, &LineCost).unwrap_err();
        assert!(matches!(err, ContextError::EmptyMustHaves));
    }

    #[test]
    fn offset_window_stops_on_exact_budget() {
        let content = "SYS\nAAAABBBBCCCCDDDD";
        let musts = vec!["CCCC".to_string()];
        let window = select_window_offsets(content, &musts, 4, 13, &CharCost).unwrap();
        assert_eq!(window, (7, 16));
    }

    #[test]
    fn offset_window_extends_right_of_the_anchor() {
        let content = "SYS\nAAAABBBBCCCCDDDD";
        let musts = vec!["CCCC".to_string()];
        let window = select_window_offsets(content, &musts, 4, 20, &CharCost).unwrap();
        assert_eq!(window, (4, 20));
    }

    #[test]
    fn offset_window_lands_on_char_boundaries() {
        let content = "ééééXXéééé";
        let musts = vec!["XX".to_string()];
        let (start, end) = select_window_offsets(content, &musts, 0, 7, &CharCost).unwrap();
        assert!(content.is_char_boundary(start));
        assert!(content.is_char_boundary(end));
        assert_eq!((start, end), (0, 12));
        assert_eq!(CharCost.count(&content[start..end]), 7);
    }

    #[test]
    fn must_have_entirely_inside_the_prefix() {
        let content = "PREFIX anchor tail tail tail";
        let musts = vec!["anchor".to_string()];
        let (start, end) = select_window_offsets(content, &musts, 13, 1_000, &CharCost).unwrap();
        assert_eq!(start, 13);
        assert_eq!(end, content.len());
    }

    #[test]
    fn offset_missing_substring_fails() {
        let musts = vec!["absent".to_string()];
        let err = select_window_offsets("some content", &musts, 0, 100, &CharCost).unwrap_err();
        assert!(matches!(err, ContextError::UnresolvedSubstring(t) if t == "absent"));
    }

    #[test]
    fn offset_empty_must_have_set_fails() {
        let err = select_window_offsets("some content", &[], 0, 100, &CharCost).unwrap_err();
        assert!(matches!(err, ContextError::EmptyMustHaves));
    }

    proptest! {
        // Every selected window contains every must-have position, and a
        // feasible minimal span implies a budget-compliant result.
        #[test]
        fn window_always_contains_the_must_haves(
            len in 1usize..40,
            picks in prop::collection::vec(0usize..40, 1..5),
            budget in 0usize..6_000,
        ) {
            let segments: Vec<Segment> = (0..len)
                .map(|i| Segment::new(format!("s{i}"), format!("line {i}")))
                .collect();
            let musts: Vec<String> = picks.iter().map(|p| format!("s{}", p % len)).collect();
            let (start, end) = select_window(&segments, &musts, budget, &LineCost).unwrap();

            let mut smallest = usize::MAX;
            let mut largest = 0usize;
            for id in &musts {
                let pos = segments.iter().position(|s| &s.id == id).unwrap();
                smallest = smallest.min(pos);
                largest = largest.max(pos + 1);
                prop_assert!(start <= pos && pos < end);
            }
            let minimal_cost = (largest - smallest) * 100;
            if minimal_cost <= budget {
                prop_assert!(LineCost.count(&render(&segments[start..end])) <= budget);
            } else {
                prop_assert_eq!((start, end), (smallest, largest));
            }
        }

        // Raising the budget never shrinks the window.
        #[test]
        fn larger_budgets_never_shrink_the_window(
            len in 1usize..30,
            pick in 0usize..30,
            budget in 0usize..4_000,
            extra in 0usize..2_000,
        ) {
            let segments: Vec<Segment> = (0..len)
                .map(|i| Segment::new(format!("s{i}"), format!("line {i}")))
                .collect();
            let musts = vec![format!("s{}", pick % len)];
            let small = select_window(&segments, &musts, budget, &LineCost).unwrap();
            let large = select_window(&segments, &musts, budget + extra, &LineCost).unwrap();
            prop_assert!(large.0 <= small.0);
            prop_assert!(large.1 >= small.1);
        }
    }
}
