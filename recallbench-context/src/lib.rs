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

//! Recallbench Context
//!
//! Token-budgeted context window selection. Given an ordered sequence of
//! [`Segment`](recallbench_core::Segment)s and a set of segments that must
//! appear in the final prompt, this crate selects the largest contiguous
//! span whose rendered token count stays within a model-specific budget.
//!
//! The selection runs two binary searches, one per extension direction,
//! against a `fits` predicate that renders and counts a candidate span.
//! Token cost is assumed non-decreasing in span size. That assumption can
//! be violated by cross-boundary token merges, so a selected span is
//! re-measured afterwards and [`enforce_budget`] applies a hard token cut
//! when the measurement still exceeds the budget.
//!
//! Entry points:
//! - [`select_window`]: search over segment boundaries.
//! - [`select_window_offsets`]: search over byte offsets of an already
//!   rendered string, keeping a fixed prefix intact.
//! - [`enforce_budget`]: idempotent last-resort truncation.
//!
//! Each call is a pure function over its inputs plus encoder lookups;
//! nothing here holds state across calls, so concurrent searches only
//! need a shared [`Tokenizer`] that is itself thread-safe.

pub mod budget;
pub mod encoder;
pub mod error;
pub mod render;
pub mod truncate;
pub mod window;

pub use budget::{budget_for_model, BUDGET_HEADROOM};
pub use encoder::{TiktokenEncoder, Tokenizer};
pub use error::{ContextError, Result};
pub use render::render;
pub use truncate::enforce_budget;
pub use window::{select_window, select_window_offsets};
