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

//! Errors raised by window selection.
//!
//! All of these are terminal for a single search call. There is no retry
//! policy at this layer.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContextError {
    /// The caller asked for a window without naming any must-have
    /// segment. Search is meaningless without an anchor, so this fails
    /// fast instead of guessing one.
    #[error("must-have set is empty; nothing anchors the window")]
    EmptyMustHaves,

    /// A must-have id does not resolve to a position in the segment
    /// sequence. Silently dropping it would break the inclusion
    /// guarantee, so the whole search fails.
    #[error("must-have segment {0:?} not present in the segment sequence")]
    UnresolvedSegment(String),

    /// A must-have substring does not occur in the rendered content.
    #[error("must-have text {0:?} not found in the rendered content")]
    UnresolvedSubstring(String),

    /// The tokenizer vocabulary could not be loaded.
    #[error("tokenizer vocabulary failed to load: {0}")]
    Vocabulary(String),
}

pub type Result<T> = std::result::Result<T, ContextError>;
