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

//! MRQA-style answer normalization, shared by every lexical metric.
//!
//! See <https://mrqa.github.io/>.

use once_cell::sync::Lazy;
use regex::Regex;

static ARTICLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(a|an|the)\b").expect("article pattern"));

/// Lowercase, strip punctuation, drop English articles, squeeze
/// whitespace.
pub fn normalize_answer(text: &str) -> String {
    let lowered = text.to_lowercase();
    let depunctuated: String = lowered.chars().filter(|c| !c.is_ascii_punctuation()).collect();
    let dearticled = ARTICLES.replace_all(&depunctuated, " ");
    dearticled.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Normalized unigrams.
pub fn answer_tokens(text: &str) -> Vec<String> {
    normalize_answer(text)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}
