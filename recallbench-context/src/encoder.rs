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

//! Tokenizer adapter over model-specific BPE vocabularies.
//!
//! The window search only ever needs three capabilities: count the tokens
//! of a string, keep the first N tokens, keep the last N tokens. Raw token
//! ids never cross this boundary, which keeps the vocabulary swappable and
//! lets tests substitute deterministic cost models.
//!
//! Counting the same span twice is common during binary search (adjacent
//! probes often re-render identical windows across the left and right
//! sweeps), so counts are memoized in a bounded cache keyed by a hash of
//! the text.

use moka::sync::Cache;
use tiktoken_rs::{get_bpe_from_model, o200k_base, CoreBPE};

use crate::error::{ContextError, Result};

/// Entries retained in the token-count cache.
const COUNT_CACHE_CAPACITY: u64 = 100_000;

/// Token measurement and truncation, the only tokenizer surface the
/// window search depends on.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens `text` encodes to.
    fn count(&self, text: &str) -> usize;

    /// The text decoded from the first `max_tokens` tokens of `text`.
    /// Returns the input unchanged when it already fits. The cut point can
    /// land mid-word; that is accepted, not repaired.
    fn truncate(&self, text: &str, max_tokens: usize) -> String;

    /// The text decoded from the last `max_tokens` tokens of `text`.
    /// Returns the input unchanged when it already fits.
    fn tail(&self, text: &str, max_tokens: usize) -> String;
}

/// [`Tokenizer`] backed by the tiktoken BPE vocabularies.
pub struct TiktokenEncoder {
    bpe: CoreBPE,
    counts: Cache<u64, usize>,
}

impl TiktokenEncoder {
    /// Build an encoder for a model identifier.
    ///
    /// Unknown models fall back to the `o200k_base` vocabulary instead of
    /// failing. The count becomes an approximation, which the budget
    /// headroom absorbs; a hard failure here would abort whole runs over
    /// a deployment alias the vocabulary table has not caught up with.
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = match get_bpe_from_model(model) {
            Ok(bpe) => bpe,
            Err(_) => o200k_base().map_err(|e| ContextError::Vocabulary(e.to_string()))?,
        };
        Ok(Self {
            bpe,
            counts: Cache::new(COUNT_CACHE_CAPACITY),
        })
    }
}

impl Tokenizer for TiktokenEncoder {
    fn count(&self, text: &str) -> usize {
        let key = seahash::hash(text.as_bytes());
        if let Some(cached) = self.counts.get(&key) {
            return cached;
        }
        let count = self.bpe.encode_ordinary(text).len();
        self.counts.insert(key, count);
        count
    }

    fn truncate(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }
        // A cut can land inside a byte sequence that only decodes as a
        // whole; back off one token at a time until decoding succeeds.
        let mut keep = max_tokens;
        loop {
            if keep == 0 {
                return String::new();
            }
            if let Ok(decoded) = self.bpe.decode(tokens[..keep].to_vec()) {
                return decoded;
            }
            keep -= 1;
        }
    }

    fn tail(&self, text: &str, max_tokens: usize) -> String {
        let tokens = self.bpe.encode_ordinary(text);
        if tokens.len() <= max_tokens {
            return text.to_string();
        }
        let mut skip = tokens.len() - max_tokens;
        while skip < tokens.len() {
            if let Ok(decoded) = self.bpe.decode(tokens[skip..].to_vec()) {
                return decoded;
            }
            skip += 1;
        }
        String::new()
    }
}
