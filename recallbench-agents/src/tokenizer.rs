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

//! MRQA-style text normalization and n-gram tokenization.
//!
//! The normalization pipeline follows the MRQA 2019 shared task
//! (<https://mrqa.github.io/>): lowercase, strip punctuation, drop the
//! English articles, squeeze whitespace. Retrieval additionally drops
//! stopwords and applies a Snowball stem before building n-grams.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

static ARTICLES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(a|an|the)\b").expect("article pattern"));

static STEMMER: Lazy<Stemmer> = Lazy::new(|| Stemmer::create(Algorithm::English));

/// The NLTK English stopword list.
static STOPWORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
        "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his",
        "himself", "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself",
        "they", "them", "their", "theirs", "themselves", "what", "which", "who", "whom", "this",
        "that", "that'll", "these", "those", "am", "is", "are", "was", "were", "be", "been",
        "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an", "the",
        "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by", "for",
        "with", "about", "against", "between", "into", "through", "during", "before", "after",
        "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over", "under",
        "again", "further", "then", "once", "here", "there", "when", "where", "why", "how",
        "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
        "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can",
        "will", "just", "don", "don't", "should", "should've", "now", "d", "ll", "m", "o", "re",
        "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn", "didn't", "doesn",
        "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn", "isn't", "ma",
        "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan", "shan't",
        "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't", "wouldn",
        "wouldn't",
    ]
    .into_iter()
    .collect()
});

/// Normalize text: lowercase, strip punctuation, drop articles, squeeze
/// whitespace; optionally drop stopwords and stem.
pub fn normalize(text: &str, remove_stopwords: bool, stem: bool) -> String {
    let lowered = text.to_lowercase();
    let no_punctuation: String = lowered
        .chars()
        .filter(|c| !c.is_ascii_punctuation())
        .collect();
    let no_articles = ARTICLES.replace_all(&no_punctuation, " ");
    let words = no_articles
        .split_whitespace()
        .filter(|word| !remove_stopwords || !STOPWORDS.contains(word))
        .map(|word| {
            if stem {
                STEMMER.stem(word).to_string()
            } else {
                word.to_string()
            }
        })
        .collect::<Vec<_>>();
    words.join(" ")
}

/// Tokenize into all n-grams from 1 up to `ngrams` (capped at 5) over the
/// normalized words. Multi-word grams are space-joined.
pub fn tokenize(text: &str, ngrams: usize, remove_stopwords: bool, stem: bool) -> Vec<String> {
    let normalized = normalize(text, remove_stopwords, stem);
    let unigrams: Vec<&str> = normalized.split_whitespace().collect();
    let max_n = ngrams.min(5);
    let mut grams = Vec::new();
    for n in 1..=max_n {
        if unigrams.len() < n {
            break;
        }
        for window in unigrams.windows(n) {
            grams.push(window.join(" "));
        }
    }
    grams
}
