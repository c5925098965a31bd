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

//! Okapi BM25 retrieval.

use std::collections::HashMap;

use async_trait::async_trait;
use recallbench_core::{Notebook, Question, ScoredSegment, Segment};
use recallbench_datasets::{prompt, Dataset};
use tracing::{debug, info};

use crate::error::{AgentError, Result};
use crate::tokenizer::tokenize;
use crate::{joined_contents, Agent};

const K1: f64 = 1.5;
const B: f64 = 0.75;

/// Floor applied to negative idf values, as a fraction of the average
/// idf. Very common terms would otherwise score negatively and push a
/// document below an empty one.
const EPSILON: f64 = 0.25;

/// Documents retrieved per question.
const TOP_K: usize = 20;

/// N-gram order used for both documents and queries.
const NGRAMS: usize = 2;

/// An Okapi BM25 index over tokenized documents.
pub struct Bm25Index {
    term_freqs: Vec<HashMap<String, usize>>,
    idf: HashMap<String, f64>,
    doc_lens: Vec<usize>,
    avgdl: f64,
}

impl Bm25Index {
    pub fn new(docs: &[Vec<String>]) -> Self {
        let n = docs.len();
        let mut term_freqs: Vec<HashMap<String, usize>> = Vec::with_capacity(n);
        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut doc_lens = Vec::with_capacity(n);

        for doc in docs {
            let mut freqs: HashMap<String, usize> = HashMap::new();
            for token in doc {
                *freqs.entry(token.clone()).or_insert(0) += 1;
            }
            for term in freqs.keys() {
                *doc_freq.entry(term.clone()).or_insert(0) += 1;
            }
            doc_lens.push(doc.len());
            term_freqs.push(freqs);
        }

        let avgdl = if n == 0 {
            0.0
        } else {
            doc_lens.iter().sum::<usize>() as f64 / n as f64
        };

        let mut idf: HashMap<String, f64> = HashMap::with_capacity(doc_freq.len());
        let mut idf_sum = 0.0;
        let mut negative: Vec<String> = Vec::new();
        for (term, df) in &doc_freq {
            let value = ((n as f64 - *df as f64 + 0.5) / (*df as f64 + 0.5)).ln();
            idf_sum += value;
            if value < 0.0 {
                negative.push(term.clone());
            }
            idf.insert(term.clone(), value);
        }
        if !idf.is_empty() {
            let average_idf = idf_sum / idf.len() as f64;
            let floor = EPSILON * average_idf;
            for term in negative {
                idf.insert(term, floor);
            }
        }

        Self {
            term_freqs,
            idf,
            doc_lens,
            avgdl,
        }
    }

    /// BM25 score of every document against the query tokens.
    pub fn scores(&self, query: &[String]) -> Vec<f64> {
        self.term_freqs
            .iter()
            .zip(&self.doc_lens)
            .map(|(freqs, &dl)| {
                query
                    .iter()
                    .map(|term| {
                        let f = *freqs.get(term).unwrap_or(&0) as f64;
                        if f == 0.0 {
                            return 0.0;
                        }
                        let idf = *self.idf.get(term).unwrap_or(&0.0);
                        let denom = f + K1 * (1.0 - B + B * dl as f64 / self.avgdl);
                        idf * f * (K1 + 1.0) / denom
                    })
                    .sum()
            })
            .collect()
    }

    /// Indices and scores of the `k` best documents, best first.
    pub fn top_k(&self, query: &[String], k: usize) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.scores(query).into_iter().enumerate().collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

/// BM25 retrieval agent.
pub struct Bm25Agent {
    model: String,
    index: Option<Bm25Index>,
    corpus: Vec<Segment>,
}

impl Bm25Agent {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            index: None,
            corpus: Vec::new(),
        }
    }

    /// Tokenization shared by documents and queries.
    pub(crate) fn retrieval_tokens(text: &str) -> Vec<String> {
        tokenize(text, NGRAMS, true, true)
    }
}

#[async_trait]
impl Agent for Bm25Agent {
    fn name(&self) -> &'static str {
        "bm25"
    }

    async fn index(&mut self, dataset: &dyn Dataset) -> Result<()> {
        info!(agent = self.name(), "indexing corpus");
        let corpus = dataset.read_corpus()?;
        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|segment| Self::retrieval_tokens(&segment.content))
            .collect();
        self.index = Some(Bm25Index::new(&tokenized));
        self.corpus = corpus;
        info!(agent = self.name(), documents = self.corpus.len(), "corpus indexed");
        Ok(())
    }

    async fn reason(&self, question: &Question) -> Result<Notebook> {
        let index = self.index.as_ref().ok_or(AgentError::NotIndexed)?;
        debug!(question = %question.id, k = TOP_K, "retrieving documents");

        let query = Self::retrieval_tokens(&question.text);
        let sources: Vec<ScoredSegment> = index
            .top_k(&query, TOP_K)
            .into_iter()
            .map(|(idx, score)| {
                ScoredSegment::new(
                    self.corpus[idx].id.clone(),
                    self.corpus[idx].content.clone(),
                    score,
                )
            })
            .collect();

        let notes = prompt::fill(
            prompt::qa_prompt_for_model(&self.model),
            "{context}",
            &joined_contents(&sources),
        );
        Ok(Notebook::new(question.id.clone(), question.text.clone())
            .with_sources(sources)
            .with_notes(notes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_index() -> Bm25Index {
        let docs = vec![
            Bm25Agent::retrieval_tokens("the cat sat on the mat"),
            Bm25Agent::retrieval_tokens("dogs chase the mailman every morning"),
            Bm25Agent::retrieval_tokens("stars collapse into black holes"),
        ];
        Bm25Index::new(&docs)
    }

    #[test]
    fn query_term_ranks_its_document_first() {
        let index = toy_index();
        let top = index.top_k(&Bm25Agent::retrieval_tokens("black holes"), 3);
        assert_eq!(top[0].0, 2);
        assert!(top[0].1 > top[1].1);
    }

    #[test]
    fn unrelated_query_scores_zero_everywhere() {
        let index = toy_index();
        let scores = index.scores(&Bm25Agent::retrieval_tokens("quantum pancakes"));
        assert!(scores.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn scores_cover_every_document() {
        let index = toy_index();
        let scores = index.scores(&Bm25Agent::retrieval_tokens("cat"));
        assert_eq!(scores.len(), 3);
        assert!(scores[0] > 0.0);
    }

    #[test]
    fn empty_corpus_yields_no_scores() {
        let index = Bm25Index::new(&[]);
        assert!(index.scores(&["anything".to_string()]).is_empty());
    }

    #[tokio::test]
    async fn reason_before_index_fails() {
        let agent = Bm25Agent::new("gpt-4o-mini");
        let question = Question::new(
            "q1",
            "who?",
            vec!["them".into()],
            recallbench_core::QuestionCategory::SingleHop,
        );
        assert!(matches!(
            agent.reason(&question).await.unwrap_err(),
            AgentError::NotIndexed
        ));
    }
}
