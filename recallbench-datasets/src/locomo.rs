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

//! LoCoMo loader: long multi-session conversations between two speakers.
//!
//! `read` renders each conversation into a single flat segment, one
//! session block per day:
//!
//! ```text
//! DATE: 1:56 pm on 8 May, 2023
//! CONVERSATION:
//! Caroline said: Hey Mel! ...
//! Melanie said: Hi Caroline! ...
//! ```
//!
//! `read_corpus` instead keeps one segment per message, keyed by the
//! corpus `dia_id`, which is what the question `evidence` lists point at.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use recallbench_context::{TiktokenEncoder, Tokenizer};
use recallbench_core::{Question, QuestionCategory, Sample, Segment};
use regex::Regex;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{DatasetError, Result};
use crate::{prompt, Dataset, LoadOptions};

const FILE: &str = "locomo10.json";

/// Conversations longer than this keep only their tail. Long tails hurt
/// answer quality far less than losing the recent sessions most
/// questions target.
const CONVERSATION_TOKEN_CAP: usize = 16_000;

/// Gold answer recorded for adversarial questions that ship without one.
const ADVERSARIAL_ANSWER: &str = "Not mentioned in the conversation";

static SESSION_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^session_(\d+)$").expect("session key pattern"));

#[derive(Debug, Deserialize)]
struct LocomoRecord {
    sample_id: String,
    conversation: serde_json::Map<String, serde_json::Value>,
    qa: Vec<LocomoQa>,
}

#[derive(Debug, Deserialize)]
struct LocomoQa {
    question: String,
    #[serde(default)]
    answer: Option<serde_json::Value>,
    #[serde(default)]
    adversarial_answer: Option<serde_json::Value>,
    category: u8,
    #[serde(default)]
    evidence: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct LocomoMessage {
    speaker: String,
    text: String,
    #[serde(default)]
    dia_id: Option<String>,
    #[serde(default)]
    blip_caption: Option<String>,
}

struct Session {
    number: u32,
    date: String,
    messages: Vec<LocomoMessage>,
}

pub struct Locomo {
    path: PathBuf,
    options: LoadOptions,
}

impl Locomo {
    pub fn new(data_dir: impl Into<PathBuf>, options: LoadOptions) -> Self {
        Self {
            path: data_dir.into().join("locomo").join(FILE),
            options,
        }
    }

    fn load_records(&self, conversation: Option<&str>) -> Result<Vec<LocomoRecord>> {
        let raw = crate::read_file(&self.path)?;
        let records: Vec<LocomoRecord> =
            serde_json::from_str(&raw).map_err(|source| DatasetError::Parse {
                path: self.path.clone(),
                source,
            })?;
        Ok(records
            .into_iter()
            .filter(|r| conversation.map_or(true, |id| r.sample_id == id))
            .collect())
    }

    /// Pull `session_<n>` arrays out of the conversation object, ordered
    /// by session number. Key order in the file is not trusted.
    fn sessions(
        &self,
        conversation: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Vec<Session>> {
        let mut sessions = Vec::new();
        for (key, value) in conversation {
            let Some(captures) = SESSION_KEY.captures(key) else {
                continue;
            };
            let number: u32 = captures[1].parse().unwrap_or(u32::MAX);
            let messages: Vec<LocomoMessage> = serde_json::from_value(value.clone())
                .map_err(|source| DatasetError::Parse {
                    path: self.path.clone(),
                    source,
                })?;
            let date = conversation
                .get(&format!("{key}_date_time"))
                .and_then(|v| v.as_str())
                .unwrap_or_default()
                .to_string();
            sessions.push(Session {
                number,
                date,
                messages,
            });
        }
        sessions.sort_by_key(|s| s.number);
        Ok(sessions)
    }

    fn render_conversation(sessions: &[Session]) -> String {
        sessions
            .iter()
            .map(|session| {
                let lines: Vec<String> =
                    session.messages.iter().map(message_line).collect();
                format!(
                    "DATE: {}\nCONVERSATION:\n{}",
                    session.date,
                    lines.join("\n")
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn questions(&self, record: &LocomoRecord) -> Result<Vec<Question>> {
        let mut questions = Vec::with_capacity(record.qa.len());
        for (i, qa) in record.qa.iter().enumerate() {
            let category = QuestionCategory::try_from(qa.category)?;
            let answer = qa
                .answer
                .as_ref()
                .map(value_text)
                .or_else(|| qa.adversarial_answer.as_ref().map(value_text))
                .unwrap_or_else(|| ADVERSARIAL_ANSWER.to_string());
            questions.push(
                Question::new(
                    format!("{}-{}", record.sample_id, i + 1),
                    qa.question.clone(),
                    vec![answer],
                    category,
                )
                .with_evidence(qa.evidence.clone()),
            );
        }
        Ok(crate::keep_questions(questions, &self.options))
    }
}

impl Dataset for Locomo {
    fn name(&self) -> &'static str {
        "locomo"
    }

    fn read(&self) -> Result<Vec<Sample>> {
        let records = self.load_records(self.options.conversation.as_deref())?;
        let encoder = TiktokenEncoder::for_model(&self.options.model)?;

        let mut samples = Vec::with_capacity(records.len());
        for record in records {
            let sessions = self.sessions(&record.conversation)?;
            let mut conversation = Self::render_conversation(&sessions);
            let tokens = encoder.count(&conversation);
            info!(sample = %record.sample_id, tokens, "conversation rendered");
            if self.options.truncate && tokens > CONVERSATION_TOKEN_CAP {
                warn!(
                    sample = %record.sample_id,
                    tokens,
                    cap = CONVERSATION_TOKEN_CAP,
                    "conversation exceeds the token cap, keeping the tail"
                );
                conversation = encoder.tail(&conversation, CONVERSATION_TOKEN_CAP);
            }
            let questions = self.questions(&record)?;
            let segments = vec![Segment::grouped(
                format!("{}:conversation", record.sample_id),
                conversation,
                record.sample_id.clone(),
            )];
            samples.push(Sample::new(record.sample_id, segments, questions));
        }

        let samples = crate::apply_limit(samples, &self.options);
        crate::log_stats(self.name(), &samples);
        Ok(samples)
    }

    fn read_corpus(&self) -> Result<Vec<Segment>> {
        let records = self.load_records(None)?;
        let mut corpus = Vec::new();
        for record in records {
            for session in self.sessions(&record.conversation)? {
                for (i, message) in session.messages.iter().enumerate() {
                    let id = message.dia_id.clone().unwrap_or_else(|| {
                        format!("{}:s{}:m{}", record.sample_id, session.number, i)
                    });
                    corpus.push(Segment::grouped(
                        id,
                        message_line(message),
                        record.sample_id.clone(),
                    ));
                }
            }
        }
        Ok(corpus)
    }

    fn system_prompt(&self, sample: &Sample) -> Option<String> {
        let conversation = sample
            .segments
            .iter()
            .map(|s| s.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        Some(prompt::fill(
            prompt::QA_PROMPT_CONVERSATION,
            "{conversation}",
            &conversation,
        ))
    }
}

fn message_line(message: &LocomoMessage) -> String {
    match message.blip_caption.as_deref().filter(|c| !c.is_empty()) {
        Some(caption) => format!(
            "{} said: {} [shared image: {}]",
            message.speaker, message.text, caption
        ),
        None => format!("{} said: {}", message.speaker, message.text),
    }
}

fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RAW: &str = r#"[{
        "sample_id": "conv-1",
        "conversation": {
            "speaker_a": "Ana",
            "speaker_b": "Bo",
            "session_2": [
                {"speaker": "Ana", "text": "Back again.", "dia_id": "D2:1"}
            ],
            "session_2_date_time": "2 pm on 9 May, 2023",
            "session_10": [
                {"speaker": "Bo", "text": "Long time!", "dia_id": "D10:1",
                 "blip_caption": "a dog in a park"}
            ],
            "session_10_date_time": "1 pm on 9 June, 2023",
            "session_1": [
                {"speaker": "Ana", "text": "Hello.", "dia_id": "D1:1"},
                {"speaker": "Bo", "text": "Hi!", "dia_id": "D1:2"}
            ],
            "session_1_date_time": "1 pm on 8 May, 2023"
        },
        "qa": [
            {"question": "who spoke first?", "answer": "Ana", "category": 4,
             "evidence": ["D1:1"]},
            {"question": "what year was it?", "answer": 2023, "category": 2},
            {"question": "who owns a cat?", "category": 5}
        ]
    }]"#;

    fn fixture_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("locomo")).unwrap();
        std::fs::write(dir.path().join("locomo").join(FILE), RAW).unwrap();
        dir
    }

    #[test]
    fn sessions_render_in_numeric_order() {
        let dir = fixture_dir();
        let dataset = Locomo::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        let text = &samples[0].segments[0].content;

        let first = text.find("8 May, 2023").unwrap();
        let second = text.find("9 May, 2023").unwrap();
        let tenth = text.find("9 June, 2023").unwrap();
        assert!(first < second && second < tenth, "sessions out of order");
        assert!(text.contains("Ana said: Hello."));
        assert!(text.contains("DATE: 1 pm on 8 May, 2023\nCONVERSATION:\n"));
    }

    #[test]
    fn image_messages_carry_their_caption() {
        let dir = fixture_dir();
        let dataset = Locomo::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        assert!(samples[0].segments[0]
            .content
            .contains("Bo said: Long time! [shared image: a dog in a park]"));
    }

    #[test]
    fn answers_fall_back_for_adversarial_questions() {
        let dir = fixture_dir();
        let dataset = Locomo::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        let questions = &samples[0].questions;
        assert_eq!(questions[0].id, "conv-1-1");
        assert_eq!(questions[0].answers, vec!["Ana".to_string()]);
        assert_eq!(questions[1].answers, vec!["2023".to_string()]);
        assert_eq!(questions[2].answers, vec![ADVERSARIAL_ANSWER.to_string()]);
        assert_eq!(questions[2].category, QuestionCategory::Adversarial);
    }

    #[test]
    fn corpus_keys_messages_by_dia_id() {
        let dir = fixture_dir();
        let dataset = Locomo::new(dir.path(), LoadOptions::default());
        let corpus = dataset.read_corpus().unwrap();
        let ids: Vec<&str> = corpus.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["D1:1", "D1:2", "D2:1", "D10:1"]);
        assert_eq!(corpus[0].group.as_deref(), Some("conv-1"));
    }

    #[test]
    fn system_prompt_embeds_the_conversation() {
        let dir = fixture_dir();
        let dataset = Locomo::new(dir.path(), LoadOptions::default());
        let samples = dataset.read().unwrap();
        let prompt = dataset.system_prompt(&samples[0]).unwrap();
        assert!(prompt.contains("Below is the conversation."));
        assert!(prompt.contains("Ana said: Hello."));
    }

    #[test]
    fn question_filters_apply() {
        let dir = fixture_dir();
        let mut options = LoadOptions::default();
        options.category = Some(QuestionCategory::Temporal);
        let dataset = Locomo::new(dir.path(), options);
        let samples = dataset.read().unwrap();
        assert_eq!(samples[0].questions.len(), 1);
        assert_eq!(samples[0].questions[0].id, "conv-1-2");
    }
}
