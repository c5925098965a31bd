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

//! Batch-job wire records.
//!
//! One jsonl line per question goes up; one jsonl line per completion
//! comes back. The shapes mirror the hosted batch endpoint exactly, so
//! the structs here are serde mirrors rather than convenience types.

use serde::{Deserialize, Serialize};

use crate::chat::{max_output_tokens, supports_temperature, ChatMessage, TokenUsage};
use crate::error::Result;

/// Request body of one chat-completion job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobBody {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub max_tokens: u32,
}

impl JobBody {
    /// A deterministic system+user request following the per-model policy:
    /// temperature 0.0 where the deployment accepts it, output capped at
    /// the model's completion limit.
    pub fn chat(
        model: impl Into<String>,
        system: impl Into<String>,
        user: impl Into<String>,
    ) -> Self {
        let model = model.into();
        let temperature = supports_temperature(&model).then_some(0.0);
        let max_tokens = max_output_tokens(&model);
        Self {
            model,
            messages: vec![ChatMessage::system(system), ChatMessage::user(user)],
            temperature,
            frequency_penalty: 0.0,
            presence_penalty: 0.0,
            max_tokens,
        }
    }

    /// Concatenated text of every message, for token estimation.
    pub fn prompt_text(&self) -> String {
        self.messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// One line of a batch input file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchJob {
    pub custom_id: String,
    pub method: String,
    pub url: String,
    pub body: JobBody,
}

impl BatchJob {
    pub fn new(custom_id: impl Into<String>, body: JobBody) -> Self {
        Self {
            custom_id: custom_id.into(),
            method: "POST".to_string(),
            url: "/chat/completions".to_string(),
            body,
        }
    }
}

/// Serialize jobs as the jsonl payload the batch endpoint expects.
pub fn to_jsonl(jobs: &[BatchJob]) -> Result<String> {
    let mut lines = Vec::with_capacity(jobs.len());
    for job in jobs {
        lines.push(serde_json::to_string(job)?);
    }
    Ok(lines.join("\n"))
}

/// One line of a batch output file, flattened to what scoring needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub custom_id: String,
    pub content: String,
    #[serde(default)]
    pub usage: TokenUsage,
}

#[derive(Deserialize)]
struct ResultLine {
    custom_id: String,
    response: ResultResponse,
}

#[derive(Deserialize)]
struct ResultResponse {
    body: ResultBody,
}

#[derive(Deserialize)]
struct ResultBody {
    choices: Vec<ResultChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct ResultChoice {
    message: ResultMessage,
}

#[derive(Deserialize)]
struct ResultMessage {
    content: String,
}

/// Parse a downloaded batch output file. Blank lines are skipped; a
/// malformed line fails the whole parse since a silently dropped result
/// would skew every averaged metric downstream.
pub fn parse_results(jsonl: &str) -> Result<Vec<BatchResult>> {
    let mut results = Vec::new();
    for line in jsonl.lines() {
        if line.trim().is_empty() {
            continue;
        }
        let parsed: ResultLine = serde_json::from_str(line)?;
        let content = parsed
            .response
            .body
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .unwrap_or_default();
        results.push(BatchResult {
            custom_id: parsed.custom_id,
            content,
            usage: parsed.response.body.usage,
        });
    }
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_body_follows_the_model_policy() {
        let body = JobBody::chat("gpt-4o-mini", "sys", "usr");
        assert_eq!(body.temperature, Some(0.0));
        assert_eq!(body.max_tokens, 16_384);

        let body = JobBody::chat("o3-mini", "sys", "usr");
        assert_eq!(body.temperature, None);
        assert_eq!(body.max_tokens, 100_000);
    }

    #[test]
    fn temperature_is_omitted_from_json_when_unsupported() {
        let job = BatchJob::new("q1", JobBody::chat("o3-mini", "sys", "usr"));
        let json = serde_json::to_string(&job).unwrap();
        assert!(!json.contains("temperature"));
        assert!(json.contains(r#""method":"POST""#));
        assert!(json.contains(r#""url":"/chat/completions""#));
    }

    #[test]
    fn jsonl_has_one_line_per_job() {
        let jobs = vec![
            BatchJob::new("q1", JobBody::chat("gpt-4o-mini", "s", "u")),
            BatchJob::new("q2", JobBody::chat("gpt-4o-mini", "s", "u")),
        ];
        let jsonl = to_jsonl(&jobs).unwrap();
        assert_eq!(jsonl.lines().count(), 2);
        let back: BatchJob = serde_json::from_str(jsonl.lines().next().unwrap()).unwrap();
        assert_eq!(back, jobs[0]);
    }

    #[test]
    fn results_parse_content_and_usage() {
        let jsonl = r#"{"custom_id":"q1","response":{"body":{"choices":[{"message":{"content":"Paris"}}],"usage":{"prompt_tokens":10,"completion_tokens":2,"total_tokens":12}}}}

{"custom_id":"q2","response":{"body":{"choices":[{"message":{"content":"No"}}]}}}"#;
        let results = parse_results(jsonl).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].content, "Paris");
        assert_eq!(results[0].usage.total_tokens, 12);
        assert_eq!(results[1].content, "No");
        assert_eq!(results[1].usage.total_tokens, 0);
    }

    #[test]
    fn malformed_result_line_fails_the_parse() {
        assert!(parse_results("{\"custom_id\": \"q1\"}").is_err());
    }

    #[test]
    fn prompt_text_joins_all_messages() {
        let body = JobBody::chat("gpt-4o-mini", "context here", "the question");
        assert_eq!(body.prompt_text(), "context here\nthe question");
    }
}
