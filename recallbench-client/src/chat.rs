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

//! The chat-completion seam and per-model request policy.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::job::JobBody;

/// One message of a chat request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Token accounting reported by the service for one completion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// A completed chat call: the assistant text plus usage accounting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOutcome {
    pub content: String,
    #[serde(default)]
    pub usage: TokenUsage,
}

/// Synchronous (non-batch) chat completion endpoint.
///
/// Agents that need an inline model call (the reranker, the judge) go
/// through this trait so tests can substitute a scripted stub.
#[async_trait]
pub trait ChatApi: Send + Sync {
    async fn chat(&self, body: &JobBody) -> Result<ChatOutcome>;
}

/// Completion-token cap for a model deployment.
pub fn max_output_tokens(model: &str) -> u32 {
    match model {
        "gpt-4o-mini" | "gpt-4o-mini-batch" => 16_384,
        "o3-mini" => 100_000,
        _ => 4_096,
    }
}

/// Whether a deployment accepts the sampling temperature parameter.
/// Reasoning models reject it outright, so it is omitted for them.
pub fn supports_temperature(model: &str) -> bool {
    matches!(model, "gpt-4o-mini" | "gpt-4o-mini-batch")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_constructors_set_roles() {
        assert_eq!(ChatMessage::system("s").role, "system");
        assert_eq!(ChatMessage::user("u").role, "user");
    }

    #[test]
    fn output_caps_per_model() {
        assert_eq!(max_output_tokens("gpt-4o-mini"), 16_384);
        assert_eq!(max_output_tokens("gpt-4o-mini-batch"), 16_384);
        assert_eq!(max_output_tokens("o3-mini"), 100_000);
        assert_eq!(max_output_tokens("mystery"), 4_096);
    }

    #[test]
    fn reasoning_models_reject_temperature() {
        assert!(supports_temperature("gpt-4o-mini"));
        assert!(!supports_temperature("o3-mini"));
    }

    #[test]
    fn usage_tolerates_missing_fields() {
        let usage: TokenUsage = serde_json::from_str(r#"{"prompt_tokens": 12}"#).unwrap();
        assert_eq!(usage.prompt_tokens, 12);
        assert_eq!(usage.completion_tokens, 0);
    }
}
