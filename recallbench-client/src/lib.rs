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

//! Recallbench Client
//!
//! Completion-service plumbing for the harness: the [`ChatApi`] and
//! [`EmbeddingClient`] seams the agents and evaluators talk through, an
//! Azure OpenAI implementation of both, the jsonl batch-job records the
//! hosted batch endpoint consumes, and the cost guard that refuses to
//! queue runaway jobs.
//!
//! Nothing in this crate decides what a prompt contains; it receives
//! fully rendered prompts from the agents and ships them out.

pub mod azure;
pub mod batch;
pub mod chat;
pub mod cost;
pub mod embedding;
pub mod error;
pub mod job;

pub use azure::AzureOpenAiClient;
pub use chat::{
    max_output_tokens, supports_temperature, ChatApi, ChatMessage, ChatOutcome, TokenUsage,
};
pub use cost::CostGuard;
pub use embedding::EmbeddingClient;
pub use error::{ClientError, Result};
pub use job::{parse_results, to_jsonl, BatchJob, BatchResult, JobBody};
