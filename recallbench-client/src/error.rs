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

//! Errors from the completion-service client.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("response carried no message content")]
    MissingContent,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no jobs to queue")]
    EmptyJobs,

    /// A zero estimate means the prompts were empty; queueing them would
    /// burn a batch slot on nothing.
    #[error("estimated job cost is $0.00, refusing to queue")]
    ZeroCostEstimate,

    #[error("estimated job cost ${estimated:.2} exceeds the ${limit:.2} limit")]
    CostLimitExceeded { estimated: f64, limit: f64 },

    #[error("batch input file {file_id} failed to process")]
    FileUpload { file_id: String },

    #[error("batch job ended with status {status:?}")]
    BatchFailed { status: String },
}

pub type Result<T> = std::result::Result<T, ClientError>;
