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

//! Agent errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    /// `reason` was called before `index`.
    #[error("index not created; index the dataset before reasoning")]
    NotIndexed,

    /// The oracle was asked a question that is not in the dataset.
    #[error("question {0:?} has no indexed answer")]
    UnknownQuestion(String),

    /// The agent only works question-by-question or only in batches.
    #[error("agent {agent} does not support {mode} reasoning")]
    UnsupportedMode {
        agent: &'static str,
        mode: &'static str,
    },

    #[error(transparent)]
    Dataset(#[from] recallbench_datasets::DatasetError),

    #[error(transparent)]
    Context(#[from] recallbench_context::ContextError),

    #[error(transparent)]
    Client(#[from] recallbench_client::ClientError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
