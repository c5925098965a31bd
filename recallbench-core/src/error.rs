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

//! Error types for the core data model.

use thiserror::Error;

/// Errors raised while constructing or validating core model values.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A question category code outside the known 1..=5 range.
    #[error("unknown question category code {0}")]
    UnknownCategory(u8),
}

pub type Result<T> = std::result::Result<T, CoreError>;
