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

//! Recallbench Core
//!
//! Shared data model for the Recallbench QA evaluation harness: text
//! segments, questions with gold answers, dataset samples, and the
//! notebook record an agent produces per question.
//!
//! Everything here is a plain value type. Dataset loaders construct these
//! from raw corpus files, agents consume them, and evaluators score the
//! notebooks they produce. No component in this crate performs I/O.

pub mod error;
pub mod notebook;
pub mod question;
pub mod sample;
pub mod segment;

pub use error::{CoreError, Result};
pub use notebook::Notebook;
pub use question::{filter_questions, Question, QuestionCategory};
pub use sample::Sample;
pub use segment::{ScoredSegment, Segment};
