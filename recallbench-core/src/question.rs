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

//! Questions with gold answers and evidence annotations.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The reasoning category of a benchmark question.
///
/// Codes follow the numbering used by the benchmark corpora, so the enum
/// serializes as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum QuestionCategory {
    MultiHop,
    Temporal,
    OpenDomain,
    SingleHop,
    Adversarial,
}

impl QuestionCategory {
    /// The numeric code used in corpus files and CLI filters.
    pub fn code(self) -> u8 {
        match self {
            QuestionCategory::MultiHop => 1,
            QuestionCategory::Temporal => 2,
            QuestionCategory::OpenDomain => 3,
            QuestionCategory::SingleHop => 4,
            QuestionCategory::Adversarial => 5,
        }
    }
}

impl TryFrom<u8> for QuestionCategory {
    type Error = CoreError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(QuestionCategory::MultiHop),
            2 => Ok(QuestionCategory::Temporal),
            3 => Ok(QuestionCategory::OpenDomain),
            4 => Ok(QuestionCategory::SingleHop),
            5 => Ok(QuestionCategory::Adversarial),
            other => Err(CoreError::UnknownCategory(other)),
        }
    }
}

impl From<QuestionCategory> for u8 {
    fn from(category: QuestionCategory) -> u8 {
        category.code()
    }
}

/// A benchmark question with its gold answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Identifier unique across the loaded dataset slice.
    pub id: String,
    /// The question text shown to the agent.
    pub text: String,
    /// Acceptable gold answers. Metrics take the best score over these.
    pub answers: Vec<String>,
    pub category: QuestionCategory,
    /// Segment ids the gold answer is grounded in. Empty when the corpus
    /// provides no evidence annotations.
    #[serde(default)]
    pub evidence: Vec<String>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        text: impl Into<String>,
        answers: Vec<String>,
        category: QuestionCategory,
    ) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            answers,
            category,
            evidence: Vec::new(),
        }
    }

    /// Attach evidence segment ids.
    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }
}

/// Keep only the questions matching an optional id list and an optional
/// category. `None` filters keep everything.
pub fn filter_questions(
    questions: Vec<Question>,
    ids: Option<&[String]>,
    category: Option<QuestionCategory>,
) -> Vec<Question> {
    questions
        .into_iter()
        .filter(|q| ids.map_or(true, |wanted| wanted.iter().any(|id| *id == q.id)))
        .filter(|q| category.map_or(true, |c| c == q.category))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<Question> {
        vec![
            Question::new("q1", "who?", vec!["alice".into()], QuestionCategory::SingleHop),
            Question::new("q2", "when?", vec!["2020".into()], QuestionCategory::Temporal),
            Question::new("q3", "why?", vec!["because".into()], QuestionCategory::MultiHop),
        ]
    }

    #[test]
    fn category_codes_round_trip() {
        for code in 1u8..=5 {
            let category = QuestionCategory::try_from(code).unwrap();
            assert_eq!(category.code(), code);
        }
    }

    #[test]
    fn unknown_category_code_is_rejected() {
        assert!(QuestionCategory::try_from(0).is_err());
        assert!(QuestionCategory::try_from(6).is_err());
    }

    #[test]
    fn category_serializes_as_integer() {
        let json = serde_json::to_string(&QuestionCategory::Adversarial).unwrap();
        assert_eq!(json, "5");
        let back: QuestionCategory = serde_json::from_str("2").unwrap();
        assert_eq!(back, QuestionCategory::Temporal);
    }

    #[test]
    fn filter_by_id_keeps_listed_questions() {
        let wanted = vec!["q2".to_string()];
        let kept = filter_questions(sample_questions(), Some(&wanted), None);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "q2");
    }

    #[test]
    fn filter_by_category() {
        let kept = filter_questions(sample_questions(), None, Some(QuestionCategory::MultiHop));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "q3");
    }

    #[test]
    fn no_filters_keeps_everything() {
        assert_eq!(filter_questions(sample_questions(), None, None).len(), 3);
    }
}
