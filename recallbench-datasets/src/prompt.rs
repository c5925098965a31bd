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

//! System prompt templates for the QA tasks.
//!
//! Templates carry a `{context}` (or `{conversation}`) placeholder filled
//! with rendered passages via [`fill`]. The wording is benchmark-sensitive
//! and must not be reflowed casually: answer extraction and the judge both
//! depend on models following these instructions literally.

/// Relevant-passage QA prompt for models that answer tersely on their own.
pub const QA_PROMPT_RELEVANT: &str = r#"You are a helpful Question Answering assistant. You will be presented with relevant passages, followed by a question. Your task is to provide an EXACT answer, using only words found in the passages when possible. If the answer can be a single word (e.g., Yes, No, a date, or an object), please provide just that word. If there is no enough information in the passages to answer the question, please answer "N/A".

For example if the question is:

Q: "Are the Laleli Mosque and Esma Sultan Mansion located in the same neighborhood?"

Your answer should be: "No"

Below are the passages.

{context}
"#;

/// Relevant-passage QA prompt with a worked example and repeated
/// formatting constraints, for models that tend to editorialize.
pub const QA_PROMPT_RELEVANT_EXPLICIT: &str = r#"You are a helpful Question Answering assistant. You will be presented with relevant passages, followed by a question. Your task is to provide an EXACT answer, using only words found in the passages when possible. UNDER NO CIRCUMSTANCES should you include any additional commentary, explanations, reasoning, or notes in your response. Your response MUST be concise and to the point.

Below is an example of given passages, a question, and the expected answer.

Passages:

Universal Pictures: Universal owned the rights to the "Oswald the Lucky Rabbit" character, although Walt Disney and Ub Iwerks had created Oswald, and their films had enjoyed a successful theatrical run. After Charles Mintz had unsuccessfully demanded that Disney accept a lower fee for producing the property, Mintz produced the films with his own group of animators. Instead, Disney and Iwerks created Mickey Mouse who in 1928 starred in the first "sync" sound animated short, Steamboat Willie. This moment effectively launched Walt Disney Studios' foothold, while Universal became a minor player in film animation. Universal subsequently severed its link to Mintz and formed its own in-house animation studio to produce Oswald cartoons headed by Walter Lantz.

The Mickey Mouse Club: The Mickey Mouse Club is an American variety television show that aired intermittently from 1955 to 1996 and returned in 2017 to social media. Created by Walt Disney and produced by Walt Disney Productions, the program was first televised in 1955 by ABC, featuring a regular but ever-changing cast of mostly teen performers. ABC broadcast reruns weekday afternoons during the 1958 -- 1959 season, airing right after American Bandstand. The show was revived after its initial 1955 -- 1959 run on ABC, first from 1977 -- 1979 for first-run syndication, again from 1989 -- 1996 as The All-New Mickey Mouse Club (also known to fans as MMC from 1993 -- 1996) airing exclusively on cable television's The Disney Channel, then rebooted in 2017 with the moniker Club Mickey Mouse airing exclusively on internet social media.

Question:
"What was the old show that was named after a character that Walt Disney created in 1928 called?"

Answer:
"The Mickey Mouse Club"

Your response MUST be formatted as a single line of text, containing ONLY the answer to the question. If the answer is not present or cannot be inferred with the information found in the passages, you MUST then respond with "N/A".

DO NOT include any additional commentary, explanations, or reasoning in your response. For example, refrain from including notes like "(Note: Based on the information provided, the answer is...)"

Below are the relevant passages.

Passages:

{context}

-----

Remember to provide the answer in a single line, without any additional commentary, explanations, or extraneous text.
"#;

/// Whole-corpus prompt for grouped questions answered as one JSON object.
pub const QA_PROMPT_ALL: &str = r#"You are a helpful Question Answering assistant. You will be presented with all the passages in the dataset which may or may not be relevant to answer the given questions. Your task is to provide an EXACT answer, using only words found in the passages when possible. If the answer can be a single word (e.g., Yes, No, a date, or an object), please provide just that word. Note that all questions are answerable with the provided passages, so reiterate if you do not find relevant information.

Questions are formatted as follows:

Q (<question_id>): "What government position was held by the woman who portrayed Corliss Archer in the film Kiss and Tell?"

Format your answer as a JSON object where each question is answered exactly once. Your response should also honor the given question order and question ids.

Below are the passages in the dataset. (The passages may be truncated due to length constraints)

{context}
"#;

/// Conversation QA prompt used for the dialogue corpus.
pub const QA_PROMPT_CONVERSATION: &str = r#"You are a helpful Question Answering assistant. You will be presented with a conversation between two users, followed by a question. Your task is to provide an EXACT answer, using only words found in the conversations when possible. If the answer can be a single word (e.g., Yes, No, a date, or an object), please provide just that word. For example if the question is:

Q: "what book did Carlos buy on his birthday?"

Your answer should be: "Becoming Nicole"

The conversation takes place over multiple days and the date of each conversation is written at the beginning of the conversation:

Below is the conversation.

{conversation}
"#;

/// Models trusted to answer tersely without the worked example.
const TERSE_MODELS: [&str; 3] = ["o3-mini", "gpt-4o-mini", "gpt-4o-mini-batch"];

/// Pick the relevant-passage QA prompt for a model.
pub fn qa_prompt_for_model(model: &str) -> &'static str {
    if TERSE_MODELS.contains(&model) {
        QA_PROMPT_RELEVANT
    } else {
        QA_PROMPT_RELEVANT_EXPLICIT
    }
}

/// Substitute a template placeholder such as `{context}`.
pub fn fill(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(placeholder, value)
}
