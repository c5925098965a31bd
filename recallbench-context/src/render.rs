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

//! Rendering a segment span into one prompt-ready string.

use recallbench_core::Segment;

/// Join a contiguous run of segments with newlines, inserting a
/// `sample_id:` header line whenever the group key changes.
///
/// Segments before the first group transition carry no header, so a span
/// of entirely ungrouped segments renders as its contents alone. A
/// transition from a group back to ungrouped is still announced, as
/// `sample_id: none`, so the reader of the prompt can tell the grouped
/// run ended.
pub fn render(segments: &[Segment]) -> String {
    let mut out: Vec<String> = Vec::with_capacity(segments.len());
    let mut current: Option<&str> = None;
    for segment in segments {
        let group = segment.group.as_deref();
        if group != current {
            match group {
                Some(g) => out.push(format!("sample_id: {g}")),
                None => out.push("sample_id: none".to_string()),
            }
            current = group;
        }
        out.push(segment.content.clone());
    }
    out.join("\n")
}
