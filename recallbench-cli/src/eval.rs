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

//! The evaluation path: score a downloaded results file against the
//! dataset's gold answers and write the report.

use std::fs;

use anyhow::{bail, Context, Result};
use recallbench_client::{parse_results, AzureOpenAiClient, TokenUsage};
use recallbench_core::Notebook;
use recallbench_evals::{
    build_judge_jobs, eval_bert, eval_bleu, eval_exact_match, eval_f1, eval_retrieval,
    eval_rouge, eval_usage, score_judge_results, EvalReport, QaPair, RetrievalPair,
};
use tracing::{info, warn};

use crate::{common, Cli};

pub async fn run(cli: &Cli, run_id: &str) -> Result<()> {
    let dataset = common::open_dataset(cli)?;
    let samples = dataset.read()?;
    let gold = common::gold_index(&samples);

    let mut report = EvalReport::new(run_id);

    if cli.retrieval {
        let path = cli
            .evaluation
            .as_ref()
            .context("--retrieval needs --evaluation <retrieval jsonl>")?;
        let pairs = read_retrieval_pairs(&fs::read_to_string(path)?, &gold)?;
        report.recall_at = Some(eval_retrieval(&pairs)?);
    } else if let Some(path) = &cli.evaluation {
        let results = parse_results(&fs::read_to_string(path)?)?;
        let mut qa_pairs = Vec::new();
        let mut usages: Vec<TokenUsage> = Vec::new();
        for result in &results {
            let Some(question) = gold.get(&result.custom_id) else {
                warn!(custom_id = %result.custom_id, "result has no gold question, skipping");
                continue;
            };
            qa_pairs.push(
                QaPair::new(
                    question.id.clone(),
                    question.answers.clone(),
                    common::extract_answer(&result.content),
                )
                .with_question(question.text.clone()),
            );
            usages.push(result.usage);
        }
        if qa_pairs.is_empty() {
            bail!("no results matched the dataset's questions");
        }
        info!(scored = qa_pairs.len(), "scoring answers");

        report.exact_match = Some(eval_exact_match(&qa_pairs)?);
        report.f1 = Some(eval_f1(&qa_pairs)?);
        let (rouge_1, rouge_2) = eval_rouge(&qa_pairs)?;
        report.rouge_1 = Some(rouge_1);
        report.rouge_2 = Some(rouge_2);
        report.bleu = Some(eval_bleu(&qa_pairs)?);
        report.usage = Some(eval_usage(&usages)?);

        if cli.bert_eval {
            let client = AzureOpenAiClient::from_env()?;
            report.bert = Some(eval_bert(&client, &qa_pairs).await?);
        }
        if cli.judge_eval {
            let client = AzureOpenAiClient::from_env()?;
            let jobs = build_judge_jobs("gpt-4o-mini", &qa_pairs);
            let batch = client
                .queue_batch(&format!("judge-{run_id}.jsonl"), &jobs)
                .await?;
            info!(batch_id = %batch.id, "judge batch queued, score it later with --judge-eval-path");
        }
    }

    if let Some(path) = &cli.judge_eval_path {
        let results = parse_results(&fs::read_to_string(path)?)?;
        report.judge = Some(score_judge_results(&results)?);
    }

    if report.exact_match.is_none() && report.recall_at.is_none() && report.judge.is_none() {
        bail!("nothing to evaluate: pass --evaluation, --retrieval or --judge-eval-path");
    }

    let out_path = report.write(&cli.output_dir)?;
    println!("{}", report.render());
    println!("Report written to {}", out_path.display());
    Ok(())
}

/// Pair each dumped notebook with its gold evidence ids.
fn read_retrieval_pairs(
    jsonl: &str,
    gold: &std::collections::HashMap<String, recallbench_core::Question>,
) -> Result<Vec<RetrievalPair>> {
    let mut pairs = Vec::new();
    for line in jsonl.lines().filter(|l| !l.trim().is_empty()) {
        let notebook: Notebook = serde_json::from_str(line)?;
        let Some(question) = gold.get(&notebook.question_id) else {
            warn!(question = %notebook.question_id, "dumped question not in dataset, skipping");
            continue;
        };
        pairs.push(RetrievalPair {
            question_id: notebook.question_id,
            expected: question.evidence.clone(),
            retrieved: notebook.sources.into_iter().map(|s| s.id).collect(),
        });
    }
    Ok(pairs)
}
