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

//! Recallbench CLI
//!
//! Orchestrates the two halves of a benchmark run: `predict` retrieves
//! context, assembles batch jobs and queues them; `eval` scores a
//! downloaded results file against the dataset's gold answers.

mod common;
mod eval;
mod predict;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use tracing::{info, Level};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Execution {
    /// Retrieve context and queue the QA batch.
    Predict,
    /// Score a results file and write the report.
    Eval,
}

#[derive(Parser)]
#[command(name = "recallbench")]
#[command(about = "Long-context QA retrieval benchmark harness", long_about = None)]
struct Cli {
    /// Execution mode
    #[arg(short, long, value_enum)]
    execution: Execution,

    /// Dataset to run against (locomo, hotpot, 2wiki, musique)
    #[arg(short, long)]
    dataset: String,

    /// Retrieval agent (default, oracle, bm25, dense, rerank)
    #[arg(short, long, default_value = "default")]
    agent: String,

    /// Model deployment identifier
    #[arg(short, long, default_value = "gpt-4o-mini-batch")]
    model: String,

    /// Restrict to one conversation/sample id
    #[arg(short, long)]
    conversation: Option<String>,

    /// Number of questions answered per sample
    #[arg(short, long)]
    questions: Option<usize>,

    /// Question category code to evaluate (1-5)
    #[arg(long)]
    category: Option<u8>,

    /// Keep at most this many samples
    #[arg(short, long)]
    limit: Option<usize>,

    /// Directory holding the dataset files
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,

    /// Directory for jobs, retrieval dumps and reports
    #[arg(long, default_value = "output")]
    output_dir: PathBuf,

    /// Stop after the cost estimate; write the jobs file locally only
    #[arg(long)]
    noop: bool,

    /// Results file to evaluate (batch output jsonl, or the retrieval
    /// dump with --retrieval)
    #[arg(long)]
    evaluation: Option<PathBuf>,

    /// Also compute the embedding-similarity score
    #[arg(long)]
    bert_eval: bool,

    /// Queue an LLM-judge batch over the evaluated answers
    #[arg(long)]
    judge_eval: bool,

    /// Score an existing judge-batch results file
    #[arg(long)]
    judge_eval_path: Option<PathBuf>,

    /// Score retrieval recall@K instead of answer quality
    #[arg(long)]
    retrieval: bool,

    /// Verbose mode
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let run_id = uuid::Uuid::new_v4().to_string();
    info!(run_id, mode = ?cli.execution, dataset = %cli.dataset, "starting run");

    match cli.execution {
        Execution::Predict => predict::run(&cli, &run_id).await,
        Execution::Eval => eval::run(&cli, &run_id).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predict_args_parse_with_defaults() {
        let cli = Cli::try_parse_from([
            "recallbench",
            "--execution",
            "predict",
            "--dataset",
            "locomo",
        ])
        .unwrap();
        assert_eq!(cli.execution, Execution::Predict);
        assert_eq!(cli.agent, "default");
        assert_eq!(cli.model, "gpt-4o-mini-batch");
        assert_eq!(cli.data_dir, PathBuf::from("data"));
        assert!(!cli.noop);
    }

    #[test]
    fn eval_args_carry_the_metric_flags() {
        let cli = Cli::try_parse_from([
            "recallbench",
            "-e",
            "eval",
            "-d",
            "hotpot",
            "--evaluation",
            "output/results.jsonl",
            "--bert-eval",
            "--retrieval",
        ])
        .unwrap();
        assert_eq!(cli.execution, Execution::Eval);
        assert!(cli.bert_eval);
        assert!(cli.retrieval);
        assert_eq!(
            cli.evaluation,
            Some(PathBuf::from("output/results.jsonl"))
        );
    }

    #[test]
    fn execution_mode_is_required() {
        assert!(Cli::try_parse_from(["recallbench", "--dataset", "locomo"]).is_err());
    }
}
