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

//! The prediction path: retrieve context, assemble the QA batch, queue
//! it.

use std::fs;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use recallbench_agents::{
    Agent, AgentKind, Bm25Agent, DefaultAgent, DenseAgent, OracleAgent, RerankAgent,
};
use recallbench_client::{
    to_jsonl, AzureOpenAiClient, BatchJob, ChatApi, CostGuard, EmbeddingClient, JobBody,
};
use recallbench_context::{TiktokenEncoder, Tokenizer};
use recallbench_core::{Notebook, Question};
use tracing::{info, warn};

use crate::{common, Cli};

fn build_agent(kind: AgentKind, model: &str) -> Result<Box<dyn Agent>> {
    Ok(match kind {
        AgentKind::Default => Box::new(DefaultAgent::new(model)?),
        AgentKind::Oracle => Box::new(OracleAgent::new(model)),
        AgentKind::Bm25 => Box::new(Bm25Agent::new(model)),
        AgentKind::Dense => {
            let client = Arc::new(AzureOpenAiClient::from_env()?);
            Box::new(DenseAgent::new(model, client as Arc<dyn EmbeddingClient>))
        }
        AgentKind::Rerank => {
            let client = Arc::new(AzureOpenAiClient::from_env()?);
            Box::new(RerankAgent::new(model, client as Arc<dyn ChatApi>))
        }
    })
}

/// The user message of a QA job. The full-context agent shares one
/// prompt across a question group, so its questions carry their id
/// inline for the JSON-object answer format.
fn user_message(kind: AgentKind, question: &Question) -> String {
    match kind {
        AgentKind::Default => format!("Q ({}): {}", question.id, question.text),
        _ => question.text.clone(),
    }
}

pub async fn run(cli: &Cli, run_id: &str) -> Result<()> {
    let dataset = common::open_dataset(cli)?;
    let samples = dataset.read()?;
    let questions = common::collect_questions(&samples, cli.questions, cli.category.is_some());
    if questions.is_empty() {
        bail!("no questions to answer after filtering");
    }
    info!(questions = questions.len(), "prediction starting");

    let kind = AgentKind::from_str(&cli.agent).map_err(anyhow::Error::msg)?;
    let mut agent = build_agent(kind, &cli.model)?;
    agent.index(dataset.as_ref()).await?;
    let notebooks = agent.reason_many(&questions).await?;

    fs::create_dir_all(&cli.output_dir)?;
    let retrieval_path = cli.output_dir.join(format!("retrieval-{run_id}.jsonl"));
    write_retrieval_dump(&retrieval_path, &notebooks)?;
    info!(path = %retrieval_path.display(), "retrieval dump written");

    let jobs: Vec<BatchJob> = notebooks
        .iter()
        .zip(&questions)
        .map(|(notebook, question)| {
            let system = notebook
                .notes
                .clone()
                .unwrap_or_else(|| dataset.qa_prompt(&cli.model).to_string());
            BatchJob::new(
                question.id.clone(),
                JobBody::chat(&cli.model, system, user_message(kind, question)),
            )
        })
        .collect();

    let encoder = TiktokenEncoder::for_model(&cli.model)?;
    let guard = CostGuard::new(&cli.model);
    for job in &jobs {
        guard.add_prompt(encoder.count(&job.body.prompt_text()));
    }
    guard.check().context("cost guard rejected the batch")?;

    let jobs_name = format!("jobs-{run_id}.jsonl");
    let jobs_path = cli.output_dir.join(&jobs_name);
    fs::write(&jobs_path, to_jsonl(&jobs)?)?;
    info!(path = %jobs_path.display(), jobs = jobs.len(), "jobs file written");

    if cli.noop {
        warn!("noop set, returning without queuing the batch");
        return Ok(());
    }

    let client = AzureOpenAiClient::from_env()?;
    let batch = client.queue_batch(&jobs_name, &jobs).await?;
    println!("Queued batch {} ({})", batch.id, batch.status);
    Ok(())
}

fn write_retrieval_dump(path: &std::path::Path, notebooks: &[Notebook]) -> Result<()> {
    let mut lines = Vec::with_capacity(notebooks.len());
    for notebook in notebooks {
        lines.push(serde_json::to_string(notebook)?);
    }
    fs::write(path, lines.join("\n"))?;
    Ok(())
}
