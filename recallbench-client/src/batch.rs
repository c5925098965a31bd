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

//! Batch-job lifecycle against the hosted batch endpoint.
//!
//! Upload the jsonl input file, wait for it to process, create the batch
//! with a 24 hour completion window, poll until it reaches a terminal
//! status, then download the output file. Batches routinely take hours,
//! so the polling cadence is deliberately slow.

use std::time::Duration;

use serde::Deserialize;
use tracing::{info, warn};

use crate::azure::AzureOpenAiClient;
use crate::error::{ClientError, Result};
use crate::job::{to_jsonl, BatchJob};

/// Seconds between file-processing polls.
const FILE_POLL_SECS: u64 = 10;

/// Seconds between batch-status polls.
const BATCH_POLL_SECS: u64 = 120;

const COMPLETION_WINDOW: &str = "24h";

/// Status of a queued batch as reported by the service.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchStatus {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub output_file_id: Option<String>,
}

impl BatchStatus {
    /// Whether the batch is still making progress.
    fn in_flight(&self) -> bool {
        matches!(
            self.status.as_str(),
            "in_progress" | "validating" | "finalizing"
        )
    }
}

#[derive(Deserialize)]
struct FileStatus {
    id: String,
    status: String,
}

impl AzureOpenAiClient {
    /// Upload a jsonl payload as a batch input file and wait until the
    /// service has processed it. Returns the file id.
    pub async fn upload_batch_file(&self, file_name: &str, jsonl: String) -> Result<String> {
        info!(
            file_name,
            bytes = jsonl.len(),
            "uploading batch input file"
        );
        let form = reqwest::multipart::Form::new()
            .text("purpose", "batch")
            .part(
                "file",
                reqwest::multipart::Part::text(jsonl)
                    .file_name(file_name.to_string())
                    .mime_str("application/jsonl")?,
            );
        let response = self
            .http()
            .post(self.resource_url("files"))
            .header("api-key", self.api_key())
            .multipart(form)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let mut file: FileStatus = response.json().await?;

        loop {
            match file.status.as_str() {
                "processed" => return Ok(file.id),
                "error" => return Err(ClientError::FileUpload { file_id: file.id }),
                _ => {
                    info!(file_id = %file.id, status = %file.status, "waiting for file to process");
                    tokio::time::sleep(Duration::from_secs(FILE_POLL_SECS)).await;
                }
            }
            let response = self
                .http()
                .get(self.resource_url(&format!("files/{}", file.id)))
                .header("api-key", self.api_key())
                .send()
                .await?;
            file = Self::expect_success(response).await?.json().await?;
        }
    }

    /// Create a batch over a processed input file.
    pub async fn create_batch(&self, input_file_id: &str) -> Result<BatchStatus> {
        let response = self
            .http()
            .post(self.resource_url("batches"))
            .header("api-key", self.api_key())
            .json(&serde_json::json!({
                "input_file_id": input_file_id,
                "endpoint": "/chat/completions",
                "completion_window": COMPLETION_WINDOW,
            }))
            .send()
            .await?;
        let batch: BatchStatus = Self::expect_success(response).await?.json().await?;
        info!(batch_id = %batch.id, status = %batch.status, "batch created");
        Ok(batch)
    }

    pub async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchStatus> {
        let response = self
            .http()
            .get(self.resource_url(&format!("batches/{batch_id}")))
            .header("api-key", self.api_key())
            .send()
            .await?;
        Ok(Self::expect_success(response).await?.json().await?)
    }

    /// Poll a batch to a terminal status and return its output file id.
    pub async fn wait_for_batch(&self, mut batch: BatchStatus) -> Result<String> {
        while batch.in_flight() {
            info!(batch_id = %batch.id, status = %batch.status, "waiting for batch to complete");
            tokio::time::sleep(Duration::from_secs(BATCH_POLL_SECS)).await;
            batch = self.retrieve_batch(&batch.id).await?;
        }
        if batch.status != "completed" {
            warn!(batch_id = %batch.id, status = %batch.status, "batch ended abnormally");
            return Err(ClientError::BatchFailed {
                status: batch.status,
            });
        }
        batch.output_file_id.ok_or(ClientError::BatchFailed {
            status: "completed without output file".to_string(),
        })
    }

    /// Download a file's content as text.
    pub async fn download_file(&self, file_id: &str) -> Result<String> {
        let response = self
            .http()
            .get(self.resource_url(&format!("files/{file_id}/content")))
            .header("api-key", self.api_key())
            .send()
            .await?;
        Ok(Self::expect_success(response).await?.text().await?)
    }

    /// Upload the jobs and create the batch; does not wait for results.
    pub async fn queue_batch(&self, file_name: &str, jobs: &[BatchJob]) -> Result<BatchStatus> {
        if jobs.is_empty() {
            return Err(ClientError::EmptyJobs);
        }
        let file_id = self.upload_batch_file(file_name, to_jsonl(jobs)?).await?;
        self.create_batch(&file_id).await
    }

    /// Queue the jobs and block until the output file is available.
    /// Returns the raw results jsonl.
    pub async fn run_batch(&self, file_name: &str, jobs: &[BatchJob]) -> Result<String> {
        let batch = self.queue_batch(file_name, jobs).await?;
        let output_file_id = self.wait_for_batch(batch).await?;
        self.download_file(&output_file_id).await
    }
}
