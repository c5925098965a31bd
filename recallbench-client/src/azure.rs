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

//! Azure OpenAI implementation of the chat and embedding seams.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::chat::{ChatApi, ChatOutcome, TokenUsage};
use crate::embedding::EmbeddingClient;
use crate::error::{ClientError, Result};
use crate::job::JobBody;

const DEFAULT_API_VERSION: &str = "2024-12-01-preview";
const DEFAULT_EMBEDDING_DEPLOYMENT: &str = "text-embedding-3-small";

/// Client for an Azure OpenAI resource.
///
/// Deployment names double as model identifiers: requests go to
/// `{endpoint}/openai/deployments/{deployment}/...` with the `api-key`
/// header.
pub struct AzureOpenAiClient {
    endpoint: String,
    api_key: String,
    api_version: String,
    embedding_deployment: String,
    http: reqwest::Client,
}

impl AzureOpenAiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            embedding_deployment: DEFAULT_EMBEDDING_DEPLOYMENT.to_string(),
            http: reqwest::Client::new(),
        }
    }

    /// Build a client from `AZURE_OPENAI_ENDPOINT`, `AZURE_OPENAI_API_KEY`
    /// and (optionally) `AZURE_OPENAI_API_VERSION`.
    pub fn from_env() -> Result<Self> {
        let endpoint = std::env::var("AZURE_OPENAI_ENDPOINT")
            .map_err(|_| ClientError::MissingEnv("AZURE_OPENAI_ENDPOINT"))?;
        let api_key = std::env::var("AZURE_OPENAI_API_KEY")
            .map_err(|_| ClientError::MissingEnv("AZURE_OPENAI_API_KEY"))?;
        let mut client = Self::new(endpoint, api_key);
        if let Ok(version) = std::env::var("AZURE_OPENAI_API_VERSION") {
            client.api_version = version;
        }
        Ok(client)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_embedding_deployment(mut self, deployment: impl Into<String>) -> Self {
        self.embedding_deployment = deployment.into();
        self
    }

    /// URL of a deployment-scoped operation.
    pub(crate) fn deployment_url(&self, deployment: &str, operation: &str) -> String {
        format!(
            "{}/openai/deployments/{}/{}?api-version={}",
            self.endpoint, deployment, operation, self.api_version
        )
    }

    /// URL of a resource-level operation (files, batches).
    pub(crate) fn resource_url(&self, path: &str) -> String {
        format!(
            "{}/openai/{}?api-version={}",
            self.endpoint, path, self.api_version
        )
    }

    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Send a request and fail on non-success statuses with the response
    /// text attached.
    pub(crate) async fn expect_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ClientError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: TokenUsage,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

#[async_trait]
impl ChatApi for AzureOpenAiClient {
    async fn chat(&self, body: &JobBody) -> Result<ChatOutcome> {
        let url = self.deployment_url(&body.model, "chat/completions");
        debug!(model = %body.model, "sending chat completion");
        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(body)
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let parsed: ChatResponse = response.json().await?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(ClientError::MissingContent)?;
        Ok(ChatOutcome {
            content,
            usage: parsed.usage,
        })
    }
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingDatum>,
}

#[derive(Deserialize)]
struct EmbeddingDatum {
    embedding: Vec<f64>,
}

#[async_trait]
impl EmbeddingClient for AzureOpenAiClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f64>>> {
        let url = self.deployment_url(&self.embedding_deployment, "embeddings");
        let response = self
            .http
            .post(url)
            .header("api-key", &self.api_key)
            .json(&serde_json::json!({ "input": texts }))
            .send()
            .await?;
        let response = Self::expect_success(response).await?;
        let parsed: EmbeddingResponse = response.json().await?;
        let embeddings: Vec<Vec<f64>> = parsed.data.into_iter().map(|d| d.embedding).collect();
        if embeddings.len() != texts.len() {
            return Err(ClientError::Api {
                status: 200,
                message: format!(
                    "expected {} embeddings, got {}",
                    texts.len(),
                    embeddings.len()
                ),
            });
        }
        Ok(embeddings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn chat_parses_content_and_usage() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock(
                "POST",
                "/openai/deployments/gpt-4o-mini/chat/completions",
            )
            .match_query(mockito::Matcher::UrlEncoded(
                "api-version".into(),
                DEFAULT_API_VERSION.into(),
            ))
            .match_header("api-key", "secret")
            .with_status(200)
            .with_body(
                r#"{"choices":[{"message":{"content":"Paris"}}],
                    "usage":{"prompt_tokens":9,"completion_tokens":1,"total_tokens":10}}"#,
            )
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(server.url(), "secret");
        let outcome = client
            .chat(&JobBody::chat("gpt-4o-mini", "sys", "capital of France?"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(outcome.content, "Paris");
        assert_eq!(outcome.usage.total_tokens, 10);
    }

    #[tokio::test]
    async fn error_status_is_surfaced_with_the_body() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/openai/deployments/gpt-4o-mini/chat/completions",
            )
            .match_query(mockito::Matcher::Any)
            .with_status(429)
            .with_body("rate limited")
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(server.url(), "secret");
        let err = client
            .chat(&JobBody::chat("gpt-4o-mini", "sys", "usr"))
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { status: 429, ref message } if message == "rate limited"));
    }

    #[tokio::test]
    async fn embeddings_come_back_in_input_order() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/openai/deployments/text-embedding-3-small/embeddings",
            )
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[1.0,0.0]},{"embedding":[0.0,1.0]}]}"#)
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(server.url(), "secret");
        let embeddings = client
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert_eq!(embeddings, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
    }

    #[tokio::test]
    async fn embedding_count_mismatch_fails() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock(
                "POST",
                "/openai/deployments/text-embedding-3-small/embeddings",
            )
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"data":[{"embedding":[1.0]}]}"#)
            .create_async()
            .await;

        let client = AzureOpenAiClient::new(server.url(), "secret");
        let err = client
            .embed_batch(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Api { .. }));
    }

    #[test]
    fn trailing_slash_on_the_endpoint_is_trimmed() {
        let client = AzureOpenAiClient::new("https://r.example.com/", "k");
        assert_eq!(
            client.deployment_url("m", "chat/completions"),
            format!(
                "https://r.example.com/openai/deployments/m/chat/completions?api-version={DEFAULT_API_VERSION}"
            )
        );
    }
}
