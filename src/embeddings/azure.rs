//! Azure OpenAI embedding adapter
//!
//! Azure addresses a model through a named deployment, so the whole request URL
//! is supplied as configuration and validated up front:
//!
//! ```text
//! https://<host>/openai/deployments/<deployment>/embeddings?api-version=<version>
//! ```

use super::openai::{send_embedding_request, EmbeddingRequest};
use super::EmbeddingAdapter;
use crate::config::InterfaceFormat;
use crate::{Error, Result};
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use std::sync::OnceLock;

fn deployment_url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^https://(.+?)/openai/deployments/(.+?)/embeddings\?api-version=(.+)")
            .expect("valid Azure deployment URL pattern")
    })
}

pub struct AzureOpenAIEmbedding {
    client: Client,
    api_key: String,
    model: String,
    endpoint: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAIEmbedding {
    /// Fails with [`Error::InvalidConfig`] when `base_url` is not a full deployment URL.
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model_name: impl Into<String>,
    ) -> Result<Self> {
        let captures = deployment_url_pattern()
            .captures(base_url.trim())
            .ok_or_else(|| Error::InvalidConfig(format!(
                "Invalid Azure OpenAI base_url format: {base_url}"
            )))?;

        let endpoint = format!("https://{}", &captures[1]);
        let deployment = captures[2].to_string();
        let api_version = captures[3].to_string();

        tracing::debug!(
            "[AZURE] Deployment '{}' at {} (api-version {})",
            deployment, endpoint, api_version
        );

        Ok(Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model_name.into(),
            endpoint,
            deployment,
            api_version,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn deployment(&self) -> &str {
        &self.deployment
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    fn request_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/embeddings?api-version={}",
            self.endpoint, self.deployment, self.api_version
        )
    }
}

#[async_trait]
impl EmbeddingAdapter for AzureOpenAIEmbedding {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // The deployment selects the model; Azure ignores a model field in the body.
        let request = EmbeddingRequest {
            model: None,
            input: texts,
            encoding_format: "float",
        };

        let builder = self.client
            .post(self.request_url())
            .header("api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request);

        send_embedding_request(builder, self.provider_name(), texts.len()).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let result = self.embed_documents(&[text.to_string()]).await?;
        result.into_iter().next()
            .ok_or_else(|| Error::Embedding("No embedding returned".to_string()))
    }

    fn kind(&self) -> InterfaceFormat {
        InterfaceFormat::AzureOpenAI
    }

    fn provider_name(&self) -> &str {
        "Azure OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
