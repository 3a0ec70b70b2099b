//! OpenAI-compatible embedding adapter

use super::url::ensure_versioned_base_url;
use super::EmbeddingAdapter;
use crate::config::InterfaceFormat;
use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

pub struct OpenAIEmbedding {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
pub(crate) struct EmbeddingRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub input: &'a [String],
    pub encoding_format: &'static str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}

/// Send a prepared embeddings request and decode the OpenAI response shape.
///
/// Vectors come back in `index` order regardless of the order the server lists them,
/// and the count must match the number of inputs.
pub(crate) async fn send_embedding_request(
    request: RequestBuilder,
    provider: &str,
    expected: usize,
) -> Result<Vec<Vec<f32>>> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
        return Err(Error::Embedding(format!(
            "{provider} API error ({status}): {error_text}"
        )));
    }

    let mut embedding_response: EmbeddingResponse = response.json().await?;
    embedding_response.data.sort_by_key(|d| d.index);

    if embedding_response.data.len() != expected {
        return Err(Error::Embedding(format!(
            "{provider} returned {} embeddings for {expected} inputs",
            embedding_response.data.len()
        )));
    }

    Ok(embedding_response.data.into_iter()
        .map(|d| d.embedding)
        .collect())
}

impl OpenAIEmbedding {
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        model_name: impl Into<String>,
    ) -> Self {
        let base_url = ensure_versioned_base_url(base_url);
        let model = model_name.into();

        tracing::debug!("[OPENAI] Adapter bound to {} with model '{}'", base_url, model);

        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model,
            base_url,
        }
    }

    /// The normalized base URL requests are sent under.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl EmbeddingAdapter for OpenAIEmbedding {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbeddingRequest {
            model: Some(&self.model),
            input: texts,
            encoding_format: "float",
        };

        let builder = self.client
            .post(self.endpoint())
            .header("Authorization", format!("Bearer {}", self.api_key))
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
        InterfaceFormat::OpenAI
    }

    fn provider_name(&self) -> &str {
        "OpenAI"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
