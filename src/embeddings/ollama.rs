use super::url::resolve_ollama_endpoint;
use super::EmbeddingAdapter;
use crate::config::InterfaceFormat;
use crate::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Option<Vec<f32>>,
}

/// Adapter for a local Ollama server's `/api/embeddings` endpoint.
///
/// Failures never abort a call: each text that cannot be embedded is logged
/// and yields an empty vector in its slot.
pub struct OllamaEmbedding {
    client: reqwest::Client,
    endpoint: String,
    model: String,
}

impl OllamaEmbedding {
    pub fn new(model_name: impl Into<String>, base_url: &str) -> Self {
        let endpoint = resolve_ollama_endpoint(base_url);
        let model = model_name.into();

        tracing::debug!("[OLLAMA] Using endpoint {} with model '{}'", endpoint, model);

        Self {
            client: reqwest::Client::new(),
            endpoint,
            model,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn try_embed_single(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self.client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Embedding(format!("Ollama error: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Embedding(format!("Ollama API error {status}: {body}")));
        }

        let embed_response: EmbedResponse = response.json().await
            .map_err(|e| Error::Embedding(format!("Ollama JSON parse error: {e}")))?;

        embed_response.embedding
            .ok_or_else(|| Error::Embedding("No 'embedding' field in Ollama response".to_string()))
    }

    async fn embed_single(&self, text: &str) -> Vec<f32> {
        match self.try_embed_single(text).await {
            Ok(embedding) => embedding,
            Err(e) => {
                tracing::error!("[OLLAMA] Embeddings request to {} failed: {}", self.endpoint, e);
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl EmbeddingAdapter for OllamaEmbedding {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed_single(text).await);
        }

        let failed = embeddings.iter().filter(|e| e.is_empty()).count();
        if failed > 0 {
            tracing::warn!("[OLLAMA] {} of {} texts returned no embedding", failed, texts.len());
        }

        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_single(text).await)
    }

    fn kind(&self) -> InterfaceFormat {
        InterfaceFormat::Ollama
    }

    fn provider_name(&self) -> &str {
        "Ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
