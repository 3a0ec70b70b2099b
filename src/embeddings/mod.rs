pub mod azure;
pub mod factory;
pub mod local;
pub mod ollama;
pub mod openai;
pub mod url;

use crate::config::InterfaceFormat;
use crate::{Error, Result};
use async_trait::async_trait;

/// Uniform embedding surface implemented by every provider adapter.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    /// Embed a batch of texts, one vector per input in input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let _ = texts;
        Err(Error::Unsupported(format!(
            "{} does not implement embed_documents",
            self.provider_name()
        )))
    }

    /// Embed a single query text.
    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let _ = text;
        Err(Error::Unsupported(format!(
            "{} does not implement embed_query",
            self.provider_name()
        )))
    }

    fn kind(&self) -> InterfaceFormat;

    fn provider_name(&self) -> &str;

    fn model_name(&self) -> &str;
}

pub use azure::AzureOpenAIEmbedding;
pub use factory::{create_embedding_adapter, create_embedding_adapter_from_config};
pub use local::LocalModelEmbedding;
pub use ollama::OllamaEmbedding;
pub use openai::OpenAIEmbedding;
pub use url::{ensure_versioned_base_url, resolve_ollama_endpoint};

#[cfg(test)]
mod tests {
    use super::*;

    struct Bare;

    #[async_trait]
    impl EmbeddingAdapter for Bare {
        fn kind(&self) -> InterfaceFormat {
            InterfaceFormat::OpenAI
        }

        fn provider_name(&self) -> &str {
            "Bare"
        }

        fn model_name(&self) -> &str {
            "none"
        }
    }

    #[tokio::test]
    async fn test_missing_operations_are_unsupported() {
        let adapter = Bare;

        let err = adapter.embed_documents(&["a".to_string()]).await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));

        let err = adapter.embed_query("a").await.unwrap_err();
        assert!(matches!(err, Error::Unsupported(_)));
        assert!(err.to_string().contains("Bare"));
    }
}
