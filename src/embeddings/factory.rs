use super::{
    AzureOpenAIEmbedding, EmbeddingAdapter, LocalModelEmbedding, OllamaEmbedding, OpenAIEmbedding,
};
use crate::config::{EmbeddingConfig, InterfaceFormat};
use crate::Result;

/// Build the adapter named by `interface_format` (case-insensitive).
///
/// Recognized formats are `openai`, `azure openai`, `ollama` and
/// `sentence-transformers`. Anything else is rejected with
/// [`Error::InvalidConfig`](crate::Error::InvalidConfig). The local model
/// format loads its model here, before returning.
pub fn create_embedding_adapter(
    interface_format: &str,
    api_key: &str,
    base_url: &str,
    model_name: &str,
) -> Result<Box<dyn EmbeddingAdapter>> {
    build_adapter(interface_format.parse()?, api_key, base_url, model_name)
}

pub fn create_embedding_adapter_from_config(
    config: &EmbeddingConfig,
) -> Result<Box<dyn EmbeddingAdapter>> {
    build_adapter(
        config.format()?,
        &config.api_key,
        &config.base_url,
        &config.model_name,
    )
}

fn build_adapter(
    format: InterfaceFormat,
    api_key: &str,
    base_url: &str,
    model_name: &str,
) -> Result<Box<dyn EmbeddingAdapter>> {
    let adapter: Box<dyn EmbeddingAdapter> = match format {
        InterfaceFormat::OpenAI => {
            Box::new(OpenAIEmbedding::new(api_key, base_url, model_name))
        }
        InterfaceFormat::AzureOpenAI => {
            Box::new(AzureOpenAIEmbedding::new(api_key, base_url, model_name)?)
        }
        InterfaceFormat::Ollama => Box::new(OllamaEmbedding::new(model_name, base_url)),
        InterfaceFormat::SentenceTransformers => Box::new(LocalModelEmbedding::new(model_name)?),
    };

    tracing::info!(
        "[FACTORY] Created {} adapter with model '{}'",
        adapter.provider_name(),
        adapter.model_name()
    );

    Ok(adapter)
}
