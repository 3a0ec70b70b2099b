//! In-process sentence-embedding models via fastembed (ONNX runtime)

use super::EmbeddingAdapter;
use crate::config::InterfaceFormat;
use crate::{Error, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use std::fmt;
use std::sync::Arc;

/// Batch text encoder backing [`LocalModelEmbedding`].
pub trait TextEncoder: Send + Sync {
    fn encode(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>>;
}

impl TextEncoder for TextEmbedding {
    fn encode(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
        self.embed(texts, None)
    }
}

pub struct LocalModelEmbedding {
    model: Arc<dyn TextEncoder>,
    model_name: String,
    dimension: usize,
}

impl fmt::Debug for LocalModelEmbedding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalModelEmbedding")
            .field("model_name", &self.model_name)
            .field("dimension", &self.dimension)
            .field("model", &"<TextEncoder>")
            .finish()
    }
}

fn model_key(code: &str) -> String {
    let name = code.rsplit('/').next().unwrap_or(code).to_lowercase();
    match name.strip_suffix("-onnx") {
        Some(stripped) => stripped.to_string(),
        None => name,
    }
}

/// Look up a supported model by its full code (`BAAI/bge-small-en-v1.5`) or bare name
/// (`all-MiniLM-L6-v2`), ignoring case. Returns the model and its output dimension.
pub fn resolve_model(model_name: &str) -> Option<(EmbeddingModel, usize)> {
    let wanted = model_name.trim();
    if wanted.is_empty() {
        return None;
    }

    let supported = TextEmbedding::list_supported_models();

    if let Some(info) = supported.iter().find(|m| m.model_code.eq_ignore_ascii_case(wanted)) {
        return Some((info.model.clone(), info.dim));
    }

    let key = model_key(wanted);
    supported
        .iter()
        .find(|m| model_key(&m.model_code) == key)
        .map(|m| (m.model.clone(), m.dim))
}

impl LocalModelEmbedding {
    /// Load the named model, downloading it into the local cache on first use.
    pub fn new(model_name: impl Into<String>) -> Result<Self> {
        let model_name = model_name.into();

        let (model, dimension) = resolve_model(&model_name)
            .ok_or_else(|| Error::ModelNotFound(model_name.clone()))?;

        tracing::info!("[LOCAL-MODEL] Loading '{}' ({} dimensions)", model_name, dimension);

        let embedding = TextEmbedding::try_new(
            InitOptions::new(model).with_show_download_progress(false),
        )?;

        tracing::info!("[LOCAL-MODEL] Model '{}' ready", model_name);

        Ok(Self::with_encoder(Arc::new(embedding), model_name, dimension))
    }

    /// Wrap an already-loaded encoder.
    pub fn with_encoder(
        encoder: Arc<dyn TextEncoder>,
        model_name: impl Into<String>,
        dimension: usize,
    ) -> Self {
        Self {
            model: encoder,
            model_name: model_name.into(),
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    async fn encode(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let embeddings = tokio::task::spawn_blocking(move || model.encode(texts)).await??;
        Ok(embeddings)
    }
}

#[async_trait]
impl EmbeddingAdapter for LocalModelEmbedding {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.encode(texts.to_vec()).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.encode(vec![text.to_string()]).await?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("No embedding returned".to_string()))
    }

    fn kind(&self) -> InterfaceFormat {
        InterfaceFormat::SentenceTransformers
    }

    fn provider_name(&self) -> &str {
        "Sentence Transformers"
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Deterministic encoder: `[len, vowel count, byte sum]`.
    #[derive(Default)]
    struct CharStats {
        calls: AtomicUsize,
    }

    impl TextEncoder for CharStats {
        fn encode(&self, texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts
                .iter()
                .map(|t| {
                    let vowels = t.chars().filter(|c| "aeiou".contains(*c)).count();
                    let checksum: u32 = t.bytes().map(u32::from).sum();
                    vec![t.len() as f32, vowels as f32, checksum as f32]
                })
                .collect())
        }
    }

    struct Broken;

    impl TextEncoder for Broken {
        fn encode(&self, _texts: Vec<String>) -> anyhow::Result<Vec<Vec<f32>>> {
            Err(anyhow::anyhow!("onnx session failed"))
        }
    }

    #[test]
    fn test_model_key() {
        assert_eq!(model_key("Qdrant/all-MiniLM-L6-v2-onnx"), "all-minilm-l6-v2");
        assert_eq!(model_key("BAAI/bge-small-en-v1.5"), "bge-small-en-v1.5");
        assert_eq!(model_key("plain-name"), "plain-name");
    }

    #[test]
    fn test_resolve_known_models() {
        assert!(resolve_model("all-MiniLM-L6-v2").is_some());
        assert!(resolve_model("sentence-transformers/all-MiniLM-L6-v2").is_some());
        assert!(resolve_model("BAAI/bge-small-en-v1.5").is_some());
    }

    #[test]
    fn test_resolve_exact_model_code() {
        for info in TextEmbedding::list_supported_models().iter().take(3) {
            let (_, dim) = resolve_model(&info.model_code).unwrap();
            assert_eq!(dim, info.dim);
        }
    }

    #[test]
    fn test_unknown_model_is_not_found() {
        assert!(resolve_model("no-such-embedding-model").is_none());
        assert!(resolve_model("").is_none());

        let err = LocalModelEmbedding::new("no-such-embedding-model").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[tokio::test]
    async fn test_query_equals_single_document_batch() {
        let encoder = Arc::new(CharStats::default());
        let provider = LocalModelEmbedding::with_encoder(encoder.clone(), "char-stats", 3);

        let query = provider.embed_query("local embeddings").await.unwrap();
        let docs = provider
            .embed_documents(&["local embeddings".to_string()])
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(query, docs[0]);
        assert_eq!(query.len(), provider.dimension());
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_documents_encoded_in_one_batch() {
        let encoder = Arc::new(CharStats::default());
        let provider = LocalModelEmbedding::with_encoder(encoder.clone(), "char-stats", 3);

        let texts = vec!["a".to_string(), "bb".to_string(), "ccc".to_string()];
        let docs = provider.embed_documents(&texts).await.unwrap();

        assert_eq!(docs.len(), 3);
        assert_eq!(docs[2][0], 3.0);
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);

        assert!(provider.embed_documents(&[]).await.unwrap().is_empty());
        assert_eq!(encoder.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_encoder_failure_propagates() {
        let provider = LocalModelEmbedding::with_encoder(Arc::new(Broken), "broken", 3);

        let err = provider.embed_query("hello").await.unwrap_err();
        assert!(matches!(err, Error::LocalModel(_)));
        assert!(err.to_string().contains("onnx session failed"));
    }

    #[tokio::test]
    #[ignore]
    async fn test_query_matches_first_document() {
        let provider = LocalModelEmbedding::new("all-MiniLM-L6-v2").unwrap();

        let query = provider.embed_query("rust embeddings").await.unwrap();
        let docs = provider
            .embed_documents(&["rust embeddings".to_string()])
            .await
            .unwrap();

        assert_eq!(docs.len(), 1);
        assert_eq!(query, docs[0]);
        assert_eq!(query.len(), provider.dimension());
    }
}
