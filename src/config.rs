use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Interface format name, e.g. "openai" or "azure openai"
    pub interface_format: String,
    pub api_key: String,
    pub base_url: String,
    pub model_name: String,
}

/// The provider families an adapter can be built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InterfaceFormat {
    #[serde(rename = "openai")]
    OpenAI,
    #[serde(rename = "azure openai")]
    AzureOpenAI,
    #[serde(rename = "ollama")]
    Ollama,
    #[serde(rename = "sentence-transformers")]
    SentenceTransformers,
}

impl InterfaceFormat {
    pub const ALL: [InterfaceFormat; 4] = [
        InterfaceFormat::OpenAI,
        InterfaceFormat::AzureOpenAI,
        InterfaceFormat::Ollama,
        InterfaceFormat::SentenceTransformers,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceFormat::OpenAI => "openai",
            InterfaceFormat::AzureOpenAI => "azure openai",
            InterfaceFormat::Ollama => "ollama",
            InterfaceFormat::SentenceTransformers => "sentence-transformers",
        }
    }
}

impl fmt::Display for InterfaceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterfaceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == normalized)
            .ok_or_else(|| Error::InvalidConfig(format!("Unknown embedding interface format: {s}")))
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            interface_format: InterfaceFormat::OpenAI.to_string(),
            api_key: String::new(),
            base_url: "https://api.openai.com/v1".to_string(),
            model_name: "text-embedding-3-small".to_string(),
        }
    }
}

impl EmbeddingConfig {
    /// Load configuration from environment variables and .env file
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::default();

        if let Ok(format) = std::env::var("EMBEDDING_INTERFACE_FORMAT") {
            config.interface_format = format;
        }

        if let Ok(api_key) = std::env::var("EMBEDDING_API_KEY")
            .or_else(|_| std::env::var("OPENAI_API_KEY"))
        {
            config.api_key = api_key;
        }

        if let Ok(base_url) = std::env::var("EMBEDDING_BASE_URL") {
            config.base_url = base_url;
        }

        if let Ok(model) = std::env::var("EMBEDDING_MODEL") {
            config.model_name = model;
        }

        Ok(config)
    }

    /// Parsed interface format; fails on names the factory would reject.
    pub fn format(&self) -> Result<InterfaceFormat> {
        self.interface_format.parse()
    }
}
