pub mod embeddings;

pub mod error;
pub mod config;

pub use error::{Error, Result};
pub use config::{EmbeddingConfig, InterfaceFormat};
pub use embeddings::{
    create_embedding_adapter, create_embedding_adapter_from_config, EmbeddingAdapter,
};
