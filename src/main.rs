use embed_adapters::{Error, Result};
use std::io::BufRead;
use tracing_subscriber::EnvFilter;

#[derive(Debug, PartialEq)]
enum CliRequest {
    Query(String),
    Documents(Vec<String>),
}

/// `--query <text...>` embeds one query; other arguments are documents.
/// With no arguments, each non-blank line of `input` is a document.
fn parse_request(args: Vec<String>, input: impl BufRead) -> Result<CliRequest> {
    if args.first().map(String::as_str) == Some("--query") {
        let query = args[1..].join(" ");
        if query.trim().is_empty() {
            return Err(Error::InvalidConfig("--query requires a text argument".to_string()));
        }
        return Ok(CliRequest::Query(query));
    }

    if !args.is_empty() {
        return Ok(CliRequest::Documents(args));
    }

    let mut lines = Vec::new();
    for line in input.lines() {
        let line = line?;
        if !line.trim().is_empty() {
            lines.push(line);
        }
    }
    Ok(CliRequest::Documents(lines))
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    let config = embed_adapters::EmbeddingConfig::from_env()?;
    tracing::info!(
        "Configuration loaded (format: {}, model: {})",
        config.interface_format, config.model_name
    );

    let adapter = embed_adapters::create_embedding_adapter_from_config(&config)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let request = parse_request(args, std::io::stdin().lock())?;

    let output = match request {
        CliRequest::Query(query) => {
            let embedding = adapter.embed_query(&query).await?;
            serde_json::to_string(&embedding)?
        }
        CliRequest::Documents(texts) => {
            tracing::info!("Embedding {} texts with {}", texts.len(), adapter.provider_name());
            let embeddings = adapter.embed_documents(&texts).await?;
            serde_json::to_string(&embeddings)?
        }
    };

    println!("{output}");
    Ok(())
}
