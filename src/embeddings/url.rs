//! Base URL helpers shared by the HTTP adapters

use regex::Regex;
use std::sync::OnceLock;

fn version_suffix() -> &'static Regex {
    static VERSION_SUFFIX: OnceLock<Regex> = OnceLock::new();
    VERSION_SUFFIX.get_or_init(|| Regex::new(r"/v\d+$").expect("valid version suffix pattern"))
}

/// Make sure an OpenAI-style base URL ends in a `/v<N>` segment, appending `/v1` when missing.
pub fn ensure_versioned_base_url(url: &str) -> String {
    let url = url.trim();
    if url.is_empty() {
        return String::new();
    }

    if version_suffix().is_match(url) || url.contains("/v1") {
        return url.to_string();
    }

    format!("{}/v1", url.trim_end_matches('/'))
}

/// Resolve the Ollama `/api/embeddings` endpoint from a user-supplied base URL.
///
/// Accepts the full endpoint, the `/api` root, an OpenAI-compatible `/v1` URL
/// (everything from `/v1` on is dropped), or a bare host.
pub fn resolve_ollama_endpoint(base_url: &str) -> String {
    let url = base_url.trim_end_matches('/');

    if url.contains("/api/embeddings") {
        return url.to_string();
    }

    if url.contains("/api") {
        return format!("{url}/embeddings");
    }

    let root = match url.find("/v1") {
        Some(idx) => &url[..idx],
        None => url,
    };
    format!("{root}/api/embeddings")
}
