//! Config-driven provider construction.
//!
//! Resolves the configured provider name to a base URL and API key and
//! builds the matching backend. A missing API key yields `None` — the
//! turn processor turns that into its documented fallback strings rather
//! than failing at startup.

use std::sync::Arc;

use concierge_config::AppConfig;
use concierge_core::error::ProviderError;
use concierge_core::provider::Provider;
use tracing::info;

use crate::openai_compat::OpenAiCompatProvider;

/// Build the configured provider, or `None` when it cannot be used
/// (no API key for a hosted backend).
pub fn build_from_config(config: &AppConfig) -> Result<Option<Arc<dyn Provider>>, ProviderError> {
    // Ollama runs locally and needs no key
    if config.provider == "ollama" {
        let provider = OpenAiCompatProvider::ollama(config.api_url.as_deref())?;
        return Ok(Some(Arc::new(provider)));
    }

    let Some(api_key) = config.api_key.clone().filter(|k| !k.is_empty()) else {
        info!(provider = %config.provider, "No API key configured; answers will use the fallback message");
        return Ok(None);
    };

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    let provider = OpenAiCompatProvider::new(&config.provider, base_url, api_key)?;
    Ok(Some(Arc::new(provider)))
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openai" => "https://api.openai.com/v1".into(),
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        _ => format!("https://{provider_name}.api.example.com/v1"),
    }
}
