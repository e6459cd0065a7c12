use crate::config::Config;
use crate::providers::{GeminiProvider, OpenAIProvider};
use crate::traits::Provider;
use anyhow::{Result, anyhow};
use std::sync::Arc;

pub fn create_provider(config: &Config) -> Result<Arc<dyn Provider>> {
    let provider_name = config.provider.as_deref().unwrap_or("gemini");

    match provider_name.to_lowercase().as_str() {
        "gemini" | "google" => Ok(Arc::new(gemini_from_config(config)?)),
        "openai" => Ok(Arc::new(openai_from_config(config)?)),
        _ => Err(anyhow!(
            "Unknown provider: {}. Available: gemini, openai",
            provider_name
        )),
    }
}

fn gemini_from_config(config: &Config) -> Result<GeminiProvider> {
    let api_key = resolve_api_key_with_fallback(
        &["GEMINI_API_KEY", "GOOGLE_API_KEY", "QUILL_GEMINI_API_KEY"],
        &config.api_key,
    )?;
    let mut provider = GeminiProvider::new(api_key).with_temperature(config.temperature);
    if let Some(model) = &config.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(provider)
}

fn openai_from_config(config: &Config) -> Result<OpenAIProvider> {
    let api_key =
        resolve_api_key_with_fallback(&["OPENAI_API_KEY", "QUILL_OPENAI_API_KEY"], &config.api_key)?;
    let mut provider = OpenAIProvider::new(api_key).with_temperature(config.temperature);
    if let Some(model) = &config.model {
        provider = provider.with_model(model.clone());
    }
    if let Some(base_url) = &config.base_url {
        provider = provider.with_base_url(base_url.clone());
    }
    Ok(provider)
}

fn resolve_api_key_with_fallback(env_vars: &[&str], config_key: &str) -> Result<String> {
    for var_name in env_vars {
        if let Ok(key) = std::env::var(var_name)
            && !key.is_empty()
        {
            return Ok(key);
        }
    }
    if !config_key.is_empty() {
        Ok(config_key.to_string())
    } else {
        Err(anyhow!(
            "No API key found. Set {} or run 'quill onboard'.",
            env_vars.first().copied().unwrap_or("an API key variable")
        ))
    }
}
