//! LLM provider implementations for appforge.
//!
//! All providers implement the `appforge_core::Provider` trait. Every
//! generation call — pipeline stage, extraction repair, agent iteration —
//! goes through the same provider instance, built from configuration by
//! [`build_provider`].

pub mod openai_compat;
pub mod retry;

pub use openai_compat::OpenAiCompatProvider;
pub use retry::RetryProvider;

use appforge_config::GeneratorConfig;
use appforge_core::error::ProviderError;
use appforge_core::provider::Provider;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured provider: an OpenAI-compatible backend wrapped in
/// transient-failure retry with the configured per-request timeout.
pub fn build_provider(config: &GeneratorConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        ProviderError::NotConfigured(
            "No API key: set api_key in config.toml or the APPFORGE_API_KEY environment variable"
                .into(),
        )
    })?;

    let timeout = Duration::from_secs(config.request_timeout_secs);
    let backend = OpenAiCompatProvider::new("openai-compat", config.api_url.clone(), api_key)
        .with_timeout(timeout);
    Ok(Arc::new(RetryProvider::new(
        Arc::new(backend),
        config.retry_number,
        timeout,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_provider_requires_api_key() {
        let config = GeneratorConfig::default();
        let err = build_provider(&config).map(|_| ()).unwrap_err();
        assert!(matches!(err, ProviderError::NotConfigured(_)));
    }

    #[test]
    fn build_provider_with_key() {
        let config = GeneratorConfig {
            api_key: Some("sk-test".into()),
            ..Default::default()
        };
        let provider = build_provider(&config).unwrap();
        assert_eq!(provider.name(), "openai-compat");
    }
}
