//! Retry wrapper — bounded retries with a per-attempt timeout.
//!
//! Wraps a single provider and retries transient failures (timeouts, network
//! errors, rate limits, 5xx responses). Authentication and client errors fail
//! fast: retrying a bad API key never helps.

use appforge_core::error::ProviderError;
use appforge_core::provider::{Provider, ProviderRequest, ProviderResponse};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A provider that retries its inner provider on transient failure.
pub struct RetryProvider {
    inner: Arc<dyn Provider>,
    attempts: u32,
    timeout: Duration,
}

impl RetryProvider {
    /// Wrap a provider with the given attempt budget and per-attempt timeout.
    pub fn new(inner: Arc<dyn Provider>, attempts: u32, timeout: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            timeout,
        }
    }

    fn is_transient(error: &ProviderError) -> bool {
        match error {
            ProviderError::Timeout(_)
            | ProviderError::Network(_)
            | ProviderError::RateLimited { .. } => true,
            ProviderError::ApiError { status_code, .. } => *status_code >= 500,
            ProviderError::AuthenticationFailed(_) | ProviderError::NotConfigured(_) => false,
        }
    }
}

#[async_trait]
impl Provider for RetryProvider {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let mut last_error = ProviderError::NotConfigured("Retry wrapper ran no attempts".into());

        for attempt in 1..=self.attempts {
            info!(
                provider = %self.inner.name(),
                attempt,
                total = self.attempts,
                "Sending completion attempt"
            );

            match tokio::time::timeout(self.timeout, self.inner.complete(request.clone())).await {
                Ok(Ok(response)) => return Ok(response),
                Ok(Err(e)) if Self::is_transient(&e) => {
                    warn!(
                        provider = %self.inner.name(),
                        attempt,
                        error = %e,
                        "Transient provider failure, retrying"
                    );
                    last_error = e;
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => {
                    warn!(
                        provider = %self.inner.name(),
                        attempt,
                        timeout_secs = self.timeout.as_secs(),
                        "Provider attempt timed out, retrying"
                    );
                    last_error = ProviderError::Timeout(format!(
                        "Provider '{}' timed out after {}s",
                        self.inner.name(),
                        self.timeout.as_secs()
                    ));
                }
            }
        }

        Err(last_error)
    }
}
