use std::sync::Arc;

use tuvung_config::Config;
use tuvung_translator::{GoogleTranslateClient, OpenAiClient, ProviderClient, ProviderError};
use tuvung_types::{Direction, ErrorKind, LookupMethod, LookupResult, Query, VocabularyRecord};

use crate::parser::{self, Confidence, ParseError};
use crate::retry::RetryPolicy;
use crate::store::VocabularyStore;

/// Resolves one query against the primary provider, then the fallback.
///
/// States: `Init -> TryPrimary -> TryFallback -> Succeeded | Failed`.
/// The primary runs under the retry policy; a malformed primary answer goes
/// straight to the fallback. The fallback is called at most once. Results of
/// the two providers are never mixed.
#[derive(Clone)]
pub struct LookupPipeline {
    primary: Option<Arc<dyn ProviderClient>>,
    fallback: Option<Arc<dyn ProviderClient>>,
    retry: RetryPolicy,
}

#[derive(Default)]
pub struct LookupPipelineBuilder {
    primary: Option<Arc<dyn ProviderClient>>,
    fallback: Option<Arc<dyn ProviderClient>>,
    retry: Option<RetryPolicy>,
}

impl LookupPipelineBuilder {
    pub fn primary(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.primary = Some(client);
        self
    }

    pub fn fallback(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.fallback = Some(client);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }

    pub fn build(self) -> LookupPipeline {
        LookupPipeline {
            primary: self.primary,
            fallback: self.fallback,
            retry: self.retry.unwrap_or_default(),
        }
    }
}

/// Why a stage gave up
#[derive(Debug)]
struct StageFailure {
    kind: ErrorKind,
    message: String,
}

impl From<ProviderError> for StageFailure {
    fn from(e: ProviderError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl From<ParseError> for StageFailure {
    fn from(e: ParseError) -> Self {
        Self {
            kind: ErrorKind::MalformedResponse,
            message: e.to_string(),
        }
    }
}

/// One provider call, logged and dropped
struct Attempt<'a> {
    provider_id: &'a str,
    raw_response_text: &'a str,
    parse_outcome: Result<Confidence, &'a ParseError>,
}

impl LookupPipeline {
    pub fn builder() -> LookupPipelineBuilder {
        LookupPipelineBuilder::default()
    }

    /// Real providers from configuration.
    ///
    /// Without an OpenAI key the pipeline runs on the fallback alone.
    pub fn from_config(config: &Config) -> Self {
        let mut builder = Self::builder().retry_policy(RetryPolicy::from_config(&config.retry));

        match OpenAiClient::new(config.openai.clone()) {
            Ok(client) => builder = builder.primary(Arc::new(client)),
            Err(e) => tracing::warn!("OpenAI not available, using Google Translate only: {e}"),
        }

        if config.fallback.enabled {
            match GoogleTranslateClient::new(config.fallback.clone()) {
                Ok(client) => builder = builder.fallback(Arc::new(client)),
                Err(e) => tracing::error!("Failed to initialize fallback translator: {e}"),
            }
        }

        builder.build()
    }

    pub fn has_primary(&self) -> bool {
        self.primary.is_some()
    }

    pub fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Resolve `query` into a vocabulary record. Never fails: every problem
    /// ends up in the returned [`LookupResult`].
    pub async fn resolve(&self, query: &Query) -> LookupResult {
        let direction = match query.direction() {
            Ok(direction) => direction,
            Err(e) => {
                tracing::warn!("Rejected lookup: {e}");
                return LookupResult::failed(None, ErrorKind::InvalidQuery, e.to_string());
            }
        };

        tracing::info!("Looking up: {}", direction.text());
        let mut last_failure: Option<(LookupMethod, StageFailure)> = None;

        if let Some(primary) = &self.primary {
            match self.try_primary(primary.as_ref(), query, direction).await {
                Ok(record) => {
                    tracing::info!("Lookup succeeded with primary provider");
                    return LookupResult::succeeded(LookupMethod::PrimaryProvider, record);
                }
                Err(failure) => {
                    tracing::warn!(
                        "Primary provider unusable ({}), falling back: {}",
                        failure.kind,
                        failure.message
                    );
                    last_failure = Some((LookupMethod::PrimaryProvider, failure));
                }
            }
        }

        if let Some(fallback) = &self.fallback {
            match self.attempt(fallback.as_ref(), query, direction).await {
                Ok(record) => {
                    tracing::info!("Lookup succeeded with fallback provider");
                    return LookupResult::succeeded(LookupMethod::FallbackProvider, record);
                }
                Err(failure) => {
                    tracing::error!(
                        "Fallback provider failed ({}): {}",
                        failure.kind,
                        failure.message
                    );
                    last_failure = Some((LookupMethod::FallbackProvider, failure));
                }
            }
        }

        match last_failure {
            Some((method, failure)) => {
                LookupResult::failed(Some(method), failure.kind, failure.message)
            }
            None => LookupResult::failed(
                None,
                ErrorKind::MissingCredential,
                "no lookup provider configured",
            ),
        }
    }

    /// [`resolve`](Self::resolve), then hand a successful record to `store`.
    /// A failed save is logged and leaves the result untouched.
    pub async fn resolve_and_save(
        &self,
        query: &Query,
        store: &dyn VocabularyStore,
    ) -> LookupResult {
        let result = self.resolve(query).await;

        if let Some(record) = result.record() {
            if let Err(e) = store.save(record).await {
                tracing::error!("Failed to save vocabulary {}: {e}", record.source_text);
            }
        }

        result
    }

    async fn try_primary(
        &self,
        client: &dyn ProviderClient,
        query: &Query,
        direction: Direction<'_>,
    ) -> Result<VocabularyRecord, StageFailure> {
        let mut attempt_number = 1;

        loop {
            match client.call(query).await {
                Ok(raw) => return self.parse_attempt(client, &raw.provider, &raw.text, direction),
                Err(error) => {
                    let decision = self.retry.should_retry(attempt_number, &error);
                    if !decision.retry {
                        return Err(error.into());
                    }

                    tracing::warn!(
                        "Attempt {}/{} failed: {error}; retrying in {:?}",
                        attempt_number,
                        self.retry.max_attempts(),
                        decision.delay
                    );
                    tokio::time::sleep(decision.delay).await;
                    attempt_number += 1;
                }
            }
        }
    }

    async fn attempt(
        &self,
        client: &dyn ProviderClient,
        query: &Query,
        direction: Direction<'_>,
    ) -> Result<VocabularyRecord, StageFailure> {
        let raw = client.call(query).await?;
        self.parse_attempt(client, &raw.provider, &raw.text, direction)
    }

    fn parse_attempt(
        &self,
        client: &dyn ProviderClient,
        provider_id: &str,
        raw_text: &str,
        direction: Direction<'_>,
    ) -> Result<VocabularyRecord, StageFailure> {
        let outcome = parser::parse(raw_text, client.metadata().shape, direction);

        let attempt = Attempt {
            provider_id,
            raw_response_text: raw_text,
            parse_outcome: outcome.as_ref().map(|parsed| parsed.confidence),
        };
        tracing::debug!(
            provider = attempt.provider_id,
            raw = attempt.raw_response_text,
            outcome = ?attempt.parse_outcome,
            "Provider attempt"
        );

        Ok(outcome?.record)
    }
}
